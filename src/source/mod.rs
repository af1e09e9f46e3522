//! Page sources: the live query API and the synthetic fallback.

pub mod graphql;
pub mod synthetic;
pub mod traits;

pub use graphql::{ConnectionQuery, GraphQlExecutor};
pub use synthetic::SyntheticProvider;
pub use traits::{PageSource, SourceError};
