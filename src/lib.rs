//! Portfolio Feed - paginated brokerage data client
//!
//! Retrieves cursor-paginated result sets (loss leaders, positions) from a
//! portfolio query API and degrades gracefully to a deterministic synthetic
//! set when the API is unreachable, misbehaving, or disabled.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            FeedController               │
//! │  (owns CollectionState, merges pages)   │
//! └────────────────┬────────────────────────┘
//!                  │
//!       ┌──────────┴──────────┐
//!       ▼                     ▼
//! ┌─────────────┐      ┌──────────────┐
//! │ Degradation │      │  PageSource  │
//! │ Policy      │──────│ (GraphQL /   │
//! │             │      │  Synthetic)  │
//! └─────────────┘      └──────────────┘
//! ```
//!
//! Resets replace the collection and always leave something renderable;
//! continuations append and never silently mix live and synthetic rows.

pub mod config;
pub mod controller;
pub mod model;
pub mod policy;
pub mod queries;
pub mod source;
pub mod state;
pub mod types;

// Re-export main types for convenience
pub use config::FeedConfig;
pub use controller::FeedController;
pub use model::{LossLeader, Position, SymbolRow};
pub use policy::{DataSourceDecision, DegradationPolicy};
pub use queries::{loss_leaders_feed, positions_feed, LossLeaderParams};
pub use source::{ConnectionQuery, GraphQlExecutor, PageSource, SourceError, SyntheticProvider};
pub use state::{ApiStatus, CollectionState, FeedStatus};
pub use types::{Edge, FetchMode, FetchRequest, Page, PageInfo, SourceKind, SYNTHETIC_CURSOR};
