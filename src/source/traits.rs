//! Core trait for page sources.
//!
//! This module defines the `PageSource` trait - the abstraction over the
//! live query API and the synthetic fallback provider. The controller only
//! ever talks to a source through this trait.

use async_trait::async_trait;

use crate::types::{FetchRequest, Page, SourceKind};

/// Error types for page sources.
///
/// Every variant is recoverable in principle; whether a failure actually
/// falls back to synthetic data is decided by the degradation policy, not
/// by the source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network-level failure reaching the endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success HTTP status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The query API reported errors in its response envelope
    #[error("Query error: {0}")]
    Query(String),

    /// Well-formed response missing the required page shape
    #[error("Invalid page shape: {0}")]
    Invalid(String),
}

/// A source of pages for one collection.
///
/// Implementations must be safe to call repeatedly (idempotent reads); the
/// only ordering assumption is that a continuation cursor extends the call
/// that produced it.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Identifier used in logs (e.g. the connection field name).
    fn id(&self) -> &str;

    /// Which source kind pages from this source are attributed to.
    fn kind(&self) -> SourceKind;

    /// Fetch one page for the given request.
    async fn fetch_page(&self, request: &FetchRequest) -> Result<Page<T>, SourceError>;
}
