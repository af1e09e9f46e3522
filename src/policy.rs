//! Degradation policy: which source serves a fetch, and whether a live
//! failure may fall back to synthetic data.
//!
//! The three-way choice (forced synthetic / unconfigured endpoint /
//! live-with-fallback) is computed once per fetch as an explicit tagged
//! decision rather than re-derived along the way.

use tracing::debug;

use crate::config::FeedConfig;
use crate::types::FetchRequest;

/// The source decision for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceDecision {
    /// Attempt the remote query API
    Live,
    /// Serve the synthetic set directly
    Synthetic,
}

/// Per-collection degradation policy.
#[derive(Debug, Clone)]
pub struct DegradationPolicy {
    force_synthetic: bool,
    has_endpoint: bool,
}

impl DegradationPolicy {
    pub fn new(force_synthetic: bool, has_endpoint: bool) -> Self {
        Self {
            force_synthetic,
            has_endpoint,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.force_synthetic, config.endpoint.is_some())
    }

    /// Decide the source for one fetch.
    ///
    /// An unconfigured endpoint is a designed mode, not an error: it routes
    /// to synthetic silently, same as the explicit override.
    pub fn decide(&self) -> DataSourceDecision {
        if self.force_synthetic {
            debug!("Synthetic data forced by configuration");
            return DataSourceDecision::Synthetic;
        }

        if !self.has_endpoint {
            debug!("No endpoint configured, serving synthetic data");
            return DataSourceDecision::Synthetic;
        }

        DataSourceDecision::Live
    }

    /// Whether a failed live fetch for this request may fall back to the
    /// synthetic set.
    ///
    /// Resets always may: they must leave something renderable. A failed
    /// continuation never falls back silently, since injecting synthetic
    /// rows into a partially-real list would corrupt the visible sequence.
    pub fn may_fall_back(&self, request: &FetchRequest) -> bool {
        request.is_reset() || request.cursor.is_none()
    }
}
