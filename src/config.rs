//! Configuration for portfolio feeds.
//!
//! A missing endpoint is not an error: it is the designed synthetic mode,
//! the same route the explicit force-synthetic switch takes.

use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

/// Configuration consumed by a feed controller and its sources.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Query API base address; `None` forces synthetic mode
    pub endpoint: Option<String>,
    /// Explicit switch to serve synthetic data even when an endpoint exists
    pub force_synthetic: bool,
    /// Page size requested per fetch (`first` variable)
    pub page_size: u32,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// User scope applied to scoped queries
    pub user_id: Option<Uuid>,
    /// Account scope applied to scoped queries
    pub account_id: Option<Uuid>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            force_synthetic: false,
            page_size: 10,
            request_timeout: Duration::from_millis(30_000),
            user_id: None,
            account_id: None,
        }
    }
}

impl FeedConfig {
    /// Build configuration from `PORTFOLIO_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PORTFOLIO_API_URL") {
            if !url.trim().is_empty() {
                config.endpoint = Some(url);
            }
        }

        if let Ok(raw) = std::env::var("PORTFOLIO_FORCE_SYNTHETIC") {
            config.force_synthetic = matches!(raw.trim(), "1" | "true" | "TRUE" | "yes");
        }

        if let Ok(raw) = std::env::var("PORTFOLIO_PAGE_SIZE") {
            match raw.parse::<u32>() {
                Ok(size) if size > 0 => config.page_size = size,
                _ => warn!(value = %raw, "Ignoring invalid PORTFOLIO_PAGE_SIZE"),
            }
        }

        if let Ok(raw) = std::env::var("PORTFOLIO_REQUEST_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.request_timeout = Duration::from_millis(ms),
                _ => warn!(value = %raw, "Ignoring invalid PORTFOLIO_REQUEST_TIMEOUT_MS"),
            }
        }

        if let Ok(raw) = std::env::var("PORTFOLIO_USER_ID") {
            match raw.parse::<Uuid>() {
                Ok(id) => config.user_id = Some(id),
                Err(_) => warn!(value = %raw, "Ignoring invalid PORTFOLIO_USER_ID"),
            }
        }

        if let Ok(raw) = std::env::var("PORTFOLIO_ACCOUNT_ID") {
            match raw.parse::<Uuid>() {
                Ok(id) => config.account_id = Some(id),
                Err(_) => warn!(value = %raw, "Ignoring invalid PORTFOLIO_ACCOUNT_ID"),
            }
        }

        config
    }

    /// Set the endpoint base address.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Force synthetic data regardless of endpoint configuration.
    pub fn with_force_synthetic(mut self, force: bool) -> Self {
        self.force_synthetic = force;
        self
    }

    /// Set the page size requested per fetch.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Scope queries to an account.
    pub fn with_account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Scope queries to a user.
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("page_size must be at least 1".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            if endpoint.trim().is_empty() {
                return Err("endpoint must not be blank when set".to_string());
            }
        }

        Ok(())
    }
}
