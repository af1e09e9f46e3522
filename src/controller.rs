//! Cursor pagination controller.
//!
//! `FeedController` owns one collection's state and drives its fetch
//! cycles: it asks the degradation policy which source serves a request,
//! awaits that source, and merges the result through the state
//! transitions. Single-flight is enforced by the loading flags: a call
//! arriving while a fetch is in flight is dropped, not queued.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::policy::{DataSourceDecision, DegradationPolicy};
use crate::source::{PageSource, SourceError, SyntheticProvider};
use crate::state::{CollectionState, FeedStatus};
use crate::types::{FetchRequest, Page};

/// Controller for one paged collection.
pub struct FeedController<T> {
    /// Human-readable collection name, used in log lines and error banners
    label: String,
    policy: DegradationPolicy,
    live: Option<Arc<dyn PageSource<T>>>,
    synthetic: SyntheticProvider<T>,
    state: RwLock<CollectionState<T>>,
}

impl<T: Clone + Send + Sync> FeedController<T> {
    /// Create a controller over an optional live source and a synthetic set.
    ///
    /// The policy's endpoint knowledge is derived from the live source so
    /// the two can never disagree.
    pub fn new(
        label: impl Into<String>,
        force_synthetic: bool,
        live: Option<Arc<dyn PageSource<T>>>,
        synthetic_items: Vec<T>,
    ) -> Self {
        let policy = DegradationPolicy::new(force_synthetic, live.is_some());

        Self {
            label: label.into(),
            policy,
            live,
            synthetic: SyntheticProvider::new(synthetic_items),
            state: RwLock::new(CollectionState::default()),
        }
    }

    /// Collection name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Snapshot of the current collection state.
    pub async fn snapshot(&self) -> CollectionState<T> {
        self.state.read().await.clone()
    }

    /// Presentation read-model of the current state.
    pub async fn status(&self) -> FeedStatus {
        FeedStatus::of(&*self.state.read().await)
    }

    /// Fetch the collection if it has never been fetched.
    ///
    /// The implicit initial load: runs a reset fetch exactly once, no
    /// matter how often the collection is observed afterwards.
    pub async fn ensure_loaded(&self) -> CollectionState<T> {
        {
            let state = self.state.read().await;
            if state.initialized {
                return state.clone();
            }
        }
        self.refresh().await
    }

    /// Reset fetch: replace the whole collection with a fresh first page.
    ///
    /// Dropped (not queued, not cancel-and-replace) when any fetch is
    /// already in flight, the same guard `load_more` uses. An in-flight
    /// fetch always runs to completion.
    pub async fn refresh(&self) -> CollectionState<T> {
        let request = FetchRequest::reset();

        {
            let mut state = self.state.write().await;
            if state.in_flight() {
                debug!(feed = %self.label, "Refresh dropped, fetch already in flight");
                return state.clone();
            }
            state.initialized = true;
            state.apply_fetch_start(&request);
        }

        self.run_fetch(request).await
    }

    /// Continuation fetch: append the page behind the current end cursor.
    ///
    /// No-op when there is no next page, no cursor to continue from, or a
    /// fetch is already in flight.
    pub async fn load_more(&self) -> CollectionState<T> {
        let request = {
            let mut state = self.state.write().await;
            if !state.can_load_more() {
                debug!(
                    feed = %self.label,
                    in_flight = state.in_flight(),
                    has_next = state.page_info.has_next_page,
                    "Load more dropped"
                );
                return state.clone();
            }

            let Some(cursor) = state.page_info.end_cursor.clone() else {
                return state.clone();
            };

            let request = FetchRequest::continuation(cursor);
            state.apply_fetch_start(&request);
            request
        };

        self.run_fetch(request).await
    }

    /// Execute one fetch cycle and merge its outcome.
    ///
    /// The source is awaited without holding the state lock; the merge and
    /// flag resets then run atomically with respect to other readers.
    async fn run_fetch(&self, request: FetchRequest) -> CollectionState<T> {
        let result = self.execute(&request).await;
        let mut state = self.state.write().await;

        match result {
            Ok(page) => state.apply_fetch_success(&request, page),
            Err(err) => {
                warn!(feed = %self.label, error = %err, reset = request.is_reset(), "Fetch failed");

                let fail_safe = self
                    .policy
                    .may_fall_back(&request)
                    .then(|| self.synthetic.fallback_page());

                state.apply_fetch_failure(&request, self.error_banner(), fail_safe);
            }
        }

        state.clone()
    }

    /// Run the request against the source the policy picks.
    ///
    /// Exactly one attempt against the chosen source; the only retry is
    /// the single live-to-synthetic fallback applied by `run_fetch`.
    async fn execute(&self, request: &FetchRequest) -> Result<Page<T>, SourceError> {
        match self.policy.decide() {
            DataSourceDecision::Synthetic => self.synthetic.fetch_page(request).await,
            DataSourceDecision::Live => {
                let Some(live) = &self.live else {
                    // Policy and wiring are constructed together, so this
                    // only happens if a caller bypassed `new`.
                    return self.synthetic.fetch_page(request).await;
                };

                debug!(feed = %self.label, source = live.id(), "Fetching live page");
                live.fetch_page(request).await
            }
        }
    }

    fn error_banner(&self) -> String {
        format!(
            "Failed to load {}. Check the API connection and try again.",
            self.label
        )
    }
}
