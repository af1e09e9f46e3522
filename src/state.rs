//! Owned collection state and its transition functions.
//!
//! All mutation goes through the `apply_*` transitions so the merge
//! algorithm is unit-testable without any rendering or transport concern.
//! Invariants:
//! - items are append-only across continuations and replaced wholesale on
//!   resets, never partially overwritten
//! - `page_info` is always replaced as a unit, never merged field-by-field
//! - `source_kind` reflects the most recently merged page only
//! - loading flags are cleared on every exit path

use tracing::debug;

use crate::types::{FetchMode, FetchRequest, Page, PageInfo, SourceKind};

/// The controller-owned aggregate for one paged collection.
#[derive(Debug, Clone)]
pub struct CollectionState<T> {
    /// Accumulated items, arrival order
    pub items: Vec<T>,
    /// Metadata of the most recently merged page
    pub page_info: PageInfo,
    /// Source of the most recently merged page
    pub source_kind: SourceKind,
    /// A reset fetch is in flight
    pub is_loading: bool,
    /// A continuation fetch is in flight
    pub is_loading_more: bool,
    /// User-facing message from the last failed fetch cycle
    pub last_error: Option<String>,
    /// Total rows reported by the source, when known
    pub total_count: Option<u64>,
    pub(crate) initialized: bool,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo::default(),
            source_kind: SourceKind::Unknown,
            is_loading: false,
            is_loading_more: false,
            last_error: None,
            total_count: None,
            initialized: false,
        }
    }
}

impl<T> CollectionState<T> {
    /// Whether any fetch is currently in flight.
    pub fn in_flight(&self) -> bool {
        self.is_loading || self.is_loading_more
    }

    /// Whether a "load more" would actually fetch.
    pub fn can_load_more(&self) -> bool {
        !self.in_flight() && self.page_info.has_next_page && self.page_info.end_cursor.is_some()
    }

    /// Begin a fetch cycle: clear the previous error, raise the flag for
    /// the request's mode.
    pub fn apply_fetch_start(&mut self, request: &FetchRequest) {
        self.last_error = None;
        match request.mode {
            FetchMode::Reset => {
                self.is_loading = true;
                self.is_loading_more = false;
            }
            FetchMode::Continuation => {
                self.is_loading_more = true;
            }
        }
    }

    /// Merge a fetched page.
    ///
    /// Resets replace the items; continuations append them, preserving the
    /// prior order as a prefix.
    pub fn apply_fetch_success(&mut self, request: &FetchRequest, page: Page<T>) {
        match request.mode {
            FetchMode::Reset => self.items = page.items,
            FetchMode::Continuation => self.items.extend(page.items),
        }
        self.page_info = page.page_info;
        self.source_kind = page.source;
        self.total_count = page.total_count;
        self.clear_flags();

        debug!(
            items = self.items.len(),
            has_next = self.page_info.has_next_page,
            source = ?self.source_kind,
            "Page merged"
        );
    }

    /// Record a failed fetch cycle.
    ///
    /// A failed continuation leaves the items untouched. For resets the
    /// caller supplies a fail-safe page (the synthetic set) so a reset
    /// always yields a renderable, non-empty state.
    pub fn apply_fetch_failure(
        &mut self,
        request: &FetchRequest,
        message: impl Into<String>,
        fail_safe: Option<Page<T>>,
    ) {
        self.last_error = Some(message.into());

        if request.is_reset() {
            if let Some(page) = fail_safe {
                self.items = page.items;
                self.page_info = page.page_info;
                self.source_kind = page.source;
                self.total_count = page.total_count;
            }
        }

        self.clear_flags();
    }

    fn clear_flags(&mut self) {
        self.is_loading = false;
        self.is_loading_more = false;
    }
}

/// Connection status as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Connected,
    Disconnected,
    Unknown,
}

/// Thin read-model over a collection state for presentation bindings.
#[derive(Debug, Clone)]
pub struct FeedStatus {
    pub api: ApiStatus,
    /// The visible data is the synthetic stand-in set
    pub degraded: bool,
    /// Banner message to surface, if any
    pub banner: Option<String>,
}

impl FeedStatus {
    pub fn of<T>(state: &CollectionState<T>) -> Self {
        let api = match state.source_kind {
            SourceKind::Live => ApiStatus::Connected,
            SourceKind::Synthetic => ApiStatus::Disconnected,
            SourceKind::Unknown => ApiStatus::Unknown,
        };

        Self {
            api,
            degraded: state.source_kind == SourceKind::Synthetic,
            banner: state.last_error.clone(),
        }
    }
}
