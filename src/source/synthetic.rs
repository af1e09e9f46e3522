//! Synthetic fallback source.
//!
//! Serves the same fixed, ordered item set on every call. Used both as the
//! explicit offline mode (forced or unconfigured endpoint) and as the
//! degradation fallback when a live reset fetch fails.

use async_trait::async_trait;

use crate::types::{FetchRequest, Page, PageInfo, SourceKind, SYNTHETIC_CURSOR};

use super::traits::{PageSource, SourceError};

/// Deterministic in-memory page source.
///
/// Presents its item set as exactly two pages: the initial fetch reports a
/// next page behind the sentinel cursor, and the continuation fetch behind
/// that cursor is terminal.
pub struct SyntheticProvider<T> {
    items: Vec<T>,
}

impl<T: Clone + Send + Sync> SyntheticProvider<T> {
    /// Create a provider over a fixed item set.
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Number of items served per page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The page for a decided-synthetic fetch.
    ///
    /// The cursor rules make the set behave as two pages: only the first
    /// page advertises a continuation, and only it carries the sentinel.
    pub fn page_for(&self, request: &FetchRequest) -> Page<T> {
        let first_page = request.cursor.is_none();

        Page {
            items: self.items.clone(),
            page_info: PageInfo {
                has_next_page: first_page,
                has_previous_page: !first_page,
                start_cursor: None,
                end_cursor: first_page.then(|| SYNTHETIC_CURSOR.to_string()),
            },
            total_count: Some(self.items.len() as u64),
            source: SourceKind::Synthetic,
        }
    }

    /// The fail-safe page swapped in when a live reset fetch fails.
    ///
    /// Carries the fixed metadata of a fresh first page so the collection
    /// is always left renderable and non-empty.
    pub fn fallback_page(&self) -> Page<T> {
        Page {
            items: self.items.clone(),
            page_info: PageInfo {
                has_next_page: true,
                has_previous_page: false,
                start_cursor: None,
                end_cursor: Some(SYNTHETIC_CURSOR.to_string()),
            },
            total_count: Some(self.items.len() as u64),
            source: SourceKind::Synthetic,
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> PageSource<T> for SyntheticProvider<T> {
    fn id(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    async fn fetch_page(&self, request: &FetchRequest) -> Result<Page<T>, SourceError> {
        Ok(self.page_for(request))
    }
}
