//! Core pagination types shared by sources and the controller.
//!
//! The wire shapes (`Connection`, `Edge`, `PageInfo`) mirror the relay-style
//! connection contract of the query API; `Page` is the decoded form the
//! controller merges, and `FetchRequest` describes one fetch cycle.

use serde::{Deserialize, Serialize};

/// Sentinel cursor handed out by the synthetic provider's first page.
///
/// Opaque to the controller like any other cursor; only the synthetic
/// provider gives it meaning (it marks the boundary to the terminal page).
pub const SYNTHETIC_CURSOR: &str = "synthetic-cursor";

/// Which source produced the most recently merged page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Page came from the remote query API
    Live,
    /// Page came from the synthetic fallback set
    Synthetic,
    /// No page merged yet
    Unknown,
}

/// Pagination metadata attached to every page.
///
/// Cursors are opaque tokens; the controller never parses them, it only
/// hands `end_cursor` back on the next continuation fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One edge of a connection result: a cursor plus the item it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

/// Wire shape every paginated query result must satisfy.
///
/// Absence of `edges` or `pageInfo` in the response is a validation
/// failure, enforced by deserialization (no defaults on those fields).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// One fetched batch of items plus pagination metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in arrival order
    pub items: Vec<T>,
    /// Pagination metadata, replaced wholesale on merge
    pub page_info: PageInfo,
    /// Total rows reported by the source, when it reports one
    pub total_count: Option<u64>,
    /// Source that produced this page
    pub source: SourceKind,
}

impl<T> Connection<T> {
    /// Flatten a connection into a page attributed to the given source.
    pub fn into_page(self, source: SourceKind) -> Page<T> {
        Page {
            items: self.edges.into_iter().map(|e| e.node).collect(),
            page_info: self.page_info,
            total_count: self.total_count,
            source,
        }
    }
}

/// Whether a fetch replaces the collection or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Initial load or manual refresh: the returned page replaces all items
    Reset,
    /// "Load more": the returned page is appended to the existing items
    Continuation,
}

/// Transient description of one fetch cycle.
///
/// Constructed by the controller and passed down through the policy and the
/// chosen source; lives for exactly one cycle.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub mode: FetchMode,
    pub cursor: Option<String>,
}

impl FetchRequest {
    /// A reset fetch (initial load or refresh), no continuation cursor.
    pub fn reset() -> Self {
        Self {
            mode: FetchMode::Reset,
            cursor: None,
        }
    }

    /// A continuation fetch from the given cursor.
    pub fn continuation(cursor: impl Into<String>) -> Self {
        Self {
            mode: FetchMode::Continuation,
            cursor: Some(cursor.into()),
        }
    }

    pub fn is_reset(&self) -> bool {
        self.mode == FetchMode::Reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_into_page_keeps_order() {
        let conn = Connection {
            edges: vec![
                Edge {
                    cursor: "c1".to_string(),
                    node: "a",
                },
                Edge {
                    cursor: "c2".to_string(),
                    node: "b",
                },
            ],
            page_info: PageInfo {
                has_next_page: true,
                end_cursor: Some("c2".to_string()),
                ..Default::default()
            },
            total_count: Some(7),
        };

        let page = conn.into_page(SourceKind::Live);
        assert_eq!(page.items, vec!["a", "b"]);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("c2"));
        assert_eq!(page.total_count, Some(7));
        assert_eq!(page.source, SourceKind::Live);
    }

    #[test]
    fn test_connection_rejects_missing_page_info() {
        let raw = serde_json::json!({
            "edges": [],
            "totalCount": 0
        });
        let result: Result<Connection<serde_json::Value>, _> = serde_json::from_value(raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_fetch_request_constructors() {
        let reset = FetchRequest::reset();
        assert!(reset.is_reset());
        assert!(reset.cursor.is_none());

        let cont = FetchRequest::continuation("c1");
        assert!(!cont.is_reset());
        assert_eq!(cont.cursor.as_deref(), Some("c1"));
    }
}
