//! Pagination controller integration tests
//!
//! Exercises the merge algorithm, the no-op guards, single-flight, and the
//! degradation fallback against a scripted in-memory source, without any
//! network involvement.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use portfolio_feed::{
    FeedController, FetchRequest, LossLeader, Page, PageInfo, PageSource, SourceError, SourceKind,
};

/// Source that replays a scripted sequence of results.
struct ScriptedSource {
    script: Mutex<VecDeque<Result<Page<LossLeader>, SourceError>>>,
    calls: AtomicU32,
    delay: Option<Duration>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Page<LossLeader>, SourceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
            delay: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource<LossLeader> for ScriptedSource {
    fn id(&self) -> &str {
        "scripted"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }

    async fn fetch_page(&self, _request: &FetchRequest) -> Result<Page<LossLeader>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::Network("script exhausted".to_string())))
    }
}

fn leader(symbol: &str) -> LossLeader {
    LossLeader {
        symbol: symbol.to_string(),
        percentage_drop: 11.0,
        filled_avg_price: 100.0,
        current_price: 89.0,
        quantity: 1.0,
        dollar_loss: -11.0,
    }
}

fn live_page(symbols: &[&str], has_next: bool, cursor: Option<&str>) -> Page<LossLeader> {
    Page {
        items: symbols.iter().map(|s| leader(s)).collect(),
        page_info: PageInfo {
            has_next_page: has_next,
            has_previous_page: false,
            start_cursor: None,
            end_cursor: cursor.map(String::from),
        },
        total_count: None,
        source: SourceKind::Live,
    }
}

fn controller(source: Arc<ScriptedSource>) -> FeedController<LossLeader> {
    let live: Arc<dyn PageSource<LossLeader>> = source;
    FeedController::new("loss leaders", false, Some(live), LossLeader::synthetic_set())
}

fn symbols(state: &portfolio_feed::CollectionState<LossLeader>) -> Vec<&str> {
    state.items.iter().map(|i| i.symbol.as_str()).collect()
}

#[tokio::test]
async fn test_refresh_replaces_items() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(live_page(&["AAA", "BBB"], true, Some("c1"))),
        Ok(live_page(&["XXX"], false, None)),
    ]));
    let feed = controller(Arc::clone(&source));

    let state = feed.refresh().await;
    assert_eq!(symbols(&state), vec!["AAA", "BBB"]);

    let state = feed.refresh().await;
    assert_eq!(symbols(&state), vec!["XXX"], "resets never accumulate");
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_load_more_appends_then_terminates() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(live_page(&["AAA", "BBB"], true, Some("c1"))),
        Ok(live_page(&["CCC"], false, None)),
    ]));
    let feed = controller(Arc::clone(&source));

    feed.refresh().await;
    let state = feed.load_more().await;

    assert_eq!(symbols(&state), vec!["AAA", "BBB", "CCC"]);
    assert!(!state.page_info.has_next_page);
    assert_eq!(state.source_kind, SourceKind::Live);

    // Terminal page: a further load_more must not fetch or change state
    let state = feed.load_more().await;
    assert_eq!(symbols(&state), vec!["AAA", "BBB", "CCC"]);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_load_more_noop_without_next_page() {
    let source = Arc::new(ScriptedSource::new(vec![Ok(live_page(
        &["AAA"],
        false,
        None,
    ))]));
    let feed = controller(Arc::clone(&source));

    feed.refresh().await;
    let state = feed.load_more().await;

    assert_eq!(symbols(&state), vec!["AAA"]);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_reset_failure_falls_back_to_synthetic() {
    let source = Arc::new(ScriptedSource::new(vec![Err(SourceError::Network(
        "connection refused".to_string(),
    ))]));
    let feed = controller(source);

    let state = feed.refresh().await;

    assert_eq!(state.source_kind, SourceKind::Synthetic);
    assert_eq!(state.items.len(), 5, "reset always leaves a renderable set");
    assert!(state.last_error.is_some());
    assert!(state.page_info.has_next_page);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_continuation_failure_preserves_items() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(live_page(&["AAA", "BBB"], true, Some("c1"))),
        Err(SourceError::Network("connection reset".to_string())),
    ]));
    let feed = controller(source);

    feed.refresh().await;
    let state = feed.load_more().await;

    assert_eq!(
        symbols(&state),
        vec!["AAA", "BBB"],
        "no synthetic rows behind real ones"
    );
    assert_eq!(state.source_kind, SourceKind::Live);
    assert!(state.last_error.is_some());
    assert!(!state.is_loading_more);
}

#[tokio::test]
async fn test_ensure_loaded_fetches_exactly_once() {
    let source = Arc::new(ScriptedSource::new(vec![Ok(live_page(
        &["AAA"],
        false,
        None,
    ))]));
    let feed = controller(Arc::clone(&source));

    let first = feed.ensure_loaded().await;
    let second = feed.ensure_loaded().await;

    assert_eq!(symbols(&first), vec!["AAA"]);
    assert_eq!(symbols(&second), vec!["AAA"]);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_forced_synthetic_never_touches_live() {
    let source = Arc::new(ScriptedSource::new(vec![Ok(live_page(
        &["AAA"],
        false,
        None,
    ))]));
    let feed = FeedController::new(
        "loss leaders",
        true,
        Some(Arc::clone(&source) as Arc<dyn PageSource<LossLeader>>),
        LossLeader::synthetic_set(),
    );

    let state = feed.refresh().await;
    assert_eq!(state.source_kind, SourceKind::Synthetic);
    assert_eq!(state.items.len(), 5);
    assert!(state.last_error.is_none());
    assert!(state.page_info.has_next_page);

    // The synthetic set presents as two pages; the continuation is terminal
    let state = feed.load_more().await;
    assert_eq!(state.items.len(), 10);
    assert!(!state.page_info.has_next_page);

    let state = feed.load_more().await;
    assert_eq!(state.items.len(), 10);
    assert_eq!(source.calls(), 0, "live source never called");
}

#[tokio::test]
async fn test_concurrent_load_more_is_single_flight() {
    let source = Arc::new(
        ScriptedSource::new(vec![
            Ok(live_page(&["AAA"], true, Some("c1"))),
            Ok(live_page(&["BBB"], true, Some("c2"))),
        ])
        .with_delay(Duration::from_millis(20)),
    );
    let feed = controller(Arc::clone(&source));

    feed.refresh().await;
    assert_eq!(source.calls(), 1);

    let (first, second) = tokio::join!(feed.load_more(), feed.load_more());

    // Exactly one of the two fetched; the other was dropped, not queued
    assert_eq!(source.calls(), 2);
    let longest = if first.items.len() >= second.items.len() {
        first
    } else {
        second
    };
    assert_eq!(symbols(&longest), vec!["AAA", "BBB"]);
}

#[tokio::test]
async fn test_refresh_during_flight_is_dropped() {
    let source = Arc::new(
        ScriptedSource::new(vec![Ok(live_page(&["AAA"], false, None))])
            .with_delay(Duration::from_millis(20)),
    );
    let feed = controller(Arc::clone(&source));

    let (_, _) = tokio::join!(feed.refresh(), feed.refresh());
    assert_eq!(source.calls(), 1, "second refresh dropped while in flight");

    let state = feed.snapshot().await;
    assert_eq!(symbols(&state), vec!["AAA"]);
}

#[tokio::test]
async fn test_status_reflects_degradation() {
    let source = Arc::new(ScriptedSource::new(vec![Err(SourceError::RequestFailed(
        "HTTP 502".to_string(),
    ))]));
    let feed = controller(source);

    feed.refresh().await;
    let status = feed.status().await;

    assert_eq!(status.api, portfolio_feed::ApiStatus::Disconnected);
    assert!(status.degraded);
    assert!(status.banner.is_some());
}
