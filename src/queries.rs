//! Query documents and per-collection wiring.
//!
//! Each paginated collection gets a factory that assembles the executor,
//! the query document, and the synthetic fallback set into a ready
//! `FeedController`. One-shot lookups (single position, symbols listing)
//! go straight through the executor.

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::controller::FeedController;
use crate::model::{LossLeader, Position, SymbolRow};
use crate::source::{ConnectionQuery, GraphQlExecutor, PageSource, SourceError};

/// Paginated loss-leaders connection.
pub const LOSS_LEADERS_QUERY: &str = r#"
query GetLossLeaders($first: Int, $after: String, $daysBack: Int, $dropThreshold: Float, $userId: String, $accountId: String) {
  lossLeaders(first: $first, after: $after, daysBack: $daysBack, dropThreshold: $dropThreshold, userId: $userId, accountId: $accountId) {
    edges {
      cursor
      node {
        symbol
        percentageDrop
        filledAvgPrice
        currentPrice
        quantity
        dollarLoss
      }
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      startCursor
      endCursor
    }
    totalCount
  }
}
"#;

/// Paginated positions connection.
pub const POSITIONS_QUERY: &str = r#"
query GetPositions($first: Int, $after: String, $accountId: String) {
  positions(first: $first, after: $after, accountId: $accountId) {
    edges {
      cursor
      node {
        id
        symbol
        totalShares
        availableShares
        averageEntryPrice
        marketValue
        lastPrice
        lastPriceUpdatedAt
        totalCost
        unrealizedPl
        unrealizedPlPercent
        realizedPlYtd
        openedAt
        isOpen
        accountName
      }
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      startCursor
      endCursor
    }
    totalCount
  }
}
"#;

/// Single position by symbol.
pub const SINGLE_POSITION_QUERY: &str = r#"
query GetSinglePosition($symbol: String!, $accountId: String) {
  singlePosition(symbol: $symbol, accountId: $accountId) {
    id
    symbol
    totalShares
    availableShares
    averageEntryPrice
    marketValue
    lastPrice
    lastPriceUpdatedAt
    totalCost
    unrealizedPl
    unrealizedPlPercent
    realizedPlYtd
    openedAt
    isOpen
    accountName
  }
}
"#;

/// Symbols listing.
pub const SYMBOLS_QUERY: &str = r#"
query {
  symbols {
    symbol
  }
}
"#;

/// Filter parameters for the loss-leaders query.
#[derive(Debug, Clone)]
pub struct LossLeaderParams {
    /// Trading days to look back over
    pub days_back: u32,
    /// Minimum percentage drop to qualify
    pub drop_threshold: f64,
}

impl Default for LossLeaderParams {
    fn default() -> Self {
        Self {
            days_back: 1,
            drop_threshold: 10.0,
        }
    }
}

/// Scope variables shared by scoped queries.
fn scope_variables(config: &FeedConfig) -> Map<String, Value> {
    let mut vars = Map::new();
    if let Some(user_id) = &config.user_id {
        vars.insert("userId".to_string(), user_id.to_string().into());
    }
    if let Some(account_id) = &config.account_id {
        vars.insert("accountId".to_string(), account_id.to_string().into());
    }
    vars
}

/// Live source for the loss-leaders connection.
pub fn loss_leaders_source(
    executor: Arc<GraphQlExecutor>,
    config: &FeedConfig,
    params: &LossLeaderParams,
) -> ConnectionQuery<LossLeader> {
    let mut vars = scope_variables(config);
    vars.insert("daysBack".to_string(), params.days_back.into());
    vars.insert("dropThreshold".to_string(), params.drop_threshold.into());

    ConnectionQuery::new(
        executor,
        LOSS_LEADERS_QUERY,
        "lossLeaders",
        vars,
        config.page_size,
    )
}

/// Live source for the positions connection.
pub fn positions_source(
    executor: Arc<GraphQlExecutor>,
    config: &FeedConfig,
) -> ConnectionQuery<Position> {
    ConnectionQuery::new(
        executor,
        POSITIONS_QUERY,
        "positions",
        scope_variables(config),
        config.page_size,
    )
}

/// Assemble a loss-leaders feed from configuration.
pub fn loss_leaders_feed(config: &FeedConfig) -> FeedController<LossLeader> {
    loss_leaders_feed_with_params(config, &LossLeaderParams::default())
}

/// Assemble a loss-leaders feed with explicit filter parameters.
pub fn loss_leaders_feed_with_params(
    config: &FeedConfig,
    params: &LossLeaderParams,
) -> FeedController<LossLeader> {
    let live = config.endpoint.as_ref().map(|base| {
        let executor = Arc::new(GraphQlExecutor::new(base.clone(), config.request_timeout));
        Arc::new(loss_leaders_source(executor, config, params)) as Arc<dyn PageSource<LossLeader>>
    });

    FeedController::new(
        "loss leaders",
        config.force_synthetic,
        live,
        LossLeader::synthetic_set(),
    )
}

/// Assemble a positions feed from configuration.
pub fn positions_feed(config: &FeedConfig) -> FeedController<Position> {
    let live = config.endpoint.as_ref().map(|base| {
        let executor = Arc::new(GraphQlExecutor::new(base.clone(), config.request_timeout));
        Arc::new(positions_source(executor, config)) as Arc<dyn PageSource<Position>>
    });

    FeedController::new(
        "positions",
        config.force_synthetic,
        live,
        Position::synthetic_set(),
    )
}

/// Look up a single position by symbol.
///
/// An absent position is `Ok(None)`, not an error.
pub async fn fetch_single_position(
    executor: &GraphQlExecutor,
    symbol: &str,
    account_id: Option<Uuid>,
) -> Result<Option<Position>, SourceError> {
    let mut vars = Map::new();
    vars.insert("symbol".to_string(), symbol.into());
    if let Some(id) = account_id {
        vars.insert("accountId".to_string(), id.to_string().into());
    }

    let data = executor
        .execute(SINGLE_POSITION_QUERY, Value::Object(vars))
        .await?;

    match data.get("singlePosition") {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| SourceError::Invalid(e.to_string())),
    }
}

/// Fetch the list of known symbols.
pub async fn fetch_symbols(executor: &GraphQlExecutor) -> Result<Vec<SymbolRow>, SourceError> {
    let data = executor.execute(SYMBOLS_QUERY, Value::Object(Map::new())).await?;

    let raw = data
        .get("symbols")
        .cloned()
        .filter(|value| !value.is_null())
        .ok_or_else(|| SourceError::Invalid("missing `symbols` in response".to_string()))?;

    serde_json::from_value(raw).map_err(|e| SourceError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_name_their_connections() {
        assert!(LOSS_LEADERS_QUERY.contains("lossLeaders("));
        assert!(POSITIONS_QUERY.contains("positions("));
        assert!(SINGLE_POSITION_QUERY.contains("singlePosition("));
        assert!(SYMBOLS_QUERY.contains("symbols"));
    }

    #[test]
    fn test_scope_variables_carry_ids() {
        let user = Uuid::new_v4();
        let account = Uuid::new_v4();
        let config = FeedConfig::default()
            .with_user_id(user)
            .with_account_id(account);

        let vars = scope_variables(&config);
        assert_eq!(vars["userId"], user.to_string());
        assert_eq!(vars["accountId"], account.to_string());

        let empty = scope_variables(&FeedConfig::default());
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_feed_serves_synthetic() {
        let feed = loss_leaders_feed(&FeedConfig::default());
        let state = feed.ensure_loaded().await;

        assert_eq!(state.items.len(), 5);
        assert_eq!(state.source_kind, crate::types::SourceKind::Synthetic);
        assert!(state.last_error.is_none(), "designed mode, not an error");
    }

    #[test]
    fn test_default_loss_leader_params() {
        let params = LossLeaderParams::default();
        assert_eq!(params.days_back, 1);
        assert_eq!(params.drop_threshold, 10.0);
    }
}
