//! Row types for the tracked portfolio entities.
//!
//! Field names match the camelCase wire shape of the query API. The
//! reference synthetic sets are the deterministic stand-in data served when
//! the API is unreachable or disabled.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One loss-leader row: a position whose price dropped past the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossLeader {
    pub symbol: String,
    pub percentage_drop: f64,
    pub filled_avg_price: f64,
    pub current_price: f64,
    pub quantity: f64,
    pub dollar_loss: f64,
}

impl LossLeader {
    /// The reference synthetic set: five fixed rows, same order every call.
    pub fn synthetic_set() -> Vec<Self> {
        vec![
            Self {
                symbol: "AAPL".to_string(),
                percentage_drop: 5.32,
                filled_avg_price: 192.58,
                current_price: 182.52,
                quantity: 10.0,
                dollar_loss: -100.60,
            },
            Self {
                symbol: "TSLA".to_string(),
                percentage_drop: 12.45,
                filled_avg_price: 202.64,
                current_price: 177.41,
                quantity: 5.0,
                dollar_loss: -126.15,
            },
            Self {
                symbol: "NVDA".to_string(),
                percentage_drop: 8.21,
                filled_avg_price: 893.27,
                current_price: 820.06,
                quantity: 2.0,
                dollar_loss: -146.42,
            },
            Self {
                symbol: "META".to_string(),
                percentage_drop: 6.87,
                filled_avg_price: 509.32,
                current_price: 474.33,
                quantity: 3.0,
                dollar_loss: -104.97,
            },
            Self {
                symbol: "AMZN".to_string(),
                percentage_drop: 5.73,
                filled_avg_price: 189.62,
                current_price: 178.75,
                quantity: 8.0,
                dollar_loss: -86.96,
            },
        ]
    }
}

/// One brokerage position row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub total_shares: f64,
    pub available_shares: f64,
    pub average_entry_price: f64,
    pub market_value: f64,
    pub last_price: f64,
    pub last_price_updated_at: Option<DateTime<Utc>>,
    pub total_cost: f64,
    pub unrealized_pl: f64,
    pub unrealized_pl_percent: f64,
    pub realized_pl_ytd: f64,
    pub opened_at: Option<DateTime<Utc>>,
    pub is_open: bool,
    pub account_name: Option<String>,
}

impl Position {
    /// Reference synthetic positions, aligned with the loss-leader set.
    pub fn synthetic_set() -> Vec<Self> {
        let opened = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).single();
        let updated = Utc.with_ymd_and_hms(2024, 3, 8, 20, 0, 0).single();

        LossLeader::synthetic_set()
            .into_iter()
            .enumerate()
            .map(|(i, row)| Self {
                id: format!("synthetic-position-{}", i + 1),
                symbol: row.symbol,
                total_shares: row.quantity,
                available_shares: row.quantity,
                average_entry_price: row.filled_avg_price,
                market_value: row.current_price * row.quantity,
                last_price: row.current_price,
                last_price_updated_at: updated,
                total_cost: row.filled_avg_price * row.quantity,
                unrealized_pl: row.dollar_loss,
                unrealized_pl_percent: -row.percentage_drop,
                realized_pl_ytd: 0.0,
                opened_at: opened,
                is_open: true,
                account_name: Some("Demo Account".to_string()),
            })
            .collect()
    }
}

/// One entry of the symbols listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRow {
    pub symbol: String,
}
