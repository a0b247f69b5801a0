//! Trade records.
//!
//! A `Trade` is append-only: once recorded it is never mutated, and ledger
//! order is creation order. A failed swap still produces a record with
//! `TradeStatus::Failed` and no transaction signature — execution failures
//! are surfaced, never papered over with a fabricated reference.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    Executed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    pub id: String,
    pub strategy: String,
    pub timestamp: DateTime<Utc>,
    pub side: TradeSide,
    pub asset: String,
    pub price: f64,
    pub amount: f64,
    pub value: f64,
    pub tx_signature: Option<String>,
    pub status: TradeStatus,
}

impl Trade {
    /// New executed trade with a generated id and the current timestamp.
    pub fn executed(
        strategy: &str,
        side: TradeSide,
        asset: &str,
        price: f64,
        amount: f64,
        tx_signature: Option<String>,
    ) -> Self {
        Self::record(strategy, side, asset, price, amount, tx_signature, TradeStatus::Executed)
    }

    /// New failed trade: no signature, value still captures intent size.
    pub fn failed(strategy: &str, side: TradeSide, asset: &str, price: f64, amount: f64) -> Self {
        Self::record(strategy, side, asset, price, amount, None, TradeStatus::Failed)
    }

    fn record(
        strategy: &str,
        side: TradeSide,
        asset: &str,
        price: f64,
        amount: f64,
        tx_signature: Option<String>,
        status: TradeStatus,
    ) -> Self {
        Trade {
            id: uuid::Uuid::new_v4().to_string(),
            strategy: strategy.to_string(),
            timestamp: Utc::now(),
            side,
            asset: asset.to_string(),
            price,
            amount,
            value: price * amount,
            tx_signature,
            status,
        }
    }
}
