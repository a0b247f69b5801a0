//! Condition evaluation against rolling price history.
//!
//! [`ConditionEvaluator`] owns one bounded price history per asset symbol.
//! The monitor loop is the single writer for each history: it appends the
//! freshly polled price, then evaluates conditions over the same snapshot,
//! so a read never observes a partial append.
//!
//! # Semantics
//!
//! - Price conditions compare the percent change between the last two
//!   history samples against the threshold.
//! - RSI `crosses_above`/`crosses_below` compare RSI over the full history
//!   against RSI with the last sample dropped; the threshold must be
//!   straddled between the two readings.
//! - MACD uses "histogram positive" as the above-signal proxy (see the
//!   signal-line note in the macd module).
//! - Bollinger breach direction is encoded in the sign of `value`.
//! - Any unmatched type/indicator combination is simply no signal: `false`,
//!   never an error.

use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_macd, calculate_rsi, rsi,
};
use crate::domain::strategy::{ConditionOp, ConditionType, IndicatorKind, StrategyCondition};
use std::collections::HashMap;

/// Most recent samples retained per asset; oldest evicted first.
pub const HISTORY_CAP: usize = 200;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Default)]
pub struct ConditionEvaluator {
    histories: HashMap<String, Vec<f64>>,
}

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a polled price, evicting the oldest sample past the cap.
    pub fn update_price_history(&mut self, asset: &str, price: f64) {
        let history = self.histories.entry(asset.to_string()).or_default();
        history.push(price);
        if history.len() > HISTORY_CAP {
            let excess = history.len() - HISTORY_CAP;
            history.drain(..excess);
        }
    }

    pub fn history(&self, asset: &str) -> &[f64] {
        self.histories.get(asset).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Evaluate `condition` for `asset` using its stored history.
    pub fn evaluate(
        &self,
        condition: &StrategyCondition,
        asset: &str,
        current_price: f64,
    ) -> bool {
        check_condition(condition, current_price, self.history(asset))
    }
}

/// Evaluate one condition against the current price and a history snapshot
/// whose last element is the current tick's sample.
pub fn check_condition(
    condition: &StrategyCondition,
    current_price: f64,
    history: &[f64],
) -> bool {
    match condition.condition_type {
        ConditionType::Price => check_price_move(condition, history),
        ConditionType::Indicator => match condition.indicator {
            Some(IndicatorKind::Rsi) => check_rsi(condition, history),
            Some(IndicatorKind::Macd) => calculate_macd(history).histogram > 0.0,
            Some(IndicatorKind::BollingerBands) => check_bollinger(condition, current_price, history),
            _ => false,
        },
        // Time and volume conditions have no data source in this core.
        _ => false,
    }
}

fn check_price_move(condition: &StrategyCondition, history: &[f64]) -> bool {
    let [.., prev, last] = history else {
        return false;
    };
    if *prev == 0.0 {
        return false;
    }
    let change_pct = (last - prev) / prev * 100.0;
    match condition.op {
        ConditionOp::Below => change_pct < -condition.value,
        ConditionOp::Above => change_pct > condition.value,
        _ => false,
    }
}

fn check_rsi(condition: &StrategyCondition, history: &[f64]) -> bool {
    let current = calculate_rsi(history, rsi::DEFAULT_PERIOD);
    match condition.op {
        ConditionOp::Below => current < condition.value,
        ConditionOp::Above => current > condition.value,
        ConditionOp::Equal => (current - condition.value).abs() < EPSILON,
        ConditionOp::CrossesAbove | ConditionOp::CrossesBelow => {
            if history.is_empty() {
                return false;
            }
            let previous = calculate_rsi(&history[..history.len() - 1], rsi::DEFAULT_PERIOD);
            match condition.op {
                ConditionOp::CrossesAbove => {
                    previous <= condition.value && current > condition.value
                }
                _ => previous >= condition.value && current < condition.value,
            }
        }
    }
}

fn check_bollinger(condition: &StrategyCondition, current_price: f64, history: &[f64]) -> bool {
    let bands = calculate_bollinger(
        history,
        bollinger::DEFAULT_PERIOD,
        bollinger::DEFAULT_STD_DEV_MULT,
    );
    if condition.value > 0.0 {
        current_price > bands.upper
    } else {
        current_price < bands.lower
    }
}
