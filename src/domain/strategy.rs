//! Strategy data model.
//!
//! `ParsedStrategy` and its `StrategyCondition`s are produced once by the
//! text parser and are read-only afterwards: evaluation, monitoring, and
//! reporting all treat them as immutable inputs.

use serde::Serialize;
use std::fmt;

/// What a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Price,
    Indicator,
    Time,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndicatorKind {
    Rsi,
    Macd,
    BollingerBands,
    Sma,
    Ema,
}

/// Comparison applied between the observed value and the condition threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionOp {
    #[serde(rename = "<")]
    Below,
    #[serde(rename = ">")]
    Above,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "crosses_above")]
    CrossesAbove,
    #[serde(rename = "crosses_below")]
    CrossesBelow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionType {
    Market,
    Limit,
}

/// A single entry or exit trigger. Immutable once produced by the parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyCondition {
    pub condition_type: ConditionType,
    pub indicator: Option<IndicatorKind>,
    pub op: ConditionOp,
    pub value: f64,
    pub timeframe: Option<Timeframe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedStrategy {
    pub name: String,
    /// Pair symbol, e.g. "SOL/USDC".
    pub asset: String,
    pub entry: StrategyCondition,
    pub exit: StrategyCondition,
    /// Maximum position size in USD.
    pub max_position: f64,
    pub risk_percent: f64,
    pub execution_type: ExecutionType,
    /// Percent below entry price that forces an exit.
    pub stop_loss: Option<f64>,
    /// Percent above entry price that forces an exit.
    pub take_profit: Option<f64>,
}

impl ParsedStrategy {
    /// Base token of the traded pair ("SOL" for "SOL/USDC").
    pub fn base_symbol(&self) -> &str {
        self.asset.split('/').next().unwrap_or(&self.asset)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionOp::Below => "<",
            ConditionOp::Above => ">",
            ConditionOp::Equal => "=",
            ConditionOp::CrossesAbove => "crosses_above",
            ConditionOp::CrossesBelow => "crosses_below",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_condition() -> StrategyCondition {
        StrategyCondition {
            condition_type: ConditionType::Indicator,
            indicator: Some(IndicatorKind::Rsi),
            op: ConditionOp::Below,
            value: 30.0,
            timeframe: Some(Timeframe::M15),
        }
    }

    #[test]
    fn base_symbol_from_pair() {
        let strategy = ParsedStrategy {
            name: "SOL RSI Strategy".into(),
            asset: "SOL/USDC".into(),
            entry: sample_condition(),
            exit: sample_condition(),
            max_position: 500.0,
            risk_percent: 10.0,
            execution_type: ExecutionType::Market,
            stop_loss: None,
            take_profit: None,
        };
        assert_eq!(strategy.base_symbol(), "SOL");
    }

    #[test]
    fn base_symbol_without_separator() {
        let mut strategy = ParsedStrategy {
            name: "x".into(),
            asset: "SOL/USDC".into(),
            entry: sample_condition(),
            exit: sample_condition(),
            max_position: 500.0,
            risk_percent: 10.0,
            execution_type: ExecutionType::Market,
            stop_loss: None,
            take_profit: None,
        };
        strategy.asset = "BONK".into();
        assert_eq!(strategy.base_symbol(), "BONK");
    }

    #[test]
    fn op_display() {
        assert_eq!(ConditionOp::Below.to_string(), "<");
        assert_eq!(ConditionOp::Above.to_string(), ">");
        assert_eq!(ConditionOp::CrossesAbove.to_string(), "crosses_above");
    }

    #[test]
    fn timeframe_display() {
        assert_eq!(Timeframe::M15.to_string(), "15m");
        assert_eq!(Timeframe::H1.to_string(), "1h");
    }

    #[test]
    fn condition_serializes_op_token() {
        let json = serde_json::to_string(&sample_condition()).unwrap();
        assert!(json.contains("\"<\""));
        assert!(json.contains("\"indicator\""));
    }
}
