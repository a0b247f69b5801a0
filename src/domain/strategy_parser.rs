//! Free-text strategy parser.
//!
//! Turns a terse natural-language trading rule ("Buy SOL when RSI drops
//! below 30, sell when it crosses 70, max position $500") into a
//! [`ParsedStrategy`]. Parsing is total: no input is an error. Every
//! extraction falls back to a documented default when its pattern is absent.
//!
//! Condition extraction runs as an ordered list of (predicate, extractor)
//! rules over the lower-cased input — RSI, then price-move, then MACD, then
//! Bollinger, then a default. Entry and exit extraction apply the identical
//! rules to the identical full text; only the no-match fallback operator
//! differs (`<` for entry, `>` for exit). A text mentioning one RSI
//! threshold therefore yields the same threshold for both phases; asymmetric
//! exits are expressed through stop-loss and take-profit phrases instead.
//!
//! Name generation runs last because it reuses the extracted asset symbol.

use crate::domain::strategy::{
    ConditionOp, ConditionType, ExecutionType, IndicatorKind, ParsedStrategy, StrategyCondition,
    Timeframe,
};

pub const DEFAULT_MAX_POSITION: f64 = 500.0;
pub const DEFAULT_RISK_PERCENT: f64 = 10.0;
/// Threshold used when an RSI mention carries no number.
pub const DEFAULT_RSI_THRESHOLD: f64 = 50.0;
/// Threshold for the catch-all price condition.
pub const DEFAULT_PRICE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Entry,
    Exit,
}

type ConditionRule = fn(&str, Phase) -> Option<StrategyCondition>;

/// Rules in priority order; the first one whose predicate matches wins.
const CONDITION_RULES: &[ConditionRule] = &[rsi_rule, price_rule, macd_rule, bollinger_rule];

pub fn parse(input: &str) -> ParsedStrategy {
    let text = input.to_lowercase();

    let asset = extract_asset(&text);
    let entry = extract_condition(&text, Phase::Entry);
    let exit = extract_condition(&text, Phase::Exit);
    let max_position = dollar_amount(&text).unwrap_or(DEFAULT_MAX_POSITION);
    let risk_percent = risk_percent(&text).unwrap_or(DEFAULT_RISK_PERCENT);
    let stop_loss = number_after(&text, &["stop loss"]);
    let take_profit = number_after(&text, &["take profit", "sell when up"]);
    let execution_type = if text.contains("limit") {
        ExecutionType::Limit
    } else {
        ExecutionType::Market
    };

    let base = asset.split('/').next().unwrap_or(asset);
    let name = format!("{} {} Strategy", base, strategy_label(&text));

    ParsedStrategy {
        name,
        asset: asset.to_string(),
        entry,
        exit,
        max_position,
        risk_percent,
        execution_type,
        stop_loss,
        take_profit,
    }
}

fn extract_asset(text: &str) -> &'static str {
    if text.contains("sol") {
        "SOL/USDC"
    } else if text.contains("btc") || text.contains("bitcoin") {
        "BTC/USD"
    } else if text.contains("eth") || text.contains("ethereum") {
        "ETH/USD"
    } else {
        "SOL/USDC"
    }
}

fn extract_condition(text: &str, phase: Phase) -> StrategyCondition {
    for rule in CONDITION_RULES {
        if let Some(condition) = rule(text, phase) {
            return condition;
        }
    }
    default_condition(text, phase)
}

fn rsi_rule(text: &str, _phase: Phase) -> Option<StrategyCondition> {
    if !text.contains("rsi") {
        return None;
    }

    let (op, value) = if has_any(text, &["below", "<", "less than"]) {
        (
            ConditionOp::Below,
            number_after(text, &["below", "less than", "<"]),
        )
    } else if has_any(text, &["above", ">", "greater than"]) {
        (
            ConditionOp::Above,
            number_after(text, &["above", "greater than", ">"]),
        )
    } else if text.contains("crosses") {
        (ConditionOp::CrossesAbove, number_after(text, &["crosses"]))
    } else {
        (ConditionOp::Above, number_after(text, &["rsi"]))
    };

    Some(StrategyCondition {
        condition_type: ConditionType::Indicator,
        indicator: Some(IndicatorKind::Rsi),
        op,
        value: value.unwrap_or(DEFAULT_RSI_THRESHOLD),
        timeframe: Some(timeframe_in(text).unwrap_or(Timeframe::M15)),
    })
}

fn price_rule(text: &str, _phase: Phase) -> Option<StrategyCondition> {
    if !has_any(text, &["price", "drops", "rises"]) {
        return None;
    }
    let value = first_percent(text)?;

    let op = if text.contains("drop") || text.contains("below") {
        ConditionOp::Below
    } else {
        ConditionOp::Above
    };

    Some(StrategyCondition {
        condition_type: ConditionType::Price,
        indicator: None,
        op,
        value,
        timeframe: Some(timeframe_in(text).unwrap_or(Timeframe::M15)),
    })
}

fn macd_rule(text: &str, _phase: Phase) -> Option<StrategyCondition> {
    if !text.contains("macd") {
        return None;
    }
    Some(StrategyCondition {
        condition_type: ConditionType::Indicator,
        indicator: Some(IndicatorKind::Macd),
        op: ConditionOp::CrossesAbove,
        value: 0.0,
        timeframe: Some(Timeframe::H1),
    })
}

fn bollinger_rule(text: &str, _phase: Phase) -> Option<StrategyCondition> {
    if !text.contains("bollinger") && !text.contains("bb") {
        return None;
    }
    // Value encodes the band as a standard-deviation multiple.
    let (op, value) = if text.contains("upper") {
        (ConditionOp::Above, 2.0)
    } else {
        (ConditionOp::Below, -2.0)
    };
    Some(StrategyCondition {
        condition_type: ConditionType::Indicator,
        indicator: Some(IndicatorKind::BollingerBands),
        op,
        value,
        timeframe: Some(timeframe_in(text).unwrap_or(Timeframe::M15)),
    })
}

fn default_condition(_text: &str, phase: Phase) -> StrategyCondition {
    StrategyCondition {
        condition_type: ConditionType::Price,
        indicator: None,
        op: match phase {
            Phase::Entry => ConditionOp::Below,
            Phase::Exit => ConditionOp::Above,
        },
        value: DEFAULT_PRICE_THRESHOLD,
        timeframe: Some(Timeframe::M15),
    }
}

fn strategy_label(text: &str) -> &'static str {
    if text.contains("rsi") {
        "RSI"
    } else if text.contains("macd") {
        "MACD"
    } else if text.contains("bollinger") || text.contains("bb") {
        "BB"
    } else if text.contains("dca") {
        "DCA"
    } else {
        "Custom"
    }
}

fn has_any(text: &str, keys: &[&str]) -> bool {
    keys.iter().any(|k| text.contains(k))
}

/// First numeric token after the earliest-listed key that occurs in `text`.
fn number_after(text: &str, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(idx) = text.find(key) {
            if let Some(value) = first_number_from(text, idx + key.len()) {
                return Some(value);
            }
        }
    }
    None
}

/// Scan forward from `start` for a number, allowing `$`, commas and a
/// decimal point inside it ("$1,234.56" parses as 1234.56).
fn first_number_from(text: &str, start: usize) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let mut token = String::new();
    while i < bytes.len() {
        let ch = bytes[i] as char;
        if ch.is_ascii_digit() || ch == '.' {
            token.push(ch);
        } else if ch != ',' {
            break;
        }
        i += 1;
    }
    token.parse().ok()
}

/// All "N%" occurrences as (value, byte offset just past the '%').
fn percent_tokens(text: &str) -> Vec<(f64, usize)> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();

    for (i, &b) in bytes.iter().enumerate() {
        if b != b'%' {
            continue;
        }
        // Walk back over the numeric token directly before the sign.
        let mut start = i;
        while start > 0 {
            let prev = bytes[start - 1] as char;
            if prev.is_ascii_digit() || prev == '.' {
                start -= 1;
            } else {
                break;
            }
        }
        if start == i {
            continue;
        }
        if let Ok(value) = text[start..i].parse::<f64>() {
            out.push((value, i + 1));
        }
    }
    out
}

fn first_percent(text: &str) -> Option<f64> {
    percent_tokens(text).first().map(|&(v, _)| v)
}

/// A percent token qualifies as the risk fraction when the next word is
/// "of" or "risk" ("risk 2% of portfolio", "5% risk").
fn risk_percent(text: &str) -> Option<f64> {
    for (value, end) in percent_tokens(text) {
        let next = text[end..].split_whitespace().next().unwrap_or("");
        if next.starts_with("of") || next.starts_with("risk") {
            return Some(value);
        }
    }
    None
}

fn dollar_amount(text: &str) -> Option<f64> {
    let idx = text.find('$')?;
    first_number_from(text, idx + 1)
}

fn timeframe_in(text: &str) -> Option<Timeframe> {
    const TOKENS: &[(&str, Timeframe)] = &[
        ("5m", Timeframe::M5),
        ("15m", Timeframe::M15),
        ("1h", Timeframe::H1),
        ("4h", Timeframe::H4),
        ("1d", Timeframe::D1),
    ];
    // 15m must win over 5m when both substrings are present.
    TOKENS
        .iter()
        .filter_map(|&(tok, tf)| text.find(tok).map(|idx| (idx, tok.len(), tf)))
        .max_by_key(|&(idx, len, _)| (std::cmp::Reverse(idx), len))
        .map(|(_, _, tf)| tf)
}
