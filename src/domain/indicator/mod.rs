//! Technical indicator implementations.
//!
//! Every function here is pure and total over any price slice: where the
//! history is too short to compute the real value, a documented fallback is
//! returned instead of an error (RSI → 50, SMA/EMA → latest price). Strategy
//! evaluation depends on those exact boundary values, so they are part of the
//! contract, not a convenience.

pub mod rsi;
pub mod sma;
pub mod ema;
pub mod macd;
pub mod bollinger;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdOutput};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

/// Population standard deviation (divides by N, not N-1).
///
/// Returns 0.0 for an empty slice. Shared by Bollinger Bands and the
/// Sharpe-ratio calculation in the P&L tracker.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
