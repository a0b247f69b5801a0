//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD line = EMA(12) - EMA(26).
//!
//! Signal line = 0.9 * MACD line. This is a deliberate approximation, NOT a
//! true EMA(9) of the MACD series.
//! It keeps the histogram a fixed 10% of the MACD line, which changes where
//! crossovers land compared with a textbook MACD; evaluation logic relies on
//! this exact variant, so do not "correct" it in isolation.

use crate::domain::indicator::calculate_ema;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;

/// Approximation factor standing in for the usual EMA(9) signal smoothing.
const SIGNAL_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn calculate_macd(prices: &[f64]) -> MacdOutput {
    let macd = calculate_ema(prices, FAST_PERIOD) - calculate_ema(prices, SLOW_PERIOD);
    let signal = macd * SIGNAL_FACTOR;
    MacdOutput {
        macd,
        signal,
        histogram: macd - signal,
    }
}
