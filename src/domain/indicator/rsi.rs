//! RSI (Relative Strength Index) indicator implementation.
//!
//! Windowed average gain/loss over the last `period` price changes:
//! - avg_gain = sum of positive deltas / period
//! - avg_loss = sum of negative deltas (absolute) / period
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Fewer than `period + 1` samples: returns the neutral 50.0 rather than an
//! error — condition evaluation treats an unwarmed RSI as "no information".
//! Result is rounded to 2 decimal places.

/// Default lookback period.
pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 50.0;
    }

    let window = &prices[prices.len() - (period + 1)..];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    };

    (rsi * 100.0).round() / 100.0
}
