//! Simple Moving Average indicator.
//!
//! Mean of the last `period` prices. With fewer samples than `period` the
//! latest price is returned as a degenerate fallback, so callers always get
//! a usable level to compare against.

pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    match prices.last() {
        None => 0.0,
        Some(&last) if period == 0 || prices.len() < period => last,
        Some(_) => {
            let window = &prices[prices.len() - period..];
            window.iter().sum::<f64>() / period as f64
        }
    }
}
