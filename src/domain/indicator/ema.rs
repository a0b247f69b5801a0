//! Exponential Moving Average indicator.
//!
//! k = 2/(period+1), seeded with the SMA of the first `period` prices, then
//! ema = (price - ema) * k + ema over the remainder, in chronological order.
//! Same insufficient-history fallback as SMA: latest price.

pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    match prices.last() {
        None => 0.0,
        Some(&last) if period == 0 || prices.len() < period => last,
        Some(_) => {
            let k = 2.0 / (period as f64 + 1.0);
            let mut ema = prices[..period].iter().sum::<f64>() / period as f64;
            for &price in &prices[period..] {
                ema = (price - ema) * k + ema;
            }
            ema
        }
    }
}
