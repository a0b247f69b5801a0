//! Bollinger Bands indicator.
//!
//! - Middle: SMA over `period` (latest price when history is shorter)
//! - Upper: middle + multiplier × stddev
//! - Lower: middle - multiplier × stddev
//!
//! Stddev is the population standard deviation of the last `period` prices
//! (or the whole slice when shorter). Defaults: period=20, multiplier=2.0.

use crate::domain::indicator::{calculate_sma, population_std_dev};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STD_DEV_MULT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn calculate_bollinger(prices: &[f64], period: usize, std_dev_mult: f64) -> BollingerBands {
    let middle = calculate_sma(prices, period);
    let start = prices.len().saturating_sub(period.max(1));
    let band = std_dev_mult * population_std_dev(&prices[start..]);
    BollingerBands {
        upper: middle + band,
        middle,
        lower: middle - band,
    }
}
