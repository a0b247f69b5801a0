//! Price feed port trait.
//!
//! Providers may fail transiently; the monitor falls back to the last
//! cached price, then to a configured synthetic value, so a feed outage
//! never stalls condition evaluation.

use crate::domain::error::SolpilotError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    /// Provider confidence interval around the price, same units.
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

pub trait PriceFeedPort: Send + Sync {
    fn get_price(&self, symbol: &str) -> Result<PriceQuote, SolpilotError>;
}
