//! Simulated price feed adapter.
//!
//! Random-walk prices seeded per symbol, with an optional failure rate to
//! exercise the monitor's cache and fallback paths. Interior mutability via
//! a mutex so the adapter satisfies the `Send + Sync` port bound.

use crate::domain::error::SolpilotError;
use crate::ports::price_feed_port::{PriceFeedPort, PriceQuote};
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-step drift bound as a fraction of the current price.
pub const DEFAULT_VOLATILITY: f64 = 0.01;

pub struct SimulatedFeed {
    volatility: f64,
    failure_rate: f64,
    last_prices: Mutex<HashMap<String, f64>>,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_VOLATILITY, 0.0)
    }

    pub fn with_settings(volatility: f64, failure_rate: f64) -> Self {
        SimulatedFeed {
            volatility,
            failure_rate,
            last_prices: Mutex::new(HashMap::new()),
        }
    }

    fn seed_price(symbol: &str) -> f64 {
        match symbol {
            "SOL/USDC" => 150.0,
            "BTC/USD" => 60_000.0,
            "ETH/USD" => 3_000.0,
            _ => 100.0,
        }
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceFeedPort for SimulatedFeed {
    fn get_price(&self, symbol: &str) -> Result<PriceQuote, SolpilotError> {
        let mut rng = rand::thread_rng();
        if self.failure_rate > 0.0 && rng.gen_range(0.0..1.0) < self.failure_rate {
            return Err(SolpilotError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: "simulated outage".to_string(),
            });
        }

        let mut last_prices = self.last_prices.lock().unwrap();
        let last = *last_prices
            .entry(symbol.to_string())
            .or_insert_with(|| Self::seed_price(symbol));
        let drift = rng.gen_range(-self.volatility..=self.volatility);
        let price = (last * (1.0 + drift)).max(f64::MIN_POSITIVE);
        last_prices.insert(symbol.to_string(), price);

        Ok(PriceQuote {
            price,
            confidence: price * self.volatility,
            timestamp: Utc::now(),
        })
    }
}
