#![allow(dead_code)]

use chrono::Utc;
use solpilot::domain::error::SolpilotError;
use solpilot::domain::yields::{ProtocolYield, RiskLevel};
use solpilot::ports::price_feed_port::{PriceFeedPort, PriceQuote};
use solpilot::ports::swap_port::{SwapPort, SwapQuote, SwapReceipt};
use solpilot::ports::yield_source_port::YieldSourcePort;
use std::sync::Mutex;

/// Feed that replays a fixed price script; `None` entries are outages.
pub struct ScriptedFeed {
    script: Mutex<Vec<Option<f64>>>,
}

impl ScriptedFeed {
    pub fn new(script: Vec<Option<f64>>) -> Self {
        Self {
            script: Mutex::new(script),
        }
    }

    pub fn from_prices(prices: &[f64]) -> Self {
        Self::new(prices.iter().copied().map(Some).collect())
    }
}

impl PriceFeedPort for ScriptedFeed {
    fn get_price(&self, symbol: &str) -> Result<PriceQuote, SolpilotError> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(SolpilotError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: "script exhausted".into(),
            });
        }
        match script.remove(0) {
            Some(price) => Ok(PriceQuote {
                price,
                confidence: 0.01,
                timestamp: Utc::now(),
            }),
            None => Err(SolpilotError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: "scripted outage".into(),
            }),
        }
    }
}

/// Swap stub that fills every quote, with an optional failure toggle.
pub struct MockSwap {
    pub fail_executions: bool,
    pub executed: Mutex<Vec<SwapQuote>>,
}

impl MockSwap {
    pub fn new() -> Self {
        Self {
            fail_executions: false,
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_executions: true,
            executed: Mutex::new(Vec::new()),
        }
    }
}

impl SwapPort for MockSwap {
    fn get_quote(
        &self,
        input_asset: &str,
        output_asset: &str,
        amount: f64,
        slippage_bps: u32,
    ) -> Result<SwapQuote, SolpilotError> {
        Ok(SwapQuote {
            input_asset: input_asset.to_string(),
            output_asset: output_asset.to_string(),
            in_amount: amount,
            out_amount: amount,
            price_impact_pct: 0.0,
            slippage_bps,
        })
    }

    fn execute_swap(&self, quote: &SwapQuote) -> Result<SwapReceipt, SolpilotError> {
        if self.fail_executions {
            return Err(SolpilotError::SwapFailed {
                reason: "mock rejection".into(),
            });
        }
        self.executed.lock().unwrap().push(quote.clone());
        Ok(SwapReceipt {
            tx_reference: format!("sim-{}", self.executed.lock().unwrap().len()),
            input_amount: quote.in_amount,
            output_amount: quote.out_amount,
            price_impact_pct: quote.price_impact_pct,
        })
    }
}

pub fn protocol_yield(
    protocol: &str,
    apy: f64,
    tvl: f64,
    risk: RiskLevel,
) -> ProtocolYield {
    ProtocolYield {
        protocol: protocol.to_string(),
        pool: format!("{protocol} pool"),
        apy,
        tvl,
        risk,
        token: "TOK".into(),
        address: format!("{protocol}-address"),
    }
}

/// Yield source over a fixed table, or a scripted failure.
pub struct MockYieldSource {
    pub name: &'static str,
    pub yields: Vec<ProtocolYield>,
    pub fail: bool,
}

impl YieldSourcePort for MockYieldSource {
    fn name(&self) -> &str {
        self.name
    }

    fn fetch_yields(&self) -> Result<Vec<ProtocolYield>, SolpilotError> {
        if self.fail {
            return Err(SolpilotError::YieldSourceUnavailable {
                name: self.name.to_string(),
                reason: "mock outage".into(),
            });
        }
        Ok(self.yields.clone())
    }
}
