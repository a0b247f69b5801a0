//! Simulated swap adapter.
//!
//! Quotes at a flat simulated rate with a small price impact, and issues
//! `sim-` prefixed transaction references on execution. A failure toggle
//! exercises the monitor's failed-trade path.

use crate::domain::error::SolpilotError;
use crate::ports::swap_port::{SwapPort, SwapQuote, SwapReceipt};

const SIMULATED_PRICE_IMPACT_PCT: f64 = 0.05;

pub struct SimulatedSwap {
    fail_executions: bool,
}

impl SimulatedSwap {
    pub fn new() -> Self {
        SimulatedSwap {
            fail_executions: false,
        }
    }

    pub fn failing() -> Self {
        SimulatedSwap {
            fail_executions: true,
        }
    }
}

impl Default for SimulatedSwap {
    fn default() -> Self {
        Self::new()
    }
}

impl SwapPort for SimulatedSwap {
    fn get_quote(
        &self,
        input_asset: &str,
        output_asset: &str,
        amount: f64,
        slippage_bps: u32,
    ) -> Result<SwapQuote, SolpilotError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SolpilotError::QuoteFailed {
                input: input_asset.to_string(),
                output: output_asset.to_string(),
                reason: format!("non-positive amount {amount}"),
            });
        }
        Ok(SwapQuote {
            input_asset: input_asset.to_string(),
            output_asset: output_asset.to_string(),
            in_amount: amount,
            out_amount: amount * (1.0 - SIMULATED_PRICE_IMPACT_PCT / 100.0),
            price_impact_pct: SIMULATED_PRICE_IMPACT_PCT,
            slippage_bps,
        })
    }

    fn execute_swap(&self, quote: &SwapQuote) -> Result<SwapReceipt, SolpilotError> {
        if self.fail_executions {
            return Err(SolpilotError::SwapFailed {
                reason: "simulated execution failure".to_string(),
            });
        }
        Ok(SwapReceipt {
            tx_reference: format!("sim-{}", uuid::Uuid::new_v4()),
            input_amount: quote.in_amount,
            output_amount: quote.out_amount,
            price_impact_pct: quote.price_impact_pct,
        })
    }
}
