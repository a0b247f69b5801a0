//! Swap execution port trait.
//!
//! Both calls may fail; the caller treats failure as "no trade executed"
//! and records it as such. A receipt's transaction reference only ever
//! comes from the provider — never synthesized on the failure path.

use crate::domain::error::SolpilotError;

#[derive(Debug, Clone, PartialEq)]
pub struct SwapQuote {
    pub input_asset: String,
    pub output_asset: String,
    pub in_amount: f64,
    pub out_amount: f64,
    pub price_impact_pct: f64,
    pub slippage_bps: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapReceipt {
    pub tx_reference: String,
    pub input_amount: f64,
    pub output_amount: f64,
    pub price_impact_pct: f64,
}

pub trait SwapPort: Send + Sync {
    fn get_quote(
        &self,
        input_asset: &str,
        output_asset: &str,
        amount: f64,
        slippage_bps: u32,
    ) -> Result<SwapQuote, SolpilotError>;

    fn execute_swap(&self, quote: &SwapQuote) -> Result<SwapReceipt, SolpilotError>;
}
