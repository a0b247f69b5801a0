//! Yield source port trait.

use crate::domain::error::SolpilotError;
use crate::domain::yields::ProtocolYield;

pub trait YieldSourcePort {
    /// Short source label, used in skip warnings.
    fn name(&self) -> &str;

    fn fetch_yields(&self) -> Result<Vec<ProtocolYield>, SolpilotError>;
}
