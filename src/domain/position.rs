//! User protocol holdings.
//!
//! A `Position` is supplied by the caller (wallet/session layer) and is
//! read-only to this core; the rebalancing engine only inspects it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub protocol: String,
    pub pool: String,
    /// Token amount held.
    pub amount: f64,
    /// Current USD value of the holding.
    pub value: f64,
    /// APY the position currently earns, in percent.
    pub apy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_fields() {
        let pos = Position {
            protocol: "marinade".into(),
            pool: "mSOL".into(),
            amount: 12.5,
            value: 1_875.0,
            apy: 6.8,
        };
        assert_eq!(pos.protocol, "marinade");
        assert!((pos.value - 1_875.0).abs() < f64::EPSILON);
    }
}
