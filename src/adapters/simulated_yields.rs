//! Simulated yield source adapters.
//!
//! Fixed snapshot tables for a handful of well-known Solana protocols,
//! split into a staking source and a lending/LP source so the aggregator's
//! multi-source merge path gets exercised without any network access.

use crate::domain::error::SolpilotError;
use crate::domain::yields::{ProtocolYield, RiskLevel};
use crate::ports::yield_source_port::YieldSourcePort;

fn snapshot(
    protocol: &str,
    pool: &str,
    apy: f64,
    tvl: f64,
    risk: RiskLevel,
    token: &str,
    address: &str,
) -> ProtocolYield {
    ProtocolYield {
        protocol: protocol.to_string(),
        pool: pool.to_string(),
        apy,
        tvl,
        risk,
        token: token.to_string(),
        address: address.to_string(),
    }
}

/// Liquid staking pools.
pub struct SimulatedStakingSource;

impl YieldSourcePort for SimulatedStakingSource {
    fn name(&self) -> &str {
        "sim-staking"
    }

    fn fetch_yields(&self) -> Result<Vec<ProtocolYield>, SolpilotError> {
        Ok(vec![
            snapshot(
                "marinade",
                "mSOL",
                7.2,
                1_200_000_000.0,
                RiskLevel::Low,
                "mSOL",
                "mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So",
            ),
            snapshot(
                "jito",
                "jitoSOL",
                7.8,
                950_000_000.0,
                RiskLevel::Low,
                "jitoSOL",
                "J1toso1uCk3RLmjorhTtrVwY9HJ7X8V9yYac6Y7kGCPn",
            ),
            snapshot(
                "sanctum",
                "INF",
                9.1,
                180_000_000.0,
                RiskLevel::Medium,
                "INF",
                "5oVNBeEEQvYi1cX3ir8Dx5n1P7pdxydbGF2X4TxVusJm",
            ),
        ])
    }
}

/// Lending markets and LP vaults.
pub struct SimulatedDefiSource;

impl YieldSourcePort for SimulatedDefiSource {
    fn name(&self) -> &str {
        "sim-defi"
    }

    fn fetch_yields(&self) -> Result<Vec<ProtocolYield>, SolpilotError> {
        Ok(vec![
            snapshot(
                "solend",
                "USDC main",
                5.4,
                420_000_000.0,
                RiskLevel::Low,
                "USDC",
                "BgxfHJDzm44T7XG68MYKx7YisTjZu73tVovyZSjJMpmw",
            ),
            snapshot(
                "kamino",
                "SOL-USDC vault",
                18.6,
                85_000_000.0,
                RiskLevel::Medium,
                "kSOL-USDC",
                "7u3HeHxYDLhnCoErrtycNokbQYbWGzLs6JSDqGAv5PfF",
            ),
            snapshot(
                "orca",
                "SOL/USDC whirlpool",
                24.3,
                140_000_000.0,
                RiskLevel::Medium,
                "SOL-USDC",
                "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ",
            ),
            snapshot(
                "raydium",
                "BONK/SOL",
                142.0,
                6_500_000.0,
                RiskLevel::High,
                "BONK-SOL",
                "HVNwzt7Pxfu76KHCMQPTLuTCLTm6WnQ1esLv4eizseSv",
            ),
        ])
    }
}
