//! Protocol yield snapshots and aggregation.
//!
//! The aggregator pulls point-in-time `ProtocolYield` snapshots from its
//! registered sources. A source that fails to answer is skipped with a
//! warning — the remaining sources still refresh, and the previous snapshot
//! for a failing source is simply absent until it recovers. Snapshots are
//! not versioned; each refresh replaces the whole set.

use crate::ports::yield_source_port::YieldSourcePort;
use serde::Serialize;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse(s: &str) -> Option<RiskLevel> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Point-in-time yield snapshot for one pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolYield {
    pub protocol: String,
    pub pool: String,
    /// Annualized percentage yield.
    pub apy: f64,
    /// Total value locked, USD.
    pub tvl: f64,
    pub risk: RiskLevel,
    pub token: String,
    pub address: String,
}

#[derive(Default)]
pub struct YieldAggregator {
    sources: Vec<Box<dyn YieldSourcePort>>,
    snapshots: Vec<ProtocolYield>,
}

impl YieldAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, source: Box<dyn YieldSourcePort>) {
        self.sources.push(source);
    }

    /// Re-query every source. Unreachable sources are logged and skipped;
    /// the refresh itself never fails.
    pub fn refresh(&mut self) {
        let mut snapshots = Vec::new();
        for source in &self.sources {
            match source.fetch_yields() {
                Ok(mut yields) => snapshots.append(&mut yields),
                Err(err) => {
                    warn!(source = source.name(), %err, "yield source skipped");
                }
            }
        }
        self.snapshots = snapshots;
    }

    /// Concatenation of every source's latest snapshot.
    pub fn all_yields(&self) -> &[ProtocolYield] {
        &self.snapshots
    }

    /// Top `n` snapshots by APY, descending.
    pub fn top_yields(&self, n: usize) -> Vec<ProtocolYield> {
        let mut sorted = self.snapshots.clone();
        sorted.sort_by(|a, b| b.apy.partial_cmp(&a.apy).unwrap_or(std::cmp::Ordering::Equal));
        sorted.truncate(n);
        sorted
    }

    pub fn yields_by_risk(&self, risk: RiskLevel) -> Vec<ProtocolYield> {
        self.snapshots
            .iter()
            .filter(|y| y.risk == risk)
            .cloned()
            .collect()
    }
}
