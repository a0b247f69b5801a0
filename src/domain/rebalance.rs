//! Rebalancing engine: risk scoring, opportunity ranking, allocation.
//!
//! Risk score in [0, 100]:
//!   score = base(risk) + tvl_factor + apy_factor
//! where base maps low/medium/high to 20/50/80, tvl_factor =
//! max(0, 20 - tvl/10M) so deep pools score lower, and apy_factor adds 15
//! when APY exceeds 100% (implausibly high yield is itself a risk signal).
//!
//! Risk-adjusted return: apy / (1 + score/100).

use crate::domain::position::Position;
use crate::domain::yields::{ProtocolYield, RiskLevel};
use serde::Serialize;

/// Minimum APY improvement, in percentage points, before a move is worth
/// recommending.
pub const MIN_APY_GAIN: f64 = 5.0;

/// Fraction of a position moved per recommendation.
const MOVE_FRACTION: f64 = 0.5;

const TVL_FACTOR_SCALE: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Balanced,
    Aggressive,
}

impl RiskTolerance {
    pub fn parse(s: &str) -> Option<RiskTolerance> {
        match s.to_lowercase().as_str() {
            "conservative" => Some(RiskTolerance::Conservative),
            "balanced" => Some(RiskTolerance::Balanced),
            "aggressive" => Some(RiskTolerance::Aggressive),
            _ => None,
        }
    }

    pub fn allows(&self, risk: RiskLevel) -> bool {
        match self {
            RiskTolerance::Conservative => risk == RiskLevel::Low,
            RiskTolerance::Balanced => risk != RiskLevel::High,
            RiskTolerance::Aggressive => true,
        }
    }

    /// Portfolio weight per risk bucket as (low, medium, high).
    fn bucket_weights(&self) -> (f64, f64, f64) {
        match self {
            RiskTolerance::Conservative => (0.80, 0.15, 0.05),
            RiskTolerance::Balanced => (0.50, 0.30, 0.20),
            RiskTolerance::Aggressive => (0.20, 0.30, 0.50),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RebalanceRecommendation {
    pub from: Position,
    pub to: ProtocolYield,
    /// Token amount to move.
    pub amount: f64,
    /// Estimated additional USD yield per year on the moved value.
    pub expected_gain: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationSlice {
    pub target: ProtocolYield,
    /// USD assigned to this pool.
    pub amount: f64,
}

pub fn risk_score(snapshot: &ProtocolYield) -> f64 {
    let base = match snapshot.risk {
        RiskLevel::Low => 20.0,
        RiskLevel::Medium => 50.0,
        RiskLevel::High => 80.0,
    };
    let tvl_factor = (20.0 - snapshot.tvl / TVL_FACTOR_SCALE).max(0.0);
    let apy_factor = if snapshot.apy > 100.0 { 15.0 } else { 0.0 };
    (base + tvl_factor + apy_factor).clamp(0.0, 100.0)
}

pub fn risk_adjusted_return(snapshot: &ProtocolYield) -> f64 {
    snapshot.apy / (1.0 + risk_score(snapshot) / 100.0)
}

/// One recommendation per position that has a strictly better home:
/// the first eligible yield (descending risk-adjusted return) in a
/// different protocol whose APY beats the position's by more than
/// [`MIN_APY_GAIN`] points. Ranked-list order, not exhaustive search.
pub fn analyze_positions(
    yields: &[ProtocolYield],
    positions: &[Position],
    tolerance: RiskTolerance,
) -> Vec<RebalanceRecommendation> {
    let mut eligible: Vec<&ProtocolYield> =
        yields.iter().filter(|y| tolerance.allows(y.risk)).collect();
    eligible.sort_by(|a, b| {
        risk_adjusted_return(b)
            .partial_cmp(&risk_adjusted_return(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut recommendations = Vec::new();
    for position in positions {
        let candidate = eligible.iter().find(|y| {
            y.apy > position.apy + MIN_APY_GAIN && y.protocol != position.protocol
        });
        if let Some(target) = candidate {
            let moved_value = position.value * MOVE_FRACTION;
            let apy_gain = target.apy - position.apy;
            recommendations.push(RebalanceRecommendation {
                from: position.clone(),
                to: (*target).clone(),
                amount: position.amount * MOVE_FRACTION,
                expected_gain: moved_value * apy_gain / 100.0,
                reasoning: format!(
                    "{}/{} earns {:.1}% APY vs current {:.1}% in {} (risk-adjusted {:.1}%)",
                    target.protocol,
                    target.pool,
                    target.apy,
                    position.apy,
                    position.protocol,
                    risk_adjusted_return(target),
                ),
            });
        }
    }
    recommendations
}

/// Split `total_value` across risk buckets by the tolerance's fixed weight
/// table, then within each bucket across its top-3 pools by APY, evenly.
/// An empty bucket's weight is left unallocated.
pub fn generate_optimal_allocation(
    yields: &[ProtocolYield],
    total_value: f64,
    tolerance: RiskTolerance,
) -> Vec<AllocationSlice> {
    let (low, medium, high) = tolerance.bucket_weights();
    let buckets = [
        (RiskLevel::Low, low),
        (RiskLevel::Medium, medium),
        (RiskLevel::High, high),
    ];

    let mut slices = Vec::new();
    for (risk, weight) in buckets {
        let mut bucket: Vec<&ProtocolYield> =
            yields.iter().filter(|y| y.risk == risk).collect();
        bucket.sort_by(|a, b| b.apy.partial_cmp(&a.apy).unwrap_or(std::cmp::Ordering::Equal));
        bucket.truncate(3);

        if bucket.is_empty() || weight <= 0.0 {
            continue;
        }

        let per_pool = total_value * weight / bucket.len() as f64;
        for snapshot in bucket {
            slices.push(AllocationSlice {
                target: snapshot.clone(),
                amount: per_pool,
            });
        }
    }
    slices
}
