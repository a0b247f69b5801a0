//! Realized P&L tracking per strategy.
//!
//! Executed trades are paired by ledger slot parity: slot 0 with slot 1,
//! slot 2 with slot 3, and so on. A pair contributes to realized P&L only
//! when it is literally (buy, sell) in that order; anything else in a slot
//! pair counts for nothing, and a trailing unmatched trade is an open
//! position, not an error. Failed trades stay in the ledger for visibility
//! but hold no pairing slot. The monitor's entry/exit state machine
//! guarantees strict alternation for the trades it records, which makes
//! the parity walk and buy-with-next-sell matching coincide.

use crate::domain::indicator::population_std_dev;
use crate::domain::trade::{Trade, TradeSide, TradeStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Derived on demand from a strategy's trade ledger; a pure function of the
/// trade sequence, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPerformance {
    pub total_pnl: f64,
    /// Percent of realized pairs with positive pnl.
    pub win_rate: f64,
    pub average_trade: f64,
    /// Largest peak-to-trough decline of the cumulative pnl, in percent.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    /// Number of realized (buy, sell) pairs.
    pub realized_pairs: usize,
}

impl StrategyPerformance {
    pub fn zero() -> Self {
        StrategyPerformance {
            total_pnl: 0.0,
            win_rate: 0.0,
            average_trade: 0.0,
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            realized_pairs: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct PnLTracker {
    ledgers: HashMap<String, Vec<Trade>>,
}

impl PnLTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the strategy's ledger. Creation order is preserved; there
    /// is no reordering and no dedup.
    pub fn record_trade(&mut self, trade: Trade) {
        self.ledgers
            .entry(trade.strategy.clone())
            .or_default()
            .push(trade);
    }

    pub fn trades(&self, strategy: &str) -> &[Trade] {
        self.ledgers
            .get(strategy)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn calculate_performance(&self, strategy: &str) -> StrategyPerformance {
        let executed: Vec<&Trade> = self
            .trades(strategy)
            .iter()
            .filter(|t| t.status == TradeStatus::Executed)
            .collect();

        let mut pair_pnls: Vec<f64> = Vec::new();
        for pair in executed.chunks(2) {
            let [buy, sell] = pair else {
                // Trailing trade without a matching exit yet.
                continue;
            };
            if buy.side == TradeSide::Buy && sell.side == TradeSide::Sell {
                pair_pnls.push((sell.price - buy.price) * buy.amount);
            }
        }

        if pair_pnls.is_empty() {
            return StrategyPerformance::zero();
        }

        let total_pnl: f64 = pair_pnls.iter().sum();
        let wins = pair_pnls.iter().filter(|&&p| p > 0.0).count();
        let count = pair_pnls.len();
        let average_trade = total_pnl / count as f64;

        let mut cumulative = 0.0_f64;
        let mut peak = 0.0_f64;
        let mut max_drawdown = 0.0_f64;
        for pnl in &pair_pnls {
            cumulative += pnl;
            if cumulative > peak {
                peak = cumulative;
            }
            let drawdown = (peak - cumulative) / peak.max(1.0) * 100.0;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }

        let std_dev = population_std_dev(&pair_pnls);
        let sharpe_ratio = if std_dev > 0.0 {
            average_trade / std_dev
        } else {
            0.0
        };

        StrategyPerformance {
            total_pnl,
            win_rate: wins as f64 / count as f64 * 100.0,
            average_trade,
            max_drawdown,
            sharpe_ratio,
            realized_pairs: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Trade;
    use approx::assert_relative_eq;

    fn trade(strategy: &str, side: TradeSide, price: f64, amount: f64) -> Trade {
        Trade::executed(strategy, side, "SOL/USDC", price, amount, None)
    }

    #[test]
    fn empty_ledger_is_all_zeros() {
        let tracker = PnLTracker::new();
        assert_eq!(
            tracker.calculate_performance("missing"),
            StrategyPerformance::zero()
        );
    }

    #[test]
    fn single_winning_pair() {
        let mut tracker = PnLTracker::new();
        tracker.record_trade(trade("s", TradeSide::Buy, 100.0, 1.0));
        tracker.record_trade(trade("s", TradeSide::Sell, 110.0, 1.0));

        let perf = tracker.calculate_performance("s");
        assert_relative_eq!(perf.total_pnl, 10.0);
        assert_relative_eq!(perf.win_rate, 100.0);
        assert_relative_eq!(perf.average_trade, 10.0);
        assert_eq!(perf.realized_pairs, 1);
        // A single pair has zero variance, so Sharpe stays 0.
        assert_relative_eq!(perf.sharpe_ratio, 0.0);
    }

    #[test]
    fn pnl_scales_with_buy_amount() {
        let mut tracker = PnLTracker::new();
        tracker.record_trade(trade("s", TradeSide::Buy, 100.0, 3.0));
        tracker.record_trade(trade("s", TradeSide::Sell, 110.0, 3.0));
        assert_relative_eq!(tracker.calculate_performance("s").total_pnl, 30.0);
    }

    #[test]
    fn trailing_open_trade_is_ignored() {
        let mut tracker = PnLTracker::new();
        tracker.record_trade(trade("s", TradeSide::Buy, 100.0, 1.0));
        tracker.record_trade(trade("s", TradeSide::Sell, 110.0, 1.0));
        tracker.record_trade(trade("s", TradeSide::Buy, 105.0, 1.0));

        let perf = tracker.calculate_performance("s");
        assert_eq!(perf.realized_pairs, 1);
        assert_relative_eq!(perf.total_pnl, 10.0);
    }

    #[test]
    fn non_alternating_pair_contributes_nothing() {
        // Slot pair (buy, buy) is skipped; the following sell lands in the
        // next slot pair with another buy and is skipped too.
        let mut tracker = PnLTracker::new();
        tracker.record_trade(trade("s", TradeSide::Buy, 100.0, 1.0));
        tracker.record_trade(trade("s", TradeSide::Buy, 101.0, 1.0));
        tracker.record_trade(trade("s", TradeSide::Sell, 120.0, 1.0));

        let perf = tracker.calculate_performance("s");
        assert_eq!(perf, StrategyPerformance::zero());
    }

    #[test]
    fn win_rate_mixed_pairs() {
        let mut tracker = PnLTracker::new();
        for (buy, sell) in [(100.0, 110.0), (100.0, 90.0), (100.0, 105.0), (100.0, 95.0)] {
            tracker.record_trade(trade("s", TradeSide::Buy, buy, 1.0));
            tracker.record_trade(trade("s", TradeSide::Sell, sell, 1.0));
        }
        let perf = tracker.calculate_performance("s");
        assert_eq!(perf.realized_pairs, 4);
        assert_relative_eq!(perf.win_rate, 50.0);
        assert_relative_eq!(perf.total_pnl, 0.0);
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        // Pair pnls: +10, -4, -6 → cumulative 10, 6, 0.
        // Peak 10, trough 0 → drawdown (10-0)/10*100 = 100%.
        let mut tracker = PnLTracker::new();
        for (buy, sell) in [(100.0, 110.0), (100.0, 96.0), (100.0, 94.0)] {
            tracker.record_trade(trade("s", TradeSide::Buy, buy, 1.0));
            tracker.record_trade(trade("s", TradeSide::Sell, sell, 1.0));
        }
        let perf = tracker.calculate_performance("s");
        assert_relative_eq!(perf.max_drawdown, 100.0);
    }

    #[test]
    fn drawdown_small_peak_uses_floor_divisor() {
        // Peak 0.5 floors to 1 in the divisor, keeping early drawdowns from
        // exploding: pnls +0.5, -2 → cum 0.5, -1.5 → (0.5+1.5)/1*100 = 200.
        let mut tracker = PnLTracker::new();
        for (buy, sell) in [(100.0, 100.5), (100.0, 98.0)] {
            tracker.record_trade(trade("s", TradeSide::Buy, buy, 1.0));
            tracker.record_trade(trade("s", TradeSide::Sell, sell, 1.0));
        }
        let perf = tracker.calculate_performance("s");
        assert_relative_eq!(perf.max_drawdown, 200.0);
    }

    #[test]
    fn sharpe_ratio_known_values() {
        // Pair pnls 10 and 20: mean 15, population stddev 5 → sharpe 3.
        let mut tracker = PnLTracker::new();
        for (buy, sell) in [(100.0, 110.0), (100.0, 120.0)] {
            tracker.record_trade(trade("s", TradeSide::Buy, buy, 1.0));
            tracker.record_trade(trade("s", TradeSide::Sell, sell, 1.0));
        }
        let perf = tracker.calculate_performance("s");
        assert_relative_eq!(perf.sharpe_ratio, 3.0);
    }

    #[test]
    fn sharpe_zero_variance_is_zero() {
        let mut tracker = PnLTracker::new();
        for _ in 0..3 {
            tracker.record_trade(trade("s", TradeSide::Buy, 100.0, 1.0));
            tracker.record_trade(trade("s", TradeSide::Sell, 110.0, 1.0));
        }
        assert_relative_eq!(tracker.calculate_performance("s").sharpe_ratio, 0.0);
    }

    #[test]
    fn failed_trades_hold_no_pairing_slot() {
        let mut tracker = PnLTracker::new();
        tracker.record_trade(Trade::failed("s", TradeSide::Buy, "SOL/USDC", 100.0, 1.0));
        tracker.record_trade(trade("s", TradeSide::Buy, 100.0, 1.0));
        tracker.record_trade(trade("s", TradeSide::Sell, 110.0, 1.0));

        let perf = tracker.calculate_performance("s");
        assert_eq!(perf.realized_pairs, 1);
        assert_relative_eq!(perf.total_pnl, 10.0);
        assert_eq!(tracker.trades("s").len(), 3);
    }

    #[test]
    fn ledgers_are_isolated_per_strategy() {
        let mut tracker = PnLTracker::new();
        tracker.record_trade(trade("a", TradeSide::Buy, 100.0, 1.0));
        tracker.record_trade(trade("a", TradeSide::Sell, 110.0, 1.0));
        tracker.record_trade(trade("b", TradeSide::Buy, 100.0, 1.0));
        tracker.record_trade(trade("b", TradeSide::Sell, 90.0, 1.0));

        assert_relative_eq!(tracker.calculate_performance("a").total_pnl, 10.0);
        assert_relative_eq!(tracker.calculate_performance("b").total_pnl, -10.0);
        assert_eq!(tracker.trades("a").len(), 2);
    }
}
