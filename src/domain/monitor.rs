//! Strategy monitoring engine.
//!
//! One `StrategyMonitor` owns everything for one strategy: the price
//! history, the trade ledger, and an explicit position state machine
//! (awaiting entry ⇄ awaiting exit). A tick is a single synchronous
//! poll → append → evaluate → trade cycle, so history mutation and
//! condition evaluation can never interleave; the async [`StrategyMonitor::run`]
//! loop just schedules ticks and honors the deactivation flag between
//! them — an in-flight tick always completes.
//!
//! Price resolution degrades, never fails: provider quote, else the last
//! cached price, else the configured synthetic fallback.

use crate::domain::error::SolpilotError;
use crate::domain::evaluator::ConditionEvaluator;
use crate::domain::pnl::{PnLTracker, StrategyPerformance};
use crate::domain::strategy::ParsedStrategy;
use crate::domain::trade::{Trade, TradeSide};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_feed_port::PriceFeedPort;
use crate::ports::swap_port::SwapPort;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_500;
/// Synthetic price used when the feed fails before any quote was cached.
pub const DEFAULT_FALLBACK_PRICE: f64 = 100.0;

const SLIPPAGE_BPS: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    pub fallback_price: f64,
    /// Stop after this many ticks; `None` runs until deactivated.
    pub max_ticks: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            fallback_price: DEFAULT_FALLBACK_PRICE,
            max_ticks: None,
        }
    }
}

impl MonitorConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SolpilotError> {
        let poll_interval_ms =
            config.get_int("monitor", "poll_interval_ms", DEFAULT_POLL_INTERVAL_MS as i64);
        if poll_interval_ms <= 0 {
            return Err(SolpilotError::ConfigInvalid {
                section: "monitor".into(),
                key: "poll_interval_ms".into(),
                reason: "must be positive".into(),
            });
        }

        let fallback_price =
            config.get_double("monitor", "fallback_price", DEFAULT_FALLBACK_PRICE);
        if fallback_price <= 0.0 {
            return Err(SolpilotError::ConfigInvalid {
                section: "monitor".into(),
                key: "fallback_price".into(),
                reason: "must be positive".into(),
            });
        }

        Ok(MonitorConfig {
            poll_interval_ms: poll_interval_ms as u64,
            fallback_price,
            max_ticks: None,
        })
    }
}

/// Open-position state: either waiting for the entry condition, or holding
/// `amount` bought at `entry_price` and waiting for a reason to exit.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PositionState {
    AwaitingEntry,
    AwaitingExit { entry_price: f64, amount: f64 },
}

/// What a single tick did, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    NoSignal,
    Entered,
    EntryFailed,
    Exited,
    ExitFailed,
}

pub struct StrategyMonitor {
    strategy: ParsedStrategy,
    feed: Arc<dyn PriceFeedPort>,
    swap: Arc<dyn SwapPort>,
    config: MonitorConfig,
    evaluator: ConditionEvaluator,
    tracker: PnLTracker,
    state: PositionState,
    last_price: Option<f64>,
    ticks: u64,
}

impl StrategyMonitor {
    pub fn new(
        strategy: ParsedStrategy,
        feed: Arc<dyn PriceFeedPort>,
        swap: Arc<dyn SwapPort>,
        config: MonitorConfig,
    ) -> Self {
        StrategyMonitor {
            strategy,
            feed,
            swap,
            config,
            evaluator: ConditionEvaluator::new(),
            tracker: PnLTracker::new(),
            state: PositionState::AwaitingEntry,
            last_price: None,
            ticks: 0,
        }
    }

    pub fn strategy(&self) -> &ParsedStrategy {
        &self.strategy
    }

    pub fn performance(&self) -> StrategyPerformance {
        self.tracker.calculate_performance(&self.strategy.name)
    }

    pub fn trades(&self) -> &[Trade] {
        self.tracker.trades(&self.strategy.name)
    }

    pub fn has_open_position(&self) -> bool {
        matches!(self.state, PositionState::AwaitingExit { .. })
    }

    /// One poll/evaluate/trade cycle.
    pub fn tick(&mut self) -> TickEvent {
        self.ticks += 1;
        let asset = self.strategy.asset.clone();
        let price = self.resolve_price(&asset);
        self.evaluator.update_price_history(&asset, price);
        debug!(%asset, price, tick = self.ticks, "tick");

        match self.state {
            PositionState::AwaitingEntry => {
                if self.evaluator.evaluate(&self.strategy.entry, &asset, price) {
                    self.enter(price)
                } else {
                    TickEvent::NoSignal
                }
            }
            PositionState::AwaitingExit {
                entry_price,
                amount,
            } => {
                if self.should_exit(entry_price, price, &asset) {
                    self.exit(price, amount)
                } else {
                    TickEvent::NoSignal
                }
            }
        }
    }

    /// Poll the strategy's asset with cache and synthetic fallbacks.
    fn resolve_price(&mut self, asset: &str) -> f64 {
        match self.feed.get_price(asset) {
            Ok(quote) => {
                self.last_price = Some(quote.price);
                quote.price
            }
            Err(err) => match self.last_price {
                Some(cached) => {
                    warn!(%asset, %err, cached, "feed unavailable, using cached price");
                    cached
                }
                None => {
                    warn!(
                        %asset,
                        %err,
                        fallback = self.config.fallback_price,
                        "feed unavailable with no cache, using fallback price"
                    );
                    self.config.fallback_price
                }
            },
        }
    }

    fn should_exit(&self, entry_price: f64, price: f64, asset: &str) -> bool {
        if let Some(stop_loss) = self.strategy.stop_loss {
            if price <= entry_price * (1.0 - stop_loss / 100.0) {
                info!(price, entry_price, stop_loss, "stop loss triggered");
                return true;
            }
        }
        if let Some(take_profit) = self.strategy.take_profit {
            if price >= entry_price * (1.0 + take_profit / 100.0) {
                info!(price, entry_price, take_profit, "take profit triggered");
                return true;
            }
        }
        self.evaluator.evaluate(&self.strategy.exit, asset, price)
    }

    fn enter(&mut self, price: f64) -> TickEvent {
        let amount = self.strategy.max_position / price;
        let (base, quote_token) = split_pair(&self.strategy.asset);

        match self.execute(quote_token, base, self.strategy.max_position) {
            Ok(tx_reference) => {
                info!(
                    strategy = %self.strategy.name,
                    price,
                    amount,
                    tx = %tx_reference,
                    "entry filled"
                );
                self.tracker.record_trade(Trade::executed(
                    &self.strategy.name,
                    TradeSide::Buy,
                    &self.strategy.asset,
                    price,
                    amount,
                    Some(tx_reference),
                ));
                self.state = PositionState::AwaitingExit {
                    entry_price: price,
                    amount,
                };
                TickEvent::Entered
            }
            Err(err) => {
                warn!(strategy = %self.strategy.name, %err, "entry swap failed");
                self.tracker.record_trade(Trade::failed(
                    &self.strategy.name,
                    TradeSide::Buy,
                    &self.strategy.asset,
                    price,
                    amount,
                ));
                TickEvent::EntryFailed
            }
        }
    }

    fn exit(&mut self, price: f64, amount: f64) -> TickEvent {
        let (base, quote_token) = split_pair(&self.strategy.asset);

        match self.execute(base, quote_token, amount) {
            Ok(tx_reference) => {
                info!(
                    strategy = %self.strategy.name,
                    price,
                    amount,
                    tx = %tx_reference,
                    "exit filled"
                );
                self.tracker.record_trade(Trade::executed(
                    &self.strategy.name,
                    TradeSide::Sell,
                    &self.strategy.asset,
                    price,
                    amount,
                    Some(tx_reference),
                ));
                self.state = PositionState::AwaitingEntry;
                TickEvent::Exited
            }
            Err(err) => {
                // Position stays open; the next tick retries the exit.
                warn!(strategy = %self.strategy.name, %err, "exit swap failed");
                self.tracker.record_trade(Trade::failed(
                    &self.strategy.name,
                    TradeSide::Sell,
                    &self.strategy.asset,
                    price,
                    amount,
                ));
                TickEvent::ExitFailed
            }
        }
    }

    fn execute(&self, input: &str, output: &str, amount: f64) -> Result<String, SolpilotError> {
        let quote = self.swap.get_quote(input, output, amount, SLIPPAGE_BPS)?;
        let receipt = self.swap.execute_swap(&quote)?;
        Ok(receipt.tx_reference)
    }

    /// Tick on a fixed interval until deactivated or the tick bound is hit.
    /// The flag is only checked between ticks.
    pub async fn run(&mut self, active: Arc<AtomicBool>) {
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        info!(
            strategy = %self.strategy.name,
            asset = %self.strategy.asset,
            interval_ms = self.config.poll_interval_ms,
            "monitoring started"
        );

        while active.load(Ordering::SeqCst) {
            if let Some(max) = self.config.max_ticks {
                if self.ticks >= max {
                    break;
                }
            }
            interval.tick().await;
            self.tick();
        }

        info!(strategy = %self.strategy.name, ticks = self.ticks, "monitoring stopped");
    }
}

/// ("SOL", "USDC") from "SOL/USDC"; a bare symbol trades against USDC.
fn split_pair(asset: &str) -> (&str, &str) {
    match asset.split_once('/') {
        Some((base, quote)) => (base, quote),
        None => (asset, "USDC"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::{
        ConditionOp, ConditionType, ExecutionType, StrategyCondition, Timeframe,
    };
    use crate::domain::trade::TradeStatus;
    use crate::ports::price_feed_port::PriceQuote;
    use crate::ports::swap_port::{SwapQuote, SwapReceipt};
    use approx::assert_relative_eq;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Feed scripted with a fixed price sequence; `None` entries simulate
    /// transient failures.
    struct ScriptedFeed {
        prices: Mutex<Vec<Option<f64>>>,
    }

    impl ScriptedFeed {
        fn new(prices: Vec<Option<f64>>) -> Arc<Self> {
            Arc::new(ScriptedFeed {
                prices: Mutex::new(prices),
            })
        }
    }

    impl PriceFeedPort for ScriptedFeed {
        fn get_price(&self, symbol: &str) -> Result<PriceQuote, SolpilotError> {
            let mut prices = self.prices.lock().unwrap();
            match prices.remove(0) {
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

    struct StubSwap {
        fail: bool,
    }

    impl SwapPort for StubSwap {
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
            if self.fail {
                return Err(SolpilotError::SwapFailed {
                    reason: "stubbed rejection".into(),
                });
            }
            Ok(SwapReceipt {
                tx_reference: "sim-test".into(),
                input_amount: quote.in_amount,
                output_amount: quote.out_amount,
                price_impact_pct: quote.price_impact_pct,
            })
        }
    }

    fn price_condition(op: ConditionOp, value: f64) -> StrategyCondition {
        StrategyCondition {
            condition_type: ConditionType::Price,
            indicator: None,
            op,
            value,
            timeframe: Some(Timeframe::M15),
        }
    }

    fn drop_rise_strategy() -> ParsedStrategy {
        ParsedStrategy {
            name: "SOL Custom Strategy".into(),
            asset: "SOL/USDC".into(),
            entry: price_condition(ConditionOp::Below, 5.0),
            exit: price_condition(ConditionOp::Above, 5.0),
            max_position: 500.0,
            risk_percent: 10.0,
            execution_type: ExecutionType::Market,
            stop_loss: None,
            take_profit: None,
        }
    }

    fn monitor(feed: Arc<dyn PriceFeedPort>, fail_swap: bool) -> StrategyMonitor {
        StrategyMonitor::new(
            drop_rise_strategy(),
            feed,
            Arc::new(StubSwap { fail: fail_swap }),
            MonitorConfig::default(),
        )
    }

    #[test]
    fn entry_fires_on_price_drop() {
        let feed = ScriptedFeed::new(vec![Some(100.0), Some(94.0)]);
        let mut mon = monitor(feed, false);

        assert_eq!(mon.tick(), TickEvent::NoSignal);
        assert_eq!(mon.tick(), TickEvent::Entered);
        assert!(mon.has_open_position());

        let trades = mon.trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].side, TradeSide::Buy);
        assert_relative_eq!(trades[0].amount, 500.0 / 94.0);
        assert_eq!(trades[0].tx_signature.as_deref(), Some("sim-test"));
    }

    #[test]
    fn full_entry_exit_cycle_realizes_pnl() {
        let feed = ScriptedFeed::new(vec![Some(100.0), Some(94.0), Some(100.0)]);
        let mut mon = monitor(feed, false);

        mon.tick();
        assert_eq!(mon.tick(), TickEvent::Entered);
        // 94 -> 100 is +6.4%, beyond the 5% exit threshold.
        assert_eq!(mon.tick(), TickEvent::Exited);
        assert!(!mon.has_open_position());

        let perf = mon.performance();
        assert_eq!(perf.realized_pairs, 1);
        assert_relative_eq!(perf.total_pnl, (100.0 - 94.0) * (500.0 / 94.0));
        assert_relative_eq!(perf.win_rate, 100.0);
    }

    #[test]
    fn feed_outage_uses_cached_price() {
        let feed = ScriptedFeed::new(vec![Some(100.0), None, Some(94.0)]);
        let mut mon = monitor(feed, false);

        mon.tick();
        // Outage repeats the cached 100.0: zero change, no signal.
        assert_eq!(mon.tick(), TickEvent::NoSignal);
        assert_eq!(mon.evaluator.history("SOL/USDC"), &[100.0, 100.0]);
        assert_eq!(mon.tick(), TickEvent::Entered);
    }

    #[test]
    fn feed_outage_without_cache_uses_fallback() {
        let feed = ScriptedFeed::new(vec![None]);
        let mut mon = monitor(feed, false);
        mon.tick();
        assert_eq!(
            mon.evaluator.history("SOL/USDC"),
            &[DEFAULT_FALLBACK_PRICE]
        );
    }

    #[test]
    fn failed_entry_swap_keeps_awaiting_entry() {
        let feed = ScriptedFeed::new(vec![Some(100.0), Some(94.0)]);
        let mut mon = monitor(feed, true);

        mon.tick();
        assert_eq!(mon.tick(), TickEvent::EntryFailed);
        assert!(!mon.has_open_position());

        let trades = mon.trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].status, TradeStatus::Failed);
        assert_eq!(trades[0].tx_signature, None);
        assert_eq!(mon.performance().realized_pairs, 0);
    }

    #[test]
    fn stop_loss_forces_exit() {
        let mut strategy = drop_rise_strategy();
        strategy.stop_loss = Some(5.0);
        let feed = ScriptedFeed::new(vec![Some(100.0), Some(94.0), Some(88.0)]);
        let mut mon = StrategyMonitor::new(
            strategy,
            feed,
            Arc::new(StubSwap { fail: false }),
            MonitorConfig::default(),
        );

        mon.tick();
        assert_eq!(mon.tick(), TickEvent::Entered);
        // 88 <= 94 * 0.95: stop loss wins even though the exit condition
        // (a 5% rise) is nowhere near firing.
        assert_eq!(mon.tick(), TickEvent::Exited);
        assert!(mon.performance().total_pnl < 0.0);
    }

    #[test]
    fn take_profit_forces_exit() {
        let mut strategy = drop_rise_strategy();
        strategy.exit = price_condition(ConditionOp::Above, 50.0);
        strategy.take_profit = Some(3.0);
        let feed = ScriptedFeed::new(vec![Some(100.0), Some(94.0), Some(97.0)]);
        let mut mon = StrategyMonitor::new(
            strategy,
            feed,
            Arc::new(StubSwap { fail: false }),
            MonitorConfig::default(),
        );

        mon.tick();
        mon.tick();
        // +3.19% from entry: take profit at 3% fires first.
        assert_eq!(mon.tick(), TickEvent::Exited);
        assert!(mon.performance().total_pnl > 0.0);
    }

    #[test]
    fn split_pair_variants() {
        assert_eq!(split_pair("SOL/USDC"), ("SOL", "USDC"));
        assert_eq!(split_pair("BTC/USD"), ("BTC", "USD"));
        assert_eq!(split_pair("BONK"), ("BONK", "USDC"));
    }

    #[test]
    fn config_validation() {
        struct BadConfig;
        impl ConfigPort for BadConfig {
            fn get_string(&self, _: &str, _: &str) -> Option<String> {
                None
            }
            fn get_int(&self, _: &str, _: &str, _: i64) -> i64 {
                0
            }
            fn get_double(&self, _: &str, _: &str, default: f64) -> f64 {
                default
            }
            fn get_bool(&self, _: &str, _: &str, default: bool) -> bool {
                default
            }
        }
        assert!(MonitorConfig::from_config(&BadConfig).is_err());
    }

    #[tokio::test]
    async fn run_stops_when_deactivated() {
        let feed = ScriptedFeed::new(vec![Some(100.0); 64]);
        let mut mon = monitor(feed, false);
        mon.config.poll_interval_ms = 1;
        mon.config.max_ticks = Some(5);

        let active = Arc::new(AtomicBool::new(true));
        mon.run(active.clone()).await;
        assert_eq!(mon.ticks, 5);

        // Already-deactivated flag: no further ticks.
        active.store(false, Ordering::SeqCst);
        mon.run(active).await;
        assert_eq!(mon.ticks, 5);
    }
}
