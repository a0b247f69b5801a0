//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::simulated_feed::{SimulatedFeed, DEFAULT_VOLATILITY};
use crate::adapters::simulated_swap::SimulatedSwap;
use crate::adapters::simulated_yields::{SimulatedDefiSource, SimulatedStakingSource};
use crate::domain::error::SolpilotError;
use crate::domain::monitor::{MonitorConfig, StrategyMonitor};
use crate::domain::pnl::StrategyPerformance;
use crate::domain::position::Position;
use crate::domain::rebalance::{analyze_positions, generate_optimal_allocation, RiskTolerance};
use crate::domain::strategy_parser;
use crate::domain::trade::Trade;
use crate::domain::yields::{RiskLevel, YieldAggregator};

#[derive(Parser, Debug)]
#[command(name = "solpilot", about = "Strategy monitoring and yield analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a free-text strategy and print the structured result
    Parse {
        /// Strategy description, e.g. "Buy SOL when RSI drops below 30"
        text: String,
    },
    /// Monitor a strategy against the simulated feed
    Monitor {
        /// Strategy description
        text: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the poll interval
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many ticks instead of running until Ctrl-C
        #[arg(long)]
        ticks: Option<u64>,
        /// Reject every swap execution
        #[arg(long)]
        fail_swaps: bool,
    },
    /// Show current protocol yields
    Yields {
        /// Only the top N pools by APY
        #[arg(long)]
        top: Option<usize>,
        /// Filter by risk level: low, medium or high
        #[arg(long)]
        risk: Option<String>,
    },
    /// Recommend rebalancing moves for existing positions
    Rebalance {
        /// JSON file with the current positions
        #[arg(short, long)]
        positions: PathBuf,
        #[arg(long, default_value = "balanced")]
        risk: String,
    },
    /// Generate an optimal allocation for a portfolio value
    Allocate {
        /// Total portfolio value, USD
        total: f64,
        #[arg(long, default_value = "balanced")]
        risk: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Parse { text } => run_parse(&text),
        Command::Monitor {
            text,
            config,
            interval_ms,
            ticks,
            fail_swaps,
        } => run_monitor(&text, config.as_ref(), interval_ms, ticks, fail_swaps),
        Command::Yields { top, risk } => run_yields(top, risk.as_deref()),
        Command::Rebalance { positions, risk } => run_rebalance(&positions, &risk),
        Command::Allocate { total, risk } => run_allocate(total, &risk),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run_parse(text: &str) -> ExitCode {
    print_json(&strategy_parser::parse(text))
}

#[derive(Serialize)]
struct MonitorReport<'a> {
    strategy: &'a crate::domain::strategy::ParsedStrategy,
    trades: &'a [Trade],
    performance: StrategyPerformance,
}

fn run_monitor(
    text: &str,
    config_path: Option<&PathBuf>,
    interval_ms: Option<u64>,
    ticks: Option<u64>,
    fail_swaps: bool,
) -> ExitCode {
    let strategy = strategy_parser::parse(text);
    eprintln!("Monitoring strategy: {}", strategy.name);

    let mut monitor_config = MonitorConfig::default();
    let mut volatility = DEFAULT_VOLATILITY;
    let mut failure_rate = 0.0;
    if let Some(path) = config_path {
        let adapter = match load_config(path) {
            Ok(a) => a,
            Err(code) => return code,
        };
        monitor_config = match MonitorConfig::from_config(&adapter) {
            Ok(c) => c,
            Err(err) => {
                eprintln!("error: {err}");
                return (&err).into();
            }
        };
        use crate::ports::config_port::ConfigPort;
        volatility = adapter.get_double("feed", "volatility", DEFAULT_VOLATILITY);
        failure_rate = adapter.get_double("feed", "failure_rate", 0.0);
    }
    if let Some(interval) = interval_ms {
        monitor_config.poll_interval_ms = interval.max(1);
    }
    monitor_config.max_ticks = ticks;

    let feed = Arc::new(SimulatedFeed::with_settings(volatility, failure_rate));
    let swap: Arc<SimulatedSwap> = if fail_swaps {
        Arc::new(SimulatedSwap::failing())
    } else {
        Arc::new(SimulatedSwap::new())
    };
    let mut monitor = StrategyMonitor::new(strategy, feed, swap, monitor_config);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            let err = SolpilotError::Io(err);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let active = Arc::new(AtomicBool::new(true));
    runtime.block_on(async {
        let flag = active.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                flag.store(false, Ordering::SeqCst);
            } else {
                warn!("ctrl-c handler unavailable");
            }
        });
        monitor.run(active).await;
    });

    let report = MonitorReport {
        strategy: monitor.strategy(),
        trades: monitor.trades(),
        performance: monitor.performance(),
    };
    print_json(&report)
}

fn build_aggregator() -> YieldAggregator {
    let mut aggregator = YieldAggregator::new();
    aggregator.add_source(Box::new(SimulatedStakingSource));
    aggregator.add_source(Box::new(SimulatedDefiSource));
    aggregator.refresh();
    aggregator
}

fn run_yields(top: Option<usize>, risk: Option<&str>) -> ExitCode {
    let aggregator = build_aggregator();
    match (top, risk) {
        (_, Some(level)) => match RiskLevel::parse(level) {
            Some(level) => {
                let mut yields = aggregator.yields_by_risk(level);
                if let Some(n) = top {
                    yields.truncate(n);
                }
                print_json(&yields)
            }
            None => {
                eprintln!("error: unknown risk level '{level}' (expected low, medium or high)");
                ExitCode::from(2)
            }
        },
        (Some(n), None) => print_json(&aggregator.top_yields(n)),
        (None, None) => print_json(&aggregator.all_yields()),
    }
}

fn parse_tolerance(risk: &str) -> Result<RiskTolerance, ExitCode> {
    RiskTolerance::parse(risk).ok_or_else(|| {
        eprintln!(
            "error: unknown risk tolerance '{risk}' (expected conservative, balanced or aggressive)"
        );
        ExitCode::from(2)
    })
}

fn run_rebalance(positions_path: &PathBuf, risk: &str) -> ExitCode {
    let tolerance = match parse_tolerance(risk) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let content = match fs::read_to_string(positions_path) {
        Ok(c) => c,
        Err(err) => {
            let err = SolpilotError::Io(err);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    let positions: Vec<Position> = match serde_json::from_str(&content) {
        Ok(p) => p,
        Err(err) => {
            eprintln!(
                "error: invalid positions file {}: {err}",
                positions_path.display()
            );
            return ExitCode::from(2);
        }
    };

    let aggregator = build_aggregator();
    let recommendations = analyze_positions(aggregator.all_yields(), &positions, tolerance);
    if recommendations.is_empty() {
        eprintln!("No rebalancing needed");
    }
    print_json(&recommendations)
}

fn run_allocate(total: f64, risk: &str) -> ExitCode {
    let tolerance = match parse_tolerance(risk) {
        Ok(t) => t,
        Err(code) => return code,
    };
    if !total.is_finite() || total <= 0.0 {
        eprintln!("error: total must be a positive amount");
        return ExitCode::from(2);
    }

    let aggregator = build_aggregator();
    print_json(&generate_optimal_allocation(
        aggregator.all_yields(),
        total,
        tolerance,
    ))
}
