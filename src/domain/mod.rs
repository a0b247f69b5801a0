//! Core domain types and logic.

pub mod error;
pub mod indicator;
pub mod strategy;
pub mod strategy_parser;
pub mod evaluator;
pub mod trade;
pub mod pnl;
pub mod yields;
pub mod position;
pub mod rebalance;
pub mod monitor;
