pub mod file_config_adapter;
pub mod simulated_feed;
pub mod simulated_swap;
pub mod simulated_yields;
