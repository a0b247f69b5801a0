//! Domain error types.
//!
//! The monitoring core itself never fails: parsing resolves to defaults,
//! indicators fall back to neutral values, and unreachable data sources
//! degrade to cached or synthetic prices. These variants cover the edges
//! where an error is still meaningful — configuration, the swap execution
//! path, and IO around the CLI.

/// Top-level error type for solpilot.
#[derive(Debug, thiserror::Error)]
pub enum SolpilotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price feed unavailable for {symbol}: {reason}")]
    FeedUnavailable { symbol: String, reason: String },

    #[error("yield source '{name}' unavailable: {reason}")]
    YieldSourceUnavailable { name: String, reason: String },

    #[error("quote failed for {input}->{output}: {reason}")]
    QuoteFailed {
        input: String,
        output: String,
        reason: String,
    },

    #[error("swap execution failed: {reason}")]
    SwapFailed { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SolpilotError> for std::process::ExitCode {
    fn from(err: &SolpilotError) -> Self {
        let code: u8 = match err {
            SolpilotError::Io(_) => 1,
            SolpilotError::ConfigParse { .. } | SolpilotError::ConfigInvalid { .. } => 2,
            SolpilotError::FeedUnavailable { .. }
            | SolpilotError::YieldSourceUnavailable { .. } => 3,
            SolpilotError::QuoteFailed { .. } | SolpilotError::SwapFailed { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
