//! Error types shared by the backtesting crates.

use chrono::NaiveDate;
use thiserror::Error;

/// Invalid run input. Always raised before any simulated day.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Initial capital must be strictly positive.
    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(String),

    /// Start of the date range lies after its end.
    #[error("date_start {start} is after date_end {end}")]
    InvertedDateRange {
        /// Requested first date.
        start: NaiveDate,
        /// Requested last date.
        end: NaiveDate,
    },

    /// Head length outside the supported range.
    #[error("digits must be between 1 and 5, got {0}")]
    DigitsOutOfRange(u8),

    /// top_k must request at least one candidate.
    #[error("top_k must be at least 1")]
    ZeroTopK,

    /// A risk ratio outside (0, 1].
    #[error("{name} must be in (0, 1], got {value}")]
    RiskRatioOutOfRange {
        /// Field name of the offending ratio.
        name: &'static str,
        /// Value as supplied.
        value: String,
    },

    /// Payout rules that cannot describe a wager.
    #[error("invalid payout rules: {0}")]
    InvalidPayout(String),

    /// Lookback window of zero draws.
    #[error("lookback_draws must be at least 1 when set")]
    ZeroLookback,

    /// Strategy options that fail validation.
    #[error("invalid options for strategy '{strategy}': {reason}")]
    InvalidStrategyOptions {
        /// Strategy type name.
        strategy: String,
        /// Human readable cause.
        reason: String,
    },
}

impl ConfigError {
    /// Creates an invalid strategy options error.
    pub fn strategy_options(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStrategyOptions {
            strategy: strategy.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of a draw history source.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested range holds no draws.
    #[error("no draws for region {region:?} between {start} and {end}")]
    NoData {
        /// Region filter, if any.
        region: Option<String>,
        /// First requested date.
        start: NaiveDate,
        /// Last requested date.
        end: NaiveDate,
    },

    /// Underlying storage could not be read.
    #[error("draw storage error: {0}")]
    Storage(String),

    /// Stored data could not be parsed.
    #[error("malformed draw record: {0}")]
    Parse(String),
}

/// Failures raised by a prediction model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The model cannot operate on the requested inputs.
    #[error("model '{model}' rejected the request: {reason}")]
    InvalidRequest {
        /// Model id.
        model: String,
        /// Human readable cause.
        reason: String,
    },

    /// The model produced a ranking that violates the prediction set rules.
    #[error("model '{model}' produced an invalid prediction set: {reason}")]
    InvalidOutput {
        /// Model id.
        model: String,
        /// Human readable cause.
        reason: String,
    },
}
