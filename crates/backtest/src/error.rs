use chrono::NaiveDate;
use lottery_core::{ConfigError, ProviderError};
use lottery_strategy::StrategyError;
use thiserror::Error;

/// Failures that prevent a run from producing a report.
///
/// Errors raised after the first simulated day do not surface here; they end
/// the run early and are recorded in the report instead.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No draws exist for the requested range and region.
    #[error("no draws available for region {region:?} between {start} and {end}")]
    DataUnavailable {
        region: Option<String>,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("draw history provider failed: {0}")]
    Provider(ProviderError),

    #[error("unknown prediction model '{0}'")]
    UnknownModel(String),

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

impl BacktestError {
    /// True for errors caused by the request rather than the data or the host.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::UnknownModel(_) | Self::Strategy(_)
        )
    }
}

impl From<ProviderError> for BacktestError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NoData { region, start, end } => {
                Self::DataUnavailable { region, start, end }
            }
            other => Self::Provider(other),
        }
    }
}
