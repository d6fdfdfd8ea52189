//! Strategy failures.

use lottery_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    /// Options rejected while building the strategy.
    #[error(transparent)]
    InvalidOptions(#[from] ConfigError),

    #[error("unknown strategy type '{0}'")]
    UnknownStrategy(String),

    #[error("unknown plugin '{0}'")]
    UnknownPlugin(String),

    /// A plugin returned an error or panicked.
    #[error("plugin '{plugin_id}' failed: {reason}")]
    PluginInvocation { plugin_id: String, reason: String },

    /// A proposal that breaks the proposal rules.
    #[error("strategy '{strategy}' returned a malformed proposal: {reason}")]
    MalformedOutput { strategy: String, reason: String },
}

impl StrategyError {
    /// Short machine readable kind, used in report error markers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidOptions(_) => "invalid_options",
            Self::UnknownStrategy(_) => "unknown_strategy",
            Self::UnknownPlugin(_) => "unknown_plugin",
            Self::PluginInvocation { .. } => "plugin_error",
            Self::MalformedOutput { .. } => "malformed_proposal",
        }
    }
}
