pub mod backtest_config;
pub mod config;
pub mod config_loader;
pub mod draw;
pub mod error;
pub mod kelly;
pub mod money;
pub mod prediction;
pub mod traits;

pub use backtest_config::{BacktestConfig, PayoutRules, RiskLimits, StrategyDescriptor};
pub use config::{AppConfig, DataConfig, EngineSettings, ServerConfig, MAX_CURRENCY_SCALE};
pub use config_loader::ConfigLoader;
pub use draw::{coalesce_by_date, head_of, DrawRecord};
pub use error::{ConfigError, ModelError, ProviderError};
pub use kelly::{BetDecision, BetReason, KellySizer};
pub use prediction::{Prediction, PredictionSet};
pub use traits::{DrawHistoryProvider, PredictionModel, ScoreRequest};
