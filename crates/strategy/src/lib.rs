//! Staking strategies and risk limiting.
//!
//! A strategy turns a day's ranked predictions and capital into a raw
//! [`StakeProposal`]; the [`RiskLimiter`] then enforces the per-number and
//! per-day caps before anything is wagered.

pub mod error;
pub mod factory;
pub mod fixed;
pub mod kelly;
pub mod martingale;
mod options;
pub mod percentage;
pub mod plugin;
pub mod probability_weighted;
pub mod risk_limiter;
pub mod traits;

#[cfg(test)]
mod fixtures;

pub use error::StrategyError;
pub use factory::{build_strategy, RiskLevel, StrategyKind};
pub use fixed::{FixedOptions, FixedStrategy};
pub use kelly::{KellyOptions, KellyStrategy};
pub use martingale::{MartingaleOptions, MartingaleStrategy};
pub use percentage::{PercentageOptions, PercentageStrategy};
pub use plugin::{PluginRegistry, PluginRequest, PluginRiskLimits, PluginStake, PluginStaking, PluginStrategy};
pub use probability_weighted::{ProbabilityWeightedOptions, ProbabilityWeightedStrategy};
pub use risk_limiter::{ClampedStake, RiskLimiter};
pub use traits::{
    DayOutcome, DaySnapshot, ProposedStake, StakeContext, StakeProposal, StakingStrategy,
    StrategyState,
};
