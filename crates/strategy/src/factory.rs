//! Resolves a `StrategyDescriptor` into a boxed strategy.

use std::fmt;
use std::str::FromStr;

use lottery_core::{ConfigError, StrategyDescriptor};
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;
use crate::fixed::FixedStrategy;
use crate::kelly::KellyStrategy;
use crate::martingale::MartingaleStrategy;
use crate::percentage::PercentageStrategy;
use crate::plugin::{PluginRegistry, PluginStaking};
use crate::probability_weighted::ProbabilityWeightedStrategy;
use crate::traits::StakingStrategy;

/// Built-in strategy types selected by `strategy.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Fixed,
    Percentage,
    Kelly,
    Martingale,
    ProbabilityWeighted,
    Plugin,
}

/// Coarse risk label shown next to a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    MediumHigh,
    High,
    Variable,
}

impl StrategyKind {
    pub const ALL: [Self; 6] = [
        Self::Fixed,
        Self::Percentage,
        Self::Kelly,
        Self::Martingale,
        Self::ProbabilityWeighted,
        Self::Plugin,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
            Self::Kelly => "kelly",
            Self::Martingale => "martingale",
            Self::ProbabilityWeighted => "probability_weighted",
            Self::Plugin => "plugin",
        }
    }

    #[must_use]
    pub const fn risk_level(self) -> RiskLevel {
        match self {
            Self::Fixed => RiskLevel::Low,
            Self::Percentage | Self::ProbabilityWeighted => RiskLevel::Medium,
            Self::Kelly => RiskLevel::MediumHigh,
            Self::Martingale => RiskLevel::High,
            Self::Plugin => RiskLevel::Variable,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Fixed => "Constant amount on each of the top ranked numbers",
            Self::Percentage => "Share of current capital split by probability",
            Self::Kelly => "Capped Kelly fraction per number",
            Self::Martingale => "Grows the stake after a losing day, resets after a win",
            Self::ProbabilityWeighted => "Capital budget distributed in proportion to probability",
            Self::Plugin => "Externally registered strategy",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| StrategyError::UnknownStrategy(s.to_string()))
    }
}

/// Builds the strategy named by `descriptor`.
///
/// Options are validated here, so a bad descriptor fails before any day is
/// simulated.
///
/// # Errors
/// Returns `UnknownStrategy` or `UnknownPlugin` for unresolvable names and
/// `InvalidOptions` when the options fail validation.
pub fn build_strategy(
    descriptor: &StrategyDescriptor,
    top_k: usize,
    plugins: &PluginRegistry,
) -> Result<Box<dyn StakingStrategy>, StrategyError> {
    let options = &descriptor.options;
    let strategy: Box<dyn StakingStrategy> = match descriptor.kind.parse::<StrategyKind>()? {
        StrategyKind::Fixed => Box::new(FixedStrategy::from_options(options, top_k)?),
        StrategyKind::Percentage => Box::new(PercentageStrategy::from_options(options)?),
        StrategyKind::Kelly => Box::new(KellyStrategy::from_options(options)?),
        StrategyKind::Martingale => Box::new(MartingaleStrategy::from_options(options)?),
        StrategyKind::ProbabilityWeighted => {
            Box::new(ProbabilityWeightedStrategy::from_options(options)?)
        }
        StrategyKind::Plugin => {
            let plugin_id = descriptor.plugin_id.as_deref().ok_or_else(|| {
                ConfigError::strategy_options("plugin", "plugin_id is required")
            })?;
            let plugin = plugins
                .get(plugin_id)
                .ok_or_else(|| StrategyError::UnknownPlugin(plugin_id.to_string()))?;
            Box::new(PluginStaking::new(plugin_id, plugin, options.clone()))
        }
    };
    Ok(strategy)
}
