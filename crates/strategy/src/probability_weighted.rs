use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use lottery_core::ConfigError;

use crate::error::StrategyError;
use crate::options::{parse_options, proportional_split, require_ratio};
use crate::traits::{StakeContext, StakeProposal, StakingStrategy, StrategyState};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbabilityWeightedOptions {
    /// Fraction of the day's capital distributed across candidates.
    pub budget_ratio: Decimal,
}

impl Default for ProbabilityWeightedOptions {
    fn default() -> Self {
        Self {
            budget_ratio: Decimal::new(10, 2),
        }
    }
}

/// Distributes `capital * budget_ratio` in exact proportion to probability.
#[derive(Debug, Clone)]
pub struct ProbabilityWeightedStrategy {
    options: ProbabilityWeightedOptions,
}

impl ProbabilityWeightedStrategy {
    /// # Errors
    /// Returns an error when `budget_ratio` is outside `(0, 1]`.
    pub fn new(options: ProbabilityWeightedOptions) -> Result<Self, ConfigError> {
        require_ratio("probability_weighted", "budget_ratio", options.budget_ratio)?;
        Ok(Self { options })
    }

    /// # Errors
    /// Returns an error when the options cannot be parsed or are invalid.
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, ConfigError> {
        Self::new(parse_options("probability_weighted", options)?)
    }
}

impl StakingStrategy for ProbabilityWeightedStrategy {
    fn name(&self) -> &str {
        "probability_weighted"
    }

    fn propose(
        &self,
        ctx: &StakeContext<'_>,
        _state: &StrategyState,
    ) -> Result<StakeProposal, StrategyError> {
        let budget = ctx.capital * self.options.budget_ratio;
        let mut proposal = StakeProposal::empty(ctx.date);
        for (number, stake) in proportional_split(budget, ctx.predictions) {
            proposal.push(number, stake);
        }
        Ok(proposal)
    }
}
