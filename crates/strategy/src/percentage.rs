use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use lottery_core::ConfigError;

use crate::error::StrategyError;
use crate::options::{parse_options, proportional_split, require_ratio};
use crate::traits::{StakeContext, StakeProposal, StakingStrategy, StrategyState};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PercentageOptions {
    /// Fraction of the day's capital to stake in total.
    pub percent: Decimal,
}

impl Default for PercentageOptions {
    fn default() -> Self {
        Self {
            percent: Decimal::new(2, 2),
        }
    }
}

/// Stakes `capital * percent`, split by normalized probability.
#[derive(Debug, Clone)]
pub struct PercentageStrategy {
    options: PercentageOptions,
}

impl PercentageStrategy {
    /// # Errors
    /// Returns an error when `percent` is outside `(0, 1]`.
    pub fn new(options: PercentageOptions) -> Result<Self, ConfigError> {
        require_ratio("percentage", "percent", options.percent)?;
        Ok(Self { options })
    }

    /// # Errors
    /// Returns an error when the options cannot be parsed or are invalid.
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, ConfigError> {
        Self::new(parse_options("percentage", options)?)
    }
}

impl StakingStrategy for PercentageStrategy {
    fn name(&self) -> &str {
        "percentage"
    }

    fn propose(
        &self,
        ctx: &StakeContext<'_>,
        _state: &StrategyState,
    ) -> Result<StakeProposal, StrategyError> {
        let budget = ctx.capital * self.options.percent;
        let mut proposal = StakeProposal::empty(ctx.date);
        for (number, stake) in proportional_split(budget, ctx.predictions) {
            proposal.push(number, stake);
        }
        Ok(proposal)
    }
}
