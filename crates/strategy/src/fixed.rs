use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use lottery_core::ConfigError;

use crate::error::StrategyError;
use crate::options::parse_options;
use crate::traits::{StakeContext, StakeProposal, StakingStrategy, StrategyState};

/// Options of the `fixed` strategy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixedOptions {
    /// Stake placed on each candidate.
    pub amount: Decimal,
    /// Number of top-ranked candidates to bet on. `None` bets on all of them.
    pub count: Option<usize>,
}

impl Default for FixedOptions {
    fn default() -> Self {
        Self {
            amount: Decimal::from(10_000),
            count: None,
        }
    }
}

/// Stakes a constant amount on each of the first `count` ranked candidates.
#[derive(Debug, Clone)]
pub struct FixedStrategy {
    options: FixedOptions,
}

impl FixedStrategy {
    /// Validates options against the run's `top_k`.
    ///
    /// # Errors
    /// Returns an error for a non-positive amount, a zero count, or a count
    /// larger than `top_k`.
    pub fn new(options: FixedOptions, top_k: usize) -> Result<Self, ConfigError> {
        if options.amount <= Decimal::ZERO {
            return Err(ConfigError::strategy_options(
                "fixed",
                format!("amount must be positive, got {}", options.amount),
            ));
        }
        match options.count {
            Some(0) => {
                return Err(ConfigError::strategy_options("fixed", "count must be at least 1"));
            }
            Some(count) if count > top_k => {
                return Err(ConfigError::strategy_options(
                    "fixed",
                    format!("count {count} exceeds top_k {top_k}"),
                ));
            }
            _ => {}
        }
        Ok(Self { options })
    }

    /// # Errors
    /// Returns an error when the options cannot be parsed or are invalid.
    pub fn from_options(options: &Map<String, Value>, top_k: usize) -> Result<Self, ConfigError> {
        Self::new(parse_options("fixed", options)?, top_k)
    }
}

impl StakingStrategy for FixedStrategy {
    fn name(&self) -> &str {
        "fixed"
    }

    fn propose(
        &self,
        ctx: &StakeContext<'_>,
        _state: &StrategyState,
    ) -> Result<StakeProposal, StrategyError> {
        let count = self
            .options
            .count
            .unwrap_or(ctx.predictions.len())
            .min(ctx.predictions.len());

        let mut proposal = StakeProposal::empty(ctx.date);
        for prediction in ctx.predictions.entries.iter().take(count) {
            proposal.push(prediction.number.clone(), self.options.amount);
        }
        Ok(proposal)
    }
}
