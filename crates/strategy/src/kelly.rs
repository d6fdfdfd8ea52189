use lottery_core::money::decimal_from_f64;
use lottery_core::{ConfigError, KellySizer};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::StrategyError;
use crate::options::{parse_options, require_ratio};
use crate::traits::{StakeContext, StakeProposal, StakingStrategy, StrategyState};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KellyOptions {
    /// Upper bound on the Kelly fraction per candidate.
    pub max_ratio: Decimal,
}

impl Default for KellyOptions {
    fn default() -> Self {
        Self {
            max_ratio: Decimal::new(10, 2),
        }
    }
}

/// Sizes each candidate by its capped Kelly fraction.
///
/// The payout multiplier is the run's `jackpot_multiplier`. Candidates without
/// an edge are left out of the proposal.
#[derive(Debug, Clone)]
pub struct KellyStrategy {
    sizer: KellySizer,
}

impl KellyStrategy {
    /// # Errors
    /// Returns an error when `max_ratio` is outside `(0, 1]`.
    pub fn new(options: KellyOptions) -> Result<Self, ConfigError> {
        require_ratio("kelly", "max_ratio", options.max_ratio)?;
        Ok(Self {
            sizer: KellySizer::new(options.max_ratio),
        })
    }

    /// # Errors
    /// Returns an error when the options cannot be parsed or are invalid.
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, ConfigError> {
        Self::new(parse_options("kelly", options)?)
    }
}

impl StakingStrategy for KellyStrategy {
    fn name(&self) -> &str {
        "kelly"
    }

    fn propose(
        &self,
        ctx: &StakeContext<'_>,
        _state: &StrategyState,
    ) -> Result<StakeProposal, StrategyError> {
        let multiplier = ctx.payout_rules.jackpot_multiplier;
        let mut proposal = StakeProposal::empty(ctx.date);

        for prediction in &ctx.predictions.entries {
            let p = decimal_from_f64(prediction.probability);
            let decision = self.sizer.size(p, multiplier, ctx.capital);
            trace!(
                number = %prediction.number,
                fraction = %decision.full_kelly_fraction,
                reason = ?decision.reason,
                "kelly sizing"
            );
            if decision.should_bet {
                proposal.push(prediction.number.clone(), decision.stake);
            }
        }
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;
    use rust_decimal_macros::dec;

    #[test]
    fn excludes_candidates_without_edge() {
        // b = 70: break-even probability is 1/71
        let fixture = Fixture::new(&[("12", 0.05), ("34", 0.01)]);
        let strategy = KellyStrategy::new(KellyOptions::default()).unwrap();
        let proposal = strategy
            .propose(&fixture.ctx(dec!(1000000)), &StrategyState::Stateless)
            .unwrap();

        assert_eq!(proposal.stakes.len(), 1);
        assert_eq!(proposal.stakes[0].number, "12");
    }

    #[test]
    fn stake_is_fraction_of_capital() {
        let fixture = Fixture::new(&[("12", 0.05)]);
        let strategy = KellyStrategy::new(KellyOptions::default()).unwrap();
        let proposal = strategy
            .propose(&fixture.ctx(dec!(1000000)), &StrategyState::Stateless)
            .unwrap();

        // f = (0.05 * 70 - 0.95) / 70
        let expected = dec!(1000000) * ((dec!(0.05) * dec!(70) - dec!(0.95)) / dec!(70));
        assert_eq!(proposal.stakes[0].raw_stake, expected);
    }

    #[test]
    fn fraction_is_capped() {
        let fixture = Fixture::new(&[("12", 0.9)]);
        let strategy = KellyStrategy::new(KellyOptions {
            max_ratio: dec!(0.05),
        })
        .unwrap();
        let proposal = strategy
            .propose(&fixture.ctx(dec!(1000)), &StrategyState::Stateless)
            .unwrap();
        assert_eq!(proposal.stakes[0].raw_stake, dec!(50));
    }
}
