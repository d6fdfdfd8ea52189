//! Martingale progression: double after a losing day, reset after a win.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use lottery_core::ConfigError;

use crate::error::StrategyError;
use crate::options::parse_options;
use crate::traits::{DayOutcome, StakeContext, StakeProposal, StakingStrategy, StrategyState};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MartingaleOptions {
    /// Stake after a win and on the first day.
    pub base: Decimal,
    /// Growth factor applied after a losing day.
    pub multiplier: Decimal,
}

impl Default for MartingaleOptions {
    fn default() -> Self {
        Self {
            base: Decimal::from(10_000),
            multiplier: Decimal::TWO,
        }
    }
}

/// Stakes `current_stake` on the top-ranked candidate.
///
/// A day counts as lost when bets were placed and none of them hit. Days
/// without bets leave the progression untouched. The progression tracks the
/// strategy's own stake, before any risk clamping.
#[derive(Debug, Clone)]
pub struct MartingaleStrategy {
    options: MartingaleOptions,
}

impl MartingaleStrategy {
    /// # Errors
    /// Returns an error for a non-positive base or a multiplier below one.
    pub fn new(options: MartingaleOptions) -> Result<Self, ConfigError> {
        if options.base <= Decimal::ZERO {
            return Err(ConfigError::strategy_options(
                "martingale",
                format!("base must be positive, got {}", options.base),
            ));
        }
        if options.multiplier < Decimal::ONE {
            return Err(ConfigError::strategy_options(
                "martingale",
                format!("multiplier must be at least 1, got {}", options.multiplier),
            ));
        }
        Ok(Self { options })
    }

    /// # Errors
    /// Returns an error when the options cannot be parsed or are invalid.
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, ConfigError> {
        Self::new(parse_options("martingale", options)?)
    }

    fn current_stake(&self, state: &StrategyState) -> Decimal {
        match state {
            StrategyState::Martingale { current_stake, .. } => *current_stake,
            StrategyState::Stateless => self.options.base,
        }
    }
}

impl StakingStrategy for MartingaleStrategy {
    fn name(&self) -> &str {
        "martingale"
    }

    fn initial_state(&self) -> StrategyState {
        StrategyState::Martingale {
            current_stake: self.options.base,
            consecutive_losses: 0,
        }
    }

    fn propose(
        &self,
        ctx: &StakeContext<'_>,
        state: &StrategyState,
    ) -> Result<StakeProposal, StrategyError> {
        let mut proposal = StakeProposal::empty(ctx.date);
        if let Some(top) = ctx.predictions.entries.first() {
            proposal.push(top.number.clone(), self.current_stake(state));
        }
        Ok(proposal)
    }

    fn advance(&self, state: StrategyState, outcome: &DayOutcome) -> StrategyState {
        if outcome.bets_placed == 0 {
            return state;
        }
        if outcome.any_hit {
            return self.initial_state();
        }

        let losses = match state {
            StrategyState::Martingale {
                consecutive_losses, ..
            } => consecutive_losses.saturating_add(1),
            StrategyState::Stateless => 1,
        };
        // A progression past `Decimal::MAX` holds at its last stake.
        let current = self.current_stake(&state);
        let next = current
            .checked_mul(self.options.multiplier)
            .unwrap_or(current);
        debug!(stake = %next, consecutive_losses = losses, "martingale progression");
        StrategyState::Martingale {
            current_stake: next,
            consecutive_losses: losses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;
    use rust_decimal_macros::dec;

    fn strategy() -> MartingaleStrategy {
        MartingaleStrategy::new(MartingaleOptions {
            base: dec!(1000),
            multiplier: dec!(2),
        })
        .unwrap()
    }

    fn stake_for(strategy: &MartingaleStrategy, state: &StrategyState) -> Decimal {
        let fixture = Fixture::new(&[("12", 0.5), ("34", 0.2)]);
        let proposal = strategy.propose(&fixture.ctx(dec!(1000000)), state).unwrap();
        assert_eq!(proposal.stakes.len(), 1);
        assert_eq!(proposal.stakes[0].number, "12");
        proposal.stakes[0].raw_stake
    }

    const MISS: DayOutcome = DayOutcome {
        bets_placed: 1,
        any_hit: false,
    };
    const HIT: DayOutcome = DayOutcome {
        bets_placed: 1,
        any_hit: true,
    };

    #[test]
    fn doubles_after_miss_and_resets_after_hit() {
        let strategy = strategy();
        let day1 = strategy.initial_state();
        assert_eq!(stake_for(&strategy, &day1), dec!(1000));

        let day2 = strategy.advance(day1, &MISS);
        assert_eq!(stake_for(&strategy, &day2), dec!(2000));

        let day3 = strategy.advance(day2, &HIT);
        assert_eq!(stake_for(&strategy, &day3), dec!(1000));
    }

    #[test]
    fn counts_consecutive_losses() {
        let strategy = strategy();
        let state = strategy.advance(strategy.advance(strategy.initial_state(), &MISS), &MISS);
        assert_eq!(
            state,
            StrategyState::Martingale {
                current_stake: dec!(4000),
                consecutive_losses: 2,
            }
        );
    }

    #[test]
    fn days_without_bets_keep_state() {
        let strategy = strategy();
        let state = strategy.advance(strategy.initial_state(), &MISS);
        let idle = DayOutcome {
            bets_placed: 0,
            any_hit: false,
        };
        assert_eq!(strategy.advance(state.clone(), &idle), state);
    }

    #[test]
    fn long_losing_streak_holds_at_largest_stake() {
        let strategy = MartingaleStrategy::new(MartingaleOptions {
            base: dec!(10000),
            multiplier: dec!(2),
        })
        .unwrap();
        let mut state = strategy.initial_state();
        let mut last = Decimal::ZERO;
        for _ in 0..200 {
            state = strategy.advance(state, &MISS);
            let stake = stake_for(&strategy, &state);
            assert!(stake >= last);
            last = stake;
        }
        assert!(last > Decimal::from(u64::MAX));
        assert_eq!(
            state,
            StrategyState::Martingale {
                current_stake: last,
                consecutive_losses: 200,
            }
        );

        let reset = strategy.advance(state, &HIT);
        assert_eq!(stake_for(&strategy, &reset), dec!(10000));
    }

    #[test]
    fn rejects_shrinking_multiplier() {
        let mut map = Map::new();
        map.insert("multiplier".into(), Value::from(0.5));
        assert!(MartingaleStrategy::from_options(&map).is_err());
    }
}
