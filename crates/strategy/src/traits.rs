//! The staking strategy contract and the values that flow through it.

use chrono::NaiveDate;
use lottery_core::{PayoutRules, PredictionSet, RiskLimits};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// Compact record of a finished day, handed to strategies as recent history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySnapshot {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub capital_end: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl: Decimal,
    /// True when at least one bet of the day hit.
    pub hit: bool,
}

/// Everything a strategy may look at when sizing one day.
#[derive(Debug, Clone, Copy)]
pub struct StakeContext<'a> {
    pub date: NaiveDate,
    /// 0-based position of the day within the run.
    pub day_index: usize,
    /// Capital at the start of the day.
    pub capital: Decimal,
    pub predictions: &'a PredictionSet,
    /// Most recent finished days, oldest first.
    pub history: &'a [DaySnapshot],
    pub risk_limits: &'a RiskLimits,
    pub payout_rules: &'a PayoutRules,
}

/// One raw stake before risk clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedStake {
    pub number: String,
    pub raw_stake: Decimal,
}

/// A strategy's wish list for one day. The total may exceed capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeProposal {
    pub date: NaiveDate,
    pub stakes: Vec<ProposedStake>,
}

impl StakeProposal {
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            stakes: Vec::new(),
        }
    }

    pub fn push(&mut self, number: impl Into<String>, raw_stake: Decimal) {
        self.stakes.push(ProposedStake {
            number: number.into(),
            raw_stake,
        });
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.stakes
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.raw_stake))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }
}

/// State carried from one day to the next.
///
/// The engine owns this value and threads it through the loop. Stateless
/// strategies ignore it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyState {
    #[default]
    Stateless,
    Martingale {
        current_stake: Decimal,
        consecutive_losses: u32,
    },
}

/// What happened to the bets of a finished day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOutcome {
    pub bets_placed: usize,
    pub any_hit: bool,
}

/// A staking algorithm.
///
/// `propose` must be a pure function of its inputs. Cross-day memory lives in
/// [`StrategyState`], produced by `initial_state` and advanced by `advance`.
pub trait StakingStrategy: Send + Sync {
    /// Strategy type name as used in `strategy.type`.
    fn name(&self) -> &str;

    fn initial_state(&self) -> StrategyState {
        StrategyState::Stateless
    }

    /// Sizes raw stakes for one day.
    ///
    /// # Errors
    /// Returns an error when the strategy cannot produce a valid proposal.
    fn propose(
        &self,
        ctx: &StakeContext<'_>,
        state: &StrategyState,
    ) -> Result<StakeProposal, StrategyError>;

    /// Produces the state for the next day from the outcome of this one.
    fn advance(&self, state: StrategyState, _outcome: &DayOutcome) -> StrategyState {
        state
    }
}
