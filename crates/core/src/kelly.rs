//! Kelly Criterion stake sizing for fixed-odds number bets.
//!
//! Provides the capped Kelly fraction used by the `kelly` staking strategy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kelly Criterion sizer for fixed-odds bets.
///
/// With win probability `p` and payout multiplier `b` the fraction is:
/// ```text
/// f = (p*b - (1 - p)) / b
/// ```
/// clamped to `[0, max_ratio]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellySizer {
    /// Upper bound on the fraction of capital staked on one candidate
    pub max_ratio: Decimal,
}

impl Default for KellySizer {
    fn default() -> Self {
        Self {
            max_ratio: Decimal::new(10, 2), // 0.10
        }
    }
}

/// Result of Kelly stake sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetDecision {
    /// Whether to place a bet
    pub should_bet: bool,
    /// Recommended stake amount
    pub stake: Decimal,
    /// Unclamped Kelly fraction
    pub full_kelly_fraction: Decimal,
    /// Fraction actually applied after clamping
    pub applied_fraction: Decimal,
    /// Reason for the decision
    pub reason: BetReason,
}

/// Reason for a bet decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetReason {
    /// Positive Kelly fraction, bet placed
    PositiveEdge,
    /// Kelly fraction at or below zero
    NoEdge,
    /// Capped at `max_ratio`
    Capped,
    /// Probability, multiplier or capital out of range
    InvalidInputs,
}

impl KellySizer {
    #[must_use]
    pub fn new(max_ratio: Decimal) -> Self {
        Self { max_ratio }
    }

    /// Raw Kelly fraction `(p*b - (1 - p)) / b`.
    ///
    /// Returns zero for a non-positive multiplier.
    #[must_use]
    pub fn fraction(win_prob: Decimal, multiplier: Decimal) -> Decimal {
        if multiplier <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (win_prob * multiplier - (Decimal::ONE - win_prob)) / multiplier
    }

    /// Sizes a stake against `capital`.
    ///
    /// # Examples
    /// ```
    /// use lottery_core::kelly::KellySizer;
    /// use rust_decimal_macros::dec;
    ///
    /// let sizer = KellySizer::new(dec!(0.1));
    /// let decision = sizer.size(dec!(0.05), dec!(70), dec!(1000000));
    ///
    /// assert!(decision.should_bet);
    /// assert!(decision.stake > dec!(0));
    /// ```
    #[must_use]
    pub fn size(&self, win_prob: Decimal, multiplier: Decimal, capital: Decimal) -> BetDecision {
        if win_prob < Decimal::ZERO
            || win_prob > Decimal::ONE
            || multiplier <= Decimal::ZERO
            || capital <= Decimal::ZERO
        {
            return BetDecision::skip(Decimal::ZERO, BetReason::InvalidInputs);
        }

        let full = Self::fraction(win_prob, multiplier);
        if full <= Decimal::ZERO {
            return BetDecision::skip(full, BetReason::NoEdge);
        }

        let cap = self.max_ratio.max(Decimal::ZERO);
        let (applied, reason) = if full > cap {
            (cap, BetReason::Capped)
        } else {
            (full, BetReason::PositiveEdge)
        };

        let stake = capital * applied;
        BetDecision {
            should_bet: stake > Decimal::ZERO,
            stake,
            full_kelly_fraction: full,
            applied_fraction: applied,
            reason,
        }
    }
}

impl BetDecision {
    fn skip(full_kelly_fraction: Decimal, reason: BetReason) -> Self {
        Self {
            should_bet: false,
            stake: Decimal::ZERO,
            full_kelly_fraction,
            applied_fraction: Decimal::ZERO,
            reason,
        }
    }
}
