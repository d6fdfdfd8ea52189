//! Bet resolution against a day's head set.

use std::collections::BTreeSet;

use lottery_core::money::round_currency;
use lottery_core::PayoutRules;
use rust_decimal::Decimal;

/// Outcome of one resolved bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub hit: bool,
    /// Signed cash flow of the bet.
    pub payout_net: Decimal,
}

/// Resolves committed stakes into hits and net payouts.
///
/// A bet hits when its number is in the draw's head set. The net payout is
/// `stake * (jackpot_multiplier - 1)` on a hit and `stake * loss_multiplier`
/// on a miss, rounded half-to-even to the currency unit. A payout that does
/// not fit in a `Decimal` resolves to `None`.
#[derive(Debug, Clone)]
pub struct PayoutCalculator {
    rules: PayoutRules,
    currency_scale: u32,
}

impl PayoutCalculator {
    #[must_use]
    pub fn new(rules: PayoutRules, currency_scale: u32) -> Self {
        Self {
            rules,
            currency_scale,
        }
    }

    #[must_use]
    pub fn resolve(
        &self,
        number: &str,
        stake: Decimal,
        heads: &BTreeSet<String>,
    ) -> Option<Resolution> {
        let hit = heads.contains(number);
        let gross = if hit {
            stake.checked_mul(self.rules.jackpot_multiplier - Decimal::ONE)?
        } else {
            stake.checked_mul(self.rules.loss_multiplier)?
        };
        Some(Resolution {
            hit,
            payout_net: round_currency(gross, self.currency_scale),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn heads(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn hit_pays_jackpot_minus_stake() {
        let calc = PayoutCalculator::new(PayoutRules::default(), 0);
        let res = calc.resolve("12", dec!(100000), &heads(&["12", "40"])).unwrap();
        assert!(res.hit);
        assert_eq!(res.payout_net, dec!(6900000));
    }

    #[test]
    fn miss_applies_loss_multiplier() {
        let calc = PayoutCalculator::new(PayoutRules::default(), 0);
        let res = calc.resolve("12", dec!(100000), &heads(&["34"])).unwrap();
        assert!(!res.hit);
        assert_eq!(res.payout_net, dec!(-100000));
    }

    #[test]
    fn partial_loss_rounds_half_to_even() {
        let rules = PayoutRules {
            jackpot_multiplier: dec!(70),
            loss_multiplier: dec!(-0.5),
        };
        let calc = PayoutCalculator::new(rules, 0);
        // -0.5 * 5 = -2.5 rounds to -2, -0.5 * 7 = -3.5 rounds to -4
        assert_eq!(calc.resolve("12", dec!(5), &heads(&[])).unwrap().payout_net, dec!(-2));
        assert_eq!(calc.resolve("12", dec!(7), &heads(&[])).unwrap().payout_net, dec!(-4));
    }

    #[test]
    fn match_is_exact_on_head_width() {
        let calc = PayoutCalculator::new(PayoutRules::default(), 0);
        assert!(!calc.resolve("2", dec!(10), &heads(&["12"])).unwrap().hit);
    }

    #[test]
    fn oversized_payout_does_not_resolve() {
        let calc = PayoutCalculator::new(PayoutRules::default(), 0);
        let stake = (Decimal::MAX / dec!(10)).trunc();
        assert!(calc.resolve("12", stake, &heads(&["12"])).is_none());
        // the loss side still fits
        assert_eq!(
            calc.resolve("12", stake, &heads(&["34"])).unwrap().payout_net,
            -stake
        );
    }
}
