//! Shared test inputs.

use chrono::NaiveDate;
use lottery_core::{PayoutRules, PredictionSet, RiskLimits};
use rust_decimal::Decimal;

use crate::traits::{DaySnapshot, StakeContext};

pub(crate) fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Builds a set whose ranks follow the given order.
pub(crate) fn predictions(items: &[(&str, f64)]) -> PredictionSet {
    let scores = items.iter().map(|(n, p)| ((*n).to_string(), *p)).collect();
    PredictionSet::from_scores(day(), scores, items.len())
}

pub(crate) struct Fixture {
    pub predictions: PredictionSet,
    pub history: Vec<DaySnapshot>,
    pub limits: RiskLimits,
    pub payout: PayoutRules,
}

impl Fixture {
    pub fn new(items: &[(&str, f64)]) -> Self {
        Self {
            predictions: predictions(items),
            history: Vec::new(),
            limits: RiskLimits::default(),
            payout: PayoutRules::default(),
        }
    }

    pub fn ctx(&self, capital: Decimal) -> StakeContext<'_> {
        StakeContext {
            date: day(),
            day_index: 0,
            capital,
            predictions: &self.predictions,
            history: &self.history,
            risk_limits: &self.limits,
            payout_rules: &self.payout,
        }
    }
}
