//! Per-day records of a run.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A committed and resolved wager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub date: NaiveDate,
    pub number: String,
    /// Stake after risk clamping.
    pub stake: Decimal,
    pub rank: u32,
    pub probability: f64,
    pub hit: bool,
    pub payout_net: Decimal,
}

/// A prediction as reported in the timeline, flagged when its number was drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub rank: u32,
    pub number: String,
    pub probability: f64,
    pub hit: bool,
}

/// One simulated draw day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    pub capital_start: Decimal,
    pub capital_end: Decimal,
    pub stake_total: Decimal,
    pub pnl: Decimal,
    pub bets: Vec<Bet>,
    pub predictions: Vec<PredictionOutcome>,
    /// Predicted numbers found in the day's head set.
    pub hits: Vec<String>,
    /// Gap between the running peak of `capital_end` and this day's `capital_end`.
    pub drawdown: Decimal,
    pub daily_return: f64,
    pub capital_halted: bool,
}

impl TimelineEntry {
    /// Entry for a day after capital was depleted. Capital stays pinned.
    #[must_use]
    pub fn halted(date: NaiveDate, capital: Decimal, drawdown: Decimal) -> Self {
        Self {
            date,
            capital_start: capital,
            capital_end: capital,
            stake_total: Decimal::ZERO,
            pnl: Decimal::ZERO,
            bets: Vec::new(),
            predictions: Vec::new(),
            hits: Vec::new(),
            drawdown,
            daily_return: 0.0,
            capital_halted: true,
        }
    }

    #[must_use]
    pub fn wins(&self) -> usize {
        self.bets.iter().filter(|b| b.hit).count()
    }

    #[must_use]
    pub fn any_hit(&self) -> bool {
        self.bets.iter().any(|b| b.hit)
    }
}
