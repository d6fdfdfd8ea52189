//! Chart series derived from the timeline.

use chrono::NaiveDate;
use lottery_core::money::to_f64;
use serde::{Deserialize, Serialize};

use crate::timeline::TimelineEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Date-ordered series, one point per timeline entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Capital at the end of each day.
    pub capital_curve: Vec<ChartPoint>,
    /// Cumulative hits over cumulative bets, 0 before the first bet.
    pub accuracy_curve: Vec<ChartPoint>,
    /// Pnl of each day.
    pub profit_curve: Vec<ChartPoint>,
}

impl ChartSeries {
    #[must_use]
    pub fn from_timeline(timeline: &[TimelineEntry]) -> Self {
        let mut series = Self::default();
        let mut bets = 0usize;
        let mut wins = 0usize;

        for entry in timeline {
            bets += entry.bets.len();
            wins += entry.wins();
            let accuracy = if bets == 0 {
                0.0
            } else {
                wins as f64 / bets as f64
            };

            series.capital_curve.push(ChartPoint {
                date: entry.date,
                value: to_f64(entry.capital_end),
            });
            series.accuracy_curve.push(ChartPoint {
                date: entry.date,
                value: accuracy,
            });
            series.profit_curve.push(ChartPoint {
                date: entry.date,
                value: to_f64(entry.pnl),
            });
        }
        series
    }
}
