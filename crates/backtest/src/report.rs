//! The response of a run.

use chrono::NaiveDate;
use lottery_core::BacktestConfig;
use lottery_strategy::RiskLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::charts::ChartSeries;
use crate::summary::SummaryStats;
use crate::timeline::{Bet, TimelineEntry};

/// Marker for a run that stopped on an error after simulating some days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// Day on which the error was raised. No entry exists for it.
    pub date: NaiveDate,
    pub kind: String,
    pub message: String,
}

/// The request echoed back with the strategy's risk label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEcho {
    #[serde(flatten)]
    pub config: BacktestConfig,
    pub strategy_risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub config: ConfigEcho,
    pub summary: SummaryStats,
    pub timeline: Vec<TimelineEntry>,
    pub charts: ChartSeries,
    #[serde(default)]
    pub logs: RunLog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunError>,
}

/// Flat export of a run: every settled bet plus the return series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    /// Bets of all days in date order, then in the order they were placed.
    pub trades: Vec<Bet>,
    pub statistics: RunStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// `daily_return` of each timeline entry.
    pub daily_returns: Vec<f64>,
    /// Sum of every day's pnl.
    pub cumulative_pnl: Decimal,
}

impl RunLog {
    #[must_use]
    pub fn from_timeline(timeline: &[TimelineEntry]) -> Self {
        Self {
            trades: timeline
                .iter()
                .flat_map(|entry| entry.bets.iter().cloned())
                .collect(),
            statistics: RunStatistics {
                daily_returns: timeline.iter().map(|entry| entry.daily_return).collect(),
                cumulative_pnl: timeline
                    .iter()
                    .fold(Decimal::ZERO, |acc, entry| acc.saturating_add(entry.pnl)),
            },
        }
    }
}

impl BacktestReport {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }
}
