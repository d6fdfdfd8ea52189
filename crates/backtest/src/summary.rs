//! Summary statistics reduced from a finished timeline.

use std::collections::BTreeMap;

use lottery_core::money::to_f64;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::timeline::TimelineEntry;

/// Days per year used to annualize the Sharpe-like ratio.
const ANNUALIZATION_DAYS: f64 = 365.0;

/// Why the day loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every day of the range was simulated.
    Completed,
    /// Capital fell below the minimum viable stake.
    CapitalDepleted,
    /// A strategy or model error ended the run early.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub final_balance: Decimal,
    pub total_bets: usize,
    pub total_wins: usize,
    pub total_losses: usize,
    pub win_rate: f64,
    pub max_drawdown: Decimal,
    /// Calendar month (`YYYY-MM`) with the highest summed pnl.
    pub best_month: Option<String>,
    pub best_month_pnl: Option<Decimal>,
    pub sharpe_like: Option<f64>,
    /// Same as `win_rate` for now; kept separate for model-confidence metrics.
    pub accuracy: f64,
    pub stop_reason: StopReason,
}

impl SummaryStats {
    /// Reduces a timeline. Holds no state of its own.
    #[must_use]
    pub fn from_timeline(
        initial_capital: Decimal,
        timeline: &[TimelineEntry],
        stop_reason: StopReason,
    ) -> Self {
        let final_balance = timeline
            .last()
            .map_or(initial_capital, |entry| entry.capital_end);

        let total_bets: usize = timeline.iter().map(|e| e.bets.len()).sum();
        let total_wins: usize = timeline.iter().map(TimelineEntry::wins).sum();
        let win_rate = ratio(total_wins, total_bets);

        let max_drawdown = timeline
            .iter()
            .map(|e| e.drawdown)
            .max()
            .unwrap_or(Decimal::ZERO);

        let (best_month, best_month_pnl) = match best_month(timeline) {
            Some((month, pnl)) => (Some(month), Some(pnl)),
            None => (None, None),
        };

        Self {
            final_balance,
            total_bets,
            total_wins,
            total_losses: total_bets - total_wins,
            win_rate,
            max_drawdown,
            best_month,
            best_month_pnl,
            sharpe_like: sharpe_like(timeline),
            accuracy: win_rate,
            stop_reason,
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Month with the highest summed pnl. Ties go to the earliest month.
fn best_month(timeline: &[TimelineEntry]) -> Option<(String, Decimal)> {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for entry in timeline {
        *months
            .entry(entry.date.format("%Y-%m").to_string())
            .or_insert(Decimal::ZERO) += entry.pnl;
    }

    let mut best: Option<(String, Decimal)> = None;
    for (month, pnl) in months {
        if best.as_ref().map_or(true, |(_, top)| pnl > *top) {
            best = Some((month, pnl));
        }
    }
    best
}

/// `mean / stdev * sqrt(365)` over every day's return, halted days included.
///
/// Uses the population standard deviation. `None` with fewer than two
/// active days or zero variance.
fn sharpe_like(timeline: &[TimelineEntry]) -> Option<f64> {
    let active = timeline
        .iter()
        .filter(|e| !e.capital_halted || !e.bets.is_empty())
        .count();
    if active < 2 {
        return None;
    }

    let returns: Vec<f64> = timeline.iter().map(|e| e.daily_return).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if !std_dev.is_finite() || std_dev <= 1e-12 {
        return None;
    }
    Some(mean / std_dev * ANNUALIZATION_DAYS.sqrt())
}

/// Daily return as a float, `0` when the day started without capital.
#[must_use]
pub fn daily_return(pnl: Decimal, capital_start: Decimal) -> f64 {
    if capital_start.is_zero() {
        return 0.0;
    }
    pnl.checked_div(capital_start)
        .map_or_else(|| to_f64(pnl) / to_f64(capital_start), to_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(date: &str, start: Decimal, end: Decimal, halted: bool) -> TimelineEntry {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let pnl = end - start;
        TimelineEntry {
            date,
            capital_start: start,
            capital_end: end,
            stake_total: Decimal::ZERO,
            pnl,
            bets: Vec::new(),
            predictions: Vec::new(),
            hits: Vec::new(),
            drawdown: Decimal::ZERO,
            daily_return: daily_return(pnl, start),
            capital_halted: halted,
        }
    }

    #[test]
    fn best_month_sums_pnl_per_month() {
        let timeline = vec![
            entry("2024-01-30", dec!(100), dec!(150), false),
            entry("2024-01-31", dec!(150), dec!(140), false),
            entry("2024-02-01", dec!(140), dec!(180), false),
        ];
        let stats = SummaryStats::from_timeline(dec!(100), &timeline, StopReason::Completed);
        assert_eq!(stats.best_month.as_deref(), Some("2024-02"));
        assert_eq!(stats.best_month_pnl, Some(dec!(40)));
        assert_eq!(stats.final_balance, dec!(180));
    }

    #[test]
    fn best_month_tie_goes_to_earliest() {
        let timeline = vec![
            entry("2024-01-10", dec!(100), dec!(110), false),
            entry("2024-02-10", dec!(110), dec!(120), false),
        ];
        let stats = SummaryStats::from_timeline(dec!(100), &timeline, StopReason::Completed);
        assert_eq!(stats.best_month.as_deref(), Some("2024-01"));
    }

    #[test]
    fn sharpe_needs_two_active_days_and_variance() {
        let one_day = vec![entry("2024-01-01", dec!(100), dec!(110), false)];
        assert!(sharpe_like(&one_day).is_none());

        let flat = vec![
            entry("2024-01-01", dec!(100), dec!(100), false),
            entry("2024-01-02", dec!(100), dec!(100), false),
        ];
        assert!(sharpe_like(&flat).is_none());
    }

    #[test]
    fn sharpe_matches_population_formula() {
        // returns +10% and -10%: mean 0
        let timeline = vec![
            entry("2024-01-01", dec!(100), dec!(110), false),
            entry("2024-01-02", dec!(110), dec!(99), false),
        ];
        let sharpe = sharpe_like(&timeline).unwrap();
        assert!(sharpe.abs() < 1e-9);

        // returns +10%, +20%: mean 0.15, pstdev 0.05
        let timeline = vec![
            entry("2024-01-01", dec!(100), dec!(110), false),
            entry("2024-01-02", dec!(110), dec!(132), false),
        ];
        let expected = 0.15 / 0.05 * 365f64.sqrt();
        assert!((sharpe_like(&timeline).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn halted_days_count_as_zero_returns() {
        let mut timeline = vec![
            entry("2024-01-01", dec!(100), dec!(110), false),
            entry("2024-01-02", dec!(110), dec!(132), false),
        ];
        timeline.push(TimelineEntry::halted(
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            dec!(132),
            Decimal::ZERO,
        ));
        let with_halt = sharpe_like(&timeline).unwrap();
        // returns 0.1, 0.2, 0: mean 0.1, pstdev sqrt(0.02/3)
        let expected = 0.1 / (0.02f64 / 3.0).sqrt() * 365f64.sqrt();
        assert!((with_halt - expected).abs() < 1e-6);
    }

    #[test]
    fn empty_timeline_uses_initial_capital() {
        let stats = SummaryStats::from_timeline(dec!(500), &[], StopReason::Aborted);
        assert_eq!(stats.final_balance, dec!(500));
        assert_eq!(stats.win_rate, 0.0);
        assert!(stats.best_month.is_none());
        assert!(stats.sharpe_like.is_none());
    }

    #[test]
    fn zero_capital_start_gives_zero_return() {
        assert_eq!(daily_return(dec!(10), dec!(0)), 0.0);
        assert!((daily_return(dec!(10), dec!(100)) - 0.1).abs() < 1e-12);
    }
}
