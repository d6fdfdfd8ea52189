#![allow(clippy::format_push_string)]

use lottery_backtest::BacktestReport;

const RULE: &str = "═══════════════════════════════════════════════════════════════\n";
const SECTION: &str = "───────────────────────────────────────────────────────────────\n";

pub struct ReportFormatter;

impl ReportFormatter {
    #[must_use]
    pub fn format(report: &BacktestReport) -> String {
        let config = &report.config.config;
        let summary = &report.summary;
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE);
        output.push_str("                    BACKTEST RESULTS                           \n");
        output.push_str(RULE);
        output.push('\n');

        output.push_str("Run\n");
        output.push_str(SECTION);
        output.push_str(&format!(
            "Period:                {} to {}\n",
            config.date_start, config.date_end
        ));
        output.push_str(&format!(
            "Region:                {}\n",
            config.region.as_deref().unwrap_or("all")
        ));
        output.push_str(&format!(
            "Model:                 {} (top {}, {} digits)\n",
            config.model, config.top_k, config.digits
        ));
        output.push_str(&format!(
            "Strategy:              {} ({:?} risk)\n",
            config.strategy.kind, report.config.strategy_risk_level
        ));
        output.push_str(&format!("Days Simulated:        {}\n", report.timeline.len()));
        output.push('\n');

        output.push_str("Capital\n");
        output.push_str(SECTION);
        output.push_str(&format!("Initial Capital:       {}\n", config.capital));
        output.push_str(&format!("Final Balance:         {}\n", summary.final_balance));
        output.push_str(&format!("Max Drawdown:          {}\n", summary.max_drawdown));
        match (&summary.best_month, summary.best_month_pnl) {
            (Some(month), Some(pnl)) => {
                output.push_str(&format!("Best Month:            {month} ({pnl})\n"));
            }
            _ => output.push_str("Best Month:            N/A\n"),
        }
        match summary.sharpe_like {
            Some(sharpe) => output.push_str(&format!("Sharpe-like Ratio:     {sharpe:.4}\n")),
            None => output.push_str("Sharpe-like Ratio:     N/A\n"),
        }
        output.push('\n');

        output.push_str("Bets\n");
        output.push_str(SECTION);
        output.push_str(&format!("Total Bets:            {}\n", summary.total_bets));
        if summary.total_bets > 0 {
            output.push_str(&format!(
                "Wins / Losses:         {} / {}\n",
                summary.total_wins, summary.total_losses
            ));
            output.push_str(&format!(
                "Win Rate:              {:.2}%\n",
                summary.win_rate * 100.0
            ));
        } else {
            output.push_str("Win Rate:              N/A (no bets)\n");
        }
        output.push_str(&format!("Stop Reason:           {:?}\n", summary.stop_reason));

        output.push('\n');
        output.push_str(RULE);

        if let Some(error) = &report.error {
            output.push_str(&format!(
                "\nRun aborted on {} ({}): {}\n",
                error.date, error.kind, error.message
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_backtest::{
        ChartSeries, ConfigEcho, RunError, RunLog, StopReason, SummaryStats, TimelineEntry,
    };
    use lottery_core::{BacktestConfig, StrategyDescriptor};
    use lottery_strategy::RiskLevel;
    use rust_decimal::Decimal;

    fn report(error: Option<RunError>) -> BacktestReport {
        let date = "2024-02-01".parse().unwrap();
        let config = BacktestConfig::new(
            Decimal::from(1000),
            date,
            date,
            "frequency",
            StrategyDescriptor::new("fixed"),
        );
        let timeline = vec![TimelineEntry::halted(date, Decimal::from(1000), Decimal::ZERO)];
        let summary =
            SummaryStats::from_timeline(Decimal::from(1000), &timeline, StopReason::Completed);
        BacktestReport {
            config: ConfigEcho {
                config,
                strategy_risk_level: RiskLevel::Low,
            },
            summary,
            charts: ChartSeries::from_timeline(&timeline),
            logs: RunLog::from_timeline(&timeline),
            timeline,
            error,
        }
    }

    #[test]
    fn shows_run_and_balance() {
        let text = ReportFormatter::format(&report(None));
        assert!(text.contains("2024-02-01 to 2024-02-01"));
        assert!(text.contains("Final Balance:         1000"));
        assert!(text.contains("N/A (no bets)"));
        assert!(!text.contains("aborted"));
    }

    #[test]
    fn shows_abort_marker() {
        let error = RunError {
            date: "2024-02-01".parse().unwrap(),
            kind: "plugin_error".to_string(),
            message: "boom".to_string(),
        };
        let text = ReportFormatter::format(&report(Some(error)));
        assert!(text.contains("Run aborted on 2024-02-01 (plugin_error): boom"));
    }
}
