//! `backtest` command: one run, or several strategies compared over one config.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use lottery_backtest::{BacktestEngine, BacktestReport, InMemoryDrawProvider};
use lottery_core::{AppConfig, BacktestConfig, StrategyDescriptor};

use crate::report_formatter::ReportFormatter;

#[derive(Args, Debug, Clone)]
pub struct BacktestArgs {
    /// Backtest config JSON file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Historical draws CSV with `date,region,number` rows (defaults to the configured path)
    #[arg(short, long)]
    pub draws: Option<PathBuf>,

    /// Write the full report as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON array of extra strategy descriptors to compare against the same predictions
    #[arg(long)]
    pub compare: Option<PathBuf>,
}

/// Runs the command and prints a summary for each report.
///
/// # Errors
/// Returns an error if an input file cannot be read or parsed, or the run is rejected.
pub async fn run_backtest(args: BacktestArgs, settings: &AppConfig) -> anyhow::Result<()> {
    let reports = execute(&args, settings).await?;

    for report in &reports {
        println!("{}", ReportFormatter::format(report));
    }

    if let Some(path) = &args.output {
        let json = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])?
        } else {
            serde_json::to_string_pretty(&reports)?
        };
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}

async fn execute(args: &BacktestArgs, settings: &AppConfig) -> anyhow::Result<Vec<BacktestReport>> {
    let config: BacktestConfig = read_json(&args.config)?;
    let draws_path = args
        .draws
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.data.draws_path));

    let provider = InMemoryDrawProvider::from_csv(&draws_path)
        .with_context(|| format!("Failed to load draws from {}", draws_path.display()))?;
    let engine = BacktestEngine::new(Arc::new(provider)).with_settings(settings.engine.clone());

    tracing::info!(
        "Running backtest: model {}, strategy {}, {} to {}",
        config.model,
        config.strategy.kind,
        config.date_start,
        config.date_end
    );

    match &args.compare {
        Some(path) => {
            let mut descriptors = vec![config.strategy.clone()];
            descriptors.extend(read_json::<Vec<StrategyDescriptor>>(path)?);
            Ok(engine.compare_strategies(&config, &descriptors).await?)
        }
        None => Ok(vec![engine.run(&config).await?]),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DRAWS: &str = "date,region,number\n\
        2024-01-01,north,12345\n\
        2024-01-02,north,67812\n\
        2024-01-03,north,00012\n\
        2024-01-04,north,99912\n\
        2024-01-05,north,55534\n";

    const CONFIG: &str = r#"{
        "capital": 100000,
        "date_start": "2024-01-02",
        "date_end": "2024-01-05",
        "model": "frequency",
        "top_k": 2,
        "digits": 2,
        "strategy": { "type": "fixed", "options": { "amount": 1000, "count": 1 } }
    }"#;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn args(dir: &tempfile::TempDir) -> BacktestArgs {
        BacktestArgs {
            config: write(dir, "config.json", CONFIG),
            draws: Some(write(dir, "draws.csv", DRAWS)),
            output: Some(dir.path().join("report.json")),
            compare: None,
        }
    }

    #[tokio::test]
    async fn writes_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir);

        run_backtest(args.clone(), &AppConfig::default()).await.unwrap();

        let written = std::fs::read_to_string(args.output.unwrap()).unwrap();
        let report: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(report["timeline"].as_array().unwrap().len(), 4);
        assert_eq!(report["summary"]["stop_reason"], "completed");
    }

    #[tokio::test]
    async fn compares_extra_strategies() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&dir);
        args.compare = Some(write(
            &dir,
            "compare.json",
            r#"[{ "type": "percentage", "options": { "percent": 0.01 } },
                { "type": "martingale", "options": { "base": 500 } }]"#,
        ));

        let reports = execute(&args, &AppConfig::default()).await.unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[1].config.config.strategy.kind, "percentage");
    }

    #[tokio::test]
    async fn missing_draws_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&dir);
        args.draws = Some(dir.path().join("missing.csv"));

        let err = execute(&args, &AppConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to load draws"));
    }

    #[tokio::test]
    async fn rejected_config_surfaces_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&dir);
        args.config = write(&dir, "bad.json", &CONFIG.replace("frequency", "lstm"));

        let err = execute(&args, &AppConfig::default()).await.unwrap_err();
        assert!(err.to_string().to_lowercase().contains("lstm"));
    }
}
