use clap::{Parser, Subcommand};
use lottery_core::{AppConfig, ConfigLoader};

mod commands;
mod report_formatter;

use commands::BacktestArgs;

#[derive(Parser)]
#[command(name = "lottery-lab")]
#[command(about = "Backtest staking strategies against historical lottery draws", long_about = None)]
struct Cli {
    /// Application config file (server, engine and data settings).
    /// Without it the layered files under `config/` are used.
    #[arg(long, global = true)]
    settings: Option<String>,

    /// Config profile layered over `config/Config.toml` from `config/Config.<profile>.toml`
    #[arg(long, global = true, env = "APP_PROFILE", conflicts_with = "settings")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest from a JSON config and a CSV of draws
    Backtest(BacktestArgs),
    /// Start the web API server
    Serve {
        /// Server address (defaults to the configured host and port)
        #[arg(short, long)]
        addr: Option<String>,
        /// Historical draws CSV (defaults to the configured draws path)
        #[arg(short, long)]
        draws: Option<String>,
    },
    /// List the available staking strategies
    Strategies,
    /// List the available prediction models
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Backtest(args) => {
            commands::run_backtest(args, &settings).await?;
        }
        Commands::Serve { addr, draws } => {
            commands::run_server(addr, draws, &settings).await?;
        }
        Commands::Strategies => {
            commands::list_strategies();
        }
        Commands::Models => {
            commands::list_models();
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> anyhow::Result<AppConfig> {
    match (&cli.settings, &cli.profile) {
        (Some(path), _) => ConfigLoader::load_from(path),
        (None, Some(profile)) => ConfigLoader::load_with_profile(profile),
        (None, None) => ConfigLoader::load(),
    }
}
