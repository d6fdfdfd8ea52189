use std::sync::Arc;

use anyhow::Context;
use lottery_backtest::{BacktestEngine, InMemoryDrawProvider};
use lottery_core::AppConfig;
use lottery_web_api::ApiServer;

/// Loads the draw history once and serves the REST API over it.
///
/// # Errors
/// Returns an error if the draws cannot be loaded or the server fails to bind.
pub async fn run_server(
    addr: Option<String>,
    draws: Option<String>,
    settings: &AppConfig,
) -> anyhow::Result<()> {
    let draws_path = draws.unwrap_or_else(|| settings.data.draws_path.clone());
    let addr = addr.unwrap_or_else(|| settings.server.addr());

    let provider = InMemoryDrawProvider::from_csv(&draws_path)
        .with_context(|| format!("Failed to load draws from {draws_path}"))?;
    tracing::info!(
        "Loaded {} draws across regions {:?}",
        provider.len(),
        provider.regions()
    );

    let engine = BacktestEngine::new(Arc::new(provider)).with_settings(settings.engine.clone());
    let server = ApiServer::new(Arc::new(engine));

    server.serve(&addr).await
}
