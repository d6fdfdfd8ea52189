use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lottery_backtest::{BacktestEngine, BacktestError, BacktestReport};
use lottery_core::BacktestConfig;
use lottery_strategy::{RiskLevel, StrategyKind};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct StrategyInfo {
    pub name: &'static str,
    pub risk_level: RiskLevel,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct StrategyListResponse {
    pub strategies: Vec<StrategyInfo>,
    /// Ids usable as `plugin_id` with the `plugin` strategy.
    pub plugins: Vec<String>,
}

#[derive(Serialize)]
pub struct ModelListResponse {
    pub models: Vec<String>,
}

/// Error body returned by the API: `{"error": "...", "kind": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<BacktestError> for ApiError {
    fn from(err: BacktestError) -> Self {
        match &err {
            BacktestError::DataUnavailable { .. } => Self::NotFound(err.to_string()),
            BacktestError::Provider(_) => Self::Internal(err.to_string()),
            BacktestError::Config(_)
            | BacktestError::UnknownModel(_)
            | BacktestError::Strategy(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "data_unavailable", msg),
            Self::Internal(msg) => {
                tracing::error!("Backtest failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Lists the strategy types with their risk labels and the registered plugins.
pub async fn list_strategies(State(engine): State<Arc<BacktestEngine>>) -> Json<StrategyListResponse> {
    let strategies = StrategyKind::ALL
        .into_iter()
        .map(|kind| StrategyInfo {
            name: kind.as_str(),
            risk_level: kind.risk_level(),
            description: kind.description(),
        })
        .collect();
    let plugins = engine.plugins().ids().into_iter().map(str::to_string).collect();

    Json(StrategyListResponse {
        strategies,
        plugins,
    })
}

pub async fn list_models(State(engine): State<Arc<BacktestEngine>>) -> Json<ModelListResponse> {
    let models = engine.models().names().into_iter().map(str::to_string).collect();
    Json(ModelListResponse { models })
}

/// Runs a backtest from a JSON `BacktestConfig`.
///
/// Runs that stop on a strategy or model error mid-way still return 200 with
/// the partial timeline and an `error` marker.
///
/// # Errors
/// Returns 400 for invalid configs or unknown strategies and models, and 404
/// when no draws exist for the requested range.
pub async fn run_backtest(
    State(engine): State<Arc<BacktestEngine>>,
    Json(config): Json<BacktestConfig>,
) -> Result<Json<BacktestReport>, ApiError> {
    tracing::info!(
        model = %config.model,
        strategy = %config.strategy.kind,
        start = %config.date_start,
        end = %config.date_end,
        "Backtest requested"
    );
    let report = engine.run(&config).await?;
    Ok(Json(report))
}
