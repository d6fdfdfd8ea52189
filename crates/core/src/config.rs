use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest scale a `Decimal` can represent.
pub const MAX_CURRENCY_SCALE: u32 = 28;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineSettings,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Engine-wide constants that are not part of a single run request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Decimal places of the smallest currency unit (0 for currencies without subunits).
    pub currency_scale: u32,
    /// Capital at or below this halts the run. Defaults to one smallest currency unit.
    pub min_viable_stake: Option<Decimal>,
    /// Number of trailing day snapshots handed to strategies.
    pub history_snapshot_len: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            currency_scale: 0,
            min_viable_stake: None,
            history_snapshot_len: 30,
        }
    }
}

impl EngineSettings {
    /// Smallest indivisible currency amount, `10^-currency_scale`.
    ///
    /// Scales past [`MAX_CURRENCY_SCALE`] are rejected at load and clamp here.
    #[must_use]
    pub fn currency_unit(&self) -> Decimal {
        Decimal::new(1, self.currency_scale.min(MAX_CURRENCY_SCALE))
    }

    #[must_use]
    pub fn min_viable_stake(&self) -> Decimal {
        self.min_viable_stake.unwrap_or_else(|| self.currency_unit())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file of `date,region,number` rows loaded at startup.
    pub draws_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            draws_path: "data/draws.csv".to_string(),
        }
    }
}
