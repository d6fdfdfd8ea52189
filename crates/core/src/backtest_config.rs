//! Run request for a single backtest.
//!
//! A `BacktestConfig` is created once per run and never mutated. `validate`
//! rejects every out-of-range input before the first simulated day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Payout multipliers applied when a bet is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRules {
    /// Gross multiple of the stake returned on a hit. Net gain is `stake * (m - 1)`.
    pub jackpot_multiplier: Decimal,
    /// Multiple of the stake booked on a miss, normally -1.
    pub loss_multiplier: Decimal,
}

impl Default for PayoutRules {
    fn default() -> Self {
        Self {
            jackpot_multiplier: Decimal::from(70),
            loss_multiplier: Decimal::NEGATIVE_ONE,
        }
    }
}

/// Caps on stakes expressed as fractions of the day's starting capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    pub max_daily_stake_ratio: Decimal,
    pub max_single_stake_ratio: Decimal,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_daily_stake_ratio: Decimal::new(20, 2),
            max_single_stake_ratio: Decimal::new(10, 2),
        }
    }
}

impl RiskLimits {
    /// Maximum total stake for a day starting with `capital`.
    #[must_use]
    pub fn daily_cap(&self, capital: Decimal) -> Decimal {
        (capital * self.max_daily_stake_ratio).max(Decimal::ZERO)
    }

    /// Maximum stake on any one number for a day starting with `capital`.
    #[must_use]
    pub fn single_cap(&self, capital: Decimal) -> Decimal {
        (capital * self.max_single_stake_ratio).max(Decimal::ZERO)
    }
}

/// Names a staking strategy and carries its untyped options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_id: Option<String>,
}

impl StrategyDescriptor {
    #[must_use]
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            options: Map::new(),
            plugin_id: None,
        }
    }

    /// Adds an option value.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    /// Sets the plugin reference.
    #[must_use]
    pub fn with_plugin(mut self, plugin_id: &str) -> Self {
        self.plugin_id = Some(plugin_id.to_string());
        self
    }
}

/// Full input of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub capital: Decimal,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    #[serde(default)]
    pub region: Option<String>,
    /// Prediction model id.
    pub model: String,
    pub top_k: usize,
    /// Head length, 1 to 5.
    pub digits: u8,
    pub strategy: StrategyDescriptor,
    #[serde(default)]
    pub payout_rules: PayoutRules,
    #[serde(default)]
    pub risk_limits: RiskLimits,
    #[serde(default)]
    pub lookback_draws: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl BacktestConfig {
    /// Creates a config with default payout rules and risk limits.
    #[must_use]
    pub fn new(
        capital: Decimal,
        date_start: NaiveDate,
        date_end: NaiveDate,
        model: &str,
        strategy: StrategyDescriptor,
    ) -> Self {
        Self {
            capital,
            date_start,
            date_end,
            region: None,
            model: model.to_string(),
            top_k: 5,
            digits: 2,
            strategy,
            payout_rules: PayoutRules::default(),
            risk_limits: RiskLimits::default(),
            lookback_draws: None,
            seed: None,
        }
    }

    /// Sets the region filter.
    #[must_use]
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Sets top_k.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the head length.
    #[must_use]
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Sets the payout rules.
    #[must_use]
    pub fn with_payout_rules(mut self, rules: PayoutRules) -> Self {
        self.payout_rules = rules;
        self
    }

    /// Sets the risk limits.
    #[must_use]
    pub fn with_risk_limits(mut self, limits: RiskLimits) -> Self {
        self.risk_limits = limits;
        self
    }

    /// Sets the lookback window in draws.
    #[must_use]
    pub fn with_lookback(mut self, draws: usize) -> Self {
        self.lookback_draws = Some(draws);
        self
    }

    /// Sets the seed for stochastic models.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates ranges and ratios.
    ///
    /// Strategy option validation happens when the strategy is resolved.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capital <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveCapital(self.capital.to_string()));
        }
        if self.date_start > self.date_end {
            return Err(ConfigError::InvertedDateRange {
                start: self.date_start,
                end: self.date_end,
            });
        }
        if !(1..=5).contains(&self.digits) {
            return Err(ConfigError::DigitsOutOfRange(self.digits));
        }
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.lookback_draws == Some(0) {
            return Err(ConfigError::ZeroLookback);
        }
        check_ratio(
            "max_daily_stake_ratio",
            self.risk_limits.max_daily_stake_ratio,
        )?;
        check_ratio(
            "max_single_stake_ratio",
            self.risk_limits.max_single_stake_ratio,
        )?;
        if self.payout_rules.jackpot_multiplier <= Decimal::ZERO {
            return Err(ConfigError::InvalidPayout(format!(
                "jackpot_multiplier must be positive, got {}",
                self.payout_rules.jackpot_multiplier
            )));
        }
        if self.payout_rules.loss_multiplier > Decimal::ZERO {
            return Err(ConfigError::InvalidPayout(format!(
                "loss_multiplier must not be positive, got {}",
                self.payout_rules.loss_multiplier
            )));
        }
        Ok(())
    }
}

fn check_ratio(name: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::RiskRatioOutOfRange {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}
