//! Externally supplied staking strategies.
//!
//! A plugin is any [`PluginStrategy`] registered under a string id. The engine
//! only sees its output, which is validated before it becomes a proposal.

use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::NaiveDate;
use lottery_core::Prediction;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::StrategyError;
use crate::traits::{DaySnapshot, StakeContext, StakeProposal, StakingStrategy, StrategyState};

/// Risk limits as seen by a plugin, with the day's caps already computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRiskLimits {
    #[serde(with = "rust_decimal::serde::float")]
    pub max_daily_stake_ratio: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_single_stake_ratio: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_daily_stake: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_single_stake: Decimal,
}

/// Input handed to a plugin for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRequest {
    pub date: NaiveDate,
    pub day_index: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub capital: Decimal,
    pub predictions: Vec<Prediction>,
    pub history: Vec<DaySnapshot>,
    /// The strategy's option map, passed through untouched.
    pub config: Map<String, Value>,
    pub risk_limits: PluginRiskLimits,
}

impl PluginRequest {
    #[must_use]
    pub fn from_context(ctx: &StakeContext<'_>, config: &Map<String, Value>) -> Self {
        Self {
            date: ctx.date,
            day_index: ctx.day_index,
            capital: ctx.capital,
            predictions: ctx.predictions.entries.clone(),
            history: ctx.history.to_vec(),
            config: config.clone(),
            risk_limits: PluginRiskLimits {
                max_daily_stake_ratio: ctx.risk_limits.max_daily_stake_ratio,
                max_single_stake_ratio: ctx.risk_limits.max_single_stake_ratio,
                max_daily_stake: ctx.risk_limits.daily_cap(ctx.capital),
                max_single_stake: ctx.risk_limits.single_cap(ctx.capital),
            },
        }
    }
}

/// One stake returned by a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginStake {
    pub number: String,
    pub stake: f64,
}

impl PluginStake {
    pub fn new(number: impl Into<String>, stake: f64) -> Self {
        Self {
            number: number.into(),
            stake,
        }
    }
}

/// Narrow interface implemented by external strategies.
pub trait PluginStrategy: Send + Sync {
    /// # Errors
    /// Returns a human readable reason when the plugin cannot produce stakes.
    fn propose(&self, request: &PluginRequest) -> Result<Vec<PluginStake>, String>;
}

impl<F> PluginStrategy for F
where
    F: Fn(&PluginRequest) -> Result<Vec<PluginStake>, String> + Send + Sync,
{
    fn propose(&self, request: &PluginRequest) -> Result<Vec<PluginStake>, String> {
        self(request)
    }
}

/// Plugins available to runs, keyed by id.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Arc<dyn PluginStrategy>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.ids())
            .finish()
    }
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin, replacing any previous one with the same id.
    pub fn register(&mut self, id: impl Into<String>, plugin: Arc<dyn PluginStrategy>) {
        self.plugins.insert(id.into(), plugin);
    }

    /// Registers a closure as a plugin.
    pub fn register_fn<F>(&mut self, id: impl Into<String>, f: F)
    where
        F: Fn(&PluginRequest) -> Result<Vec<PluginStake>, String> + Send + Sync + 'static,
    {
        self.register(id, Arc::new(f));
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn PluginStrategy>> {
        self.plugins.get(id).cloned()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Adapts a registered plugin to [`StakingStrategy`].
pub struct PluginStaking {
    plugin_id: String,
    plugin: Arc<dyn PluginStrategy>,
    config: Map<String, Value>,
}

impl PluginStaking {
    #[must_use]
    pub fn new(
        plugin_id: impl Into<String>,
        plugin: Arc<dyn PluginStrategy>,
        config: Map<String, Value>,
    ) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            plugin,
            config,
        }
    }

    fn invoke(&self, request: &PluginRequest) -> Result<Vec<PluginStake>, StrategyError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.plugin.propose(request)));
        let result = outcome.map_err(|payload| StrategyError::PluginInvocation {
            plugin_id: self.plugin_id.clone(),
            reason: format!("panicked: {}", panic_message(payload.as_ref())),
        })?;
        result.map_err(|reason| StrategyError::PluginInvocation {
            plugin_id: self.plugin_id.clone(),
            reason,
        })
    }

    fn malformed(&self, reason: String) -> StrategyError {
        warn!(plugin = %self.plugin_id, %reason, "rejecting plugin output");
        StrategyError::MalformedOutput {
            strategy: format!("plugin:{}", self.plugin_id),
            reason,
        }
    }
}

impl StakingStrategy for PluginStaking {
    fn name(&self) -> &str {
        "plugin"
    }

    fn propose(
        &self,
        ctx: &StakeContext<'_>,
        _state: &StrategyState,
    ) -> Result<StakeProposal, StrategyError> {
        let request = PluginRequest::from_context(ctx, &self.config);
        let stakes = self.invoke(&request)?;

        let mut seen = HashSet::new();
        let mut proposal = StakeProposal::empty(ctx.date);
        for stake in stakes {
            if !stake.stake.is_finite() || stake.stake < 0.0 {
                return Err(self.malformed(format!(
                    "stake {} on '{}' is not a finite non-negative amount",
                    stake.stake, stake.number
                )));
            }
            if !ctx.predictions.contains(&stake.number) {
                return Err(self.malformed(format!(
                    "number '{}' is not among the day's predictions",
                    stake.number
                )));
            }
            if !seen.insert(stake.number.clone()) {
                return Err(self.malformed(format!("number '{}' staked twice", stake.number)));
            }
            let Some(amount) = Decimal::from_f64(stake.stake) else {
                return Err(self.malformed(format!(
                    "stake {} on '{}' is out of range",
                    stake.stake, stake.number
                )));
            };
            proposal.push(stake.number, amount);
        }
        Ok(proposal)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
