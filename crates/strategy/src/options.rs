//! Typed option parsing and the shared proportional split.

use lottery_core::money::decimal_from_f64;
use lottery_core::{ConfigError, PredictionSet};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Deserializes a strategy's option map into its typed options.
///
/// Missing keys fall back to the `#[serde(default)]` values of `T`; unknown
/// keys are ignored.
pub(crate) fn parse_options<T>(strategy: &str, options: &Map<String, Value>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(options.clone()))
        .map_err(|e| ConfigError::strategy_options(strategy, e.to_string()))
}

/// Checks that `value` lies in `(0, 1]`.
pub(crate) fn require_ratio(strategy: &str, name: &str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::strategy_options(
            strategy,
            format!("{name} must be in (0, 1], got {value}"),
        ));
    }
    Ok(())
}

/// Splits `budget` across the predictions in proportion to their probabilities.
///
/// Probabilities are normalized to sum to one first. When they are all zero
/// the budget is split equally.
pub(crate) fn proportional_split(budget: Decimal, predictions: &PredictionSet) -> Vec<(String, Decimal)> {
    if predictions.is_empty() || budget <= Decimal::ZERO {
        return Vec::new();
    }

    let weights: Vec<Decimal> = predictions
        .entries
        .iter()
        .map(|p| decimal_from_f64(p.probability).max(Decimal::ZERO))
        .collect();
    let total: Decimal = weights.iter().sum();
    let count = Decimal::from(predictions.len());

    predictions
        .entries
        .iter()
        .zip(weights)
        .map(|(p, w)| {
            let stake = if total > Decimal::ZERO {
                budget * w / total
            } else {
                budget / count
            };
            (p.number.clone(), stake)
        })
        .collect()
}
