//! Trend model: recency-weighted frequency over a short window.

use std::collections::BTreeMap;

use lottery_core::{head_of, DrawRecord, ModelError, PredictionModel, PredictionSet, ScoreRequest};

use crate::window::{lookback_slice, to_shares};

/// Window used when the request has no lookback.
pub const DEFAULT_TREND_WINDOW: usize = 45;

/// Counts heads over the most recent draws, weighting the i-th oldest draw by `i + 1`.
#[derive(Debug, Clone)]
pub struct TrendModel {
    default_window: usize,
}

impl Default for TrendModel {
    fn default() -> Self {
        Self {
            default_window: DEFAULT_TREND_WINDOW,
        }
    }
}

impl TrendModel {
    #[must_use]
    pub fn with_window(default_window: usize) -> Self {
        Self {
            default_window: default_window.max(1),
        }
    }
}

impl PredictionModel for TrendModel {
    fn score(
        &self,
        history: &[DrawRecord],
        request: &ScoreRequest,
    ) -> Result<PredictionSet, ModelError> {
        let window_len = request.lookback_draws.unwrap_or(self.default_window);
        let window = lookback_slice(history, Some(window_len));

        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        for (idx, draw) in window.iter().enumerate() {
            let weight = (idx + 1) as f64;
            for number in &draw.numbers {
                if let Some(head) = head_of(number, request.digits) {
                    *weights.entry(head).or_insert(0.0) += weight;
                }
            }
        }

        let scores = to_shares(weights);
        Ok(PredictionSet::from_scores(request.date, scores, request.top_k))
    }

    fn name(&self) -> &str {
        "trend"
    }
}
