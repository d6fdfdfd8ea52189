//! First-order Markov model over the headline head of each draw.

use std::collections::BTreeMap;

use lottery_core::{DrawRecord, ModelError, PredictionModel, PredictionSet, ScoreRequest};
use tracing::debug;

use crate::window::{headline_sequence, lookback_slice, to_shares};

/// Predicts the next headline head from transitions out of the last observed one.
///
/// When the last state has never been left before, falls back to the global
/// frequency of headline heads. Fewer than two observations yield no predictions.
#[derive(Debug, Clone, Default)]
pub struct MarkovModel;

impl PredictionModel for MarkovModel {
    fn score(
        &self,
        history: &[DrawRecord],
        request: &ScoreRequest,
    ) -> Result<PredictionSet, ModelError> {
        let window = lookback_slice(history, request.lookback_draws);
        let sequence = headline_sequence(window, request.digits);
        let Some(current) = sequence.last() else {
            return Ok(PredictionSet::empty(request.date));
        };
        if sequence.len() < 2 {
            return Ok(PredictionSet::empty(request.date));
        }

        let mut transitions: BTreeMap<String, f64> = BTreeMap::new();
        for pair in sequence.windows(2) {
            if &pair[0] == current {
                *transitions.entry(pair[1].clone()).or_insert(0.0) += 1.0;
            }
        }

        let scores = if transitions.is_empty() {
            debug!(state = %current, "no transitions from state, using global frequency");
            let mut global: BTreeMap<String, f64> = BTreeMap::new();
            for head in &sequence {
                *global.entry(head.clone()).or_insert(0.0) += 1.0;
            }
            to_shares(global)
        } else {
            to_shares(transitions)
        };

        Ok(PredictionSet::from_scores(request.date, scores, request.top_k))
    }

    fn name(&self) -> &str {
        "markov"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::fixtures::{day, draws};

    fn request() -> ScoreRequest {
        ScoreRequest {
            date: day(30),
            lookback_draws: None,
            digits: 2,
            top_k: 5,
            seed: None,
        }
    }

    #[test]
    fn follows_transitions_from_last_state() {
        // 11 -> 22, 22 -> 11, 11 -> 33, 33 -> 11; last state 11 leads to 22 or 33
        let history = draws(&[&["11"], &["22"], &["11"], &["33"], &["11"]]);
        let set = MarkovModel.score(&history, &request()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.entries[0].number, "22");
        assert_eq!(set.entries[1].number, "33");
        assert!((set.entries[0].probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn falls_back_to_global_frequency() {
        // 44 has never been followed by anything
        let history = draws(&[&["11"], &["11"], &["22"], &["44"]]);
        let set = MarkovModel.score(&history, &request()).unwrap();
        assert_eq!(set.entries[0].number, "11");
        assert!((set.entries[0].probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn too_short_history_is_empty() {
        let history = draws(&[&["11"]]);
        assert!(MarkovModel.score(&history, &request()).unwrap().is_empty());
        assert!(MarkovModel.score(&[], &request()).unwrap().is_empty());
    }
}
