//! Frequency model: ranks heads by how often they appeared in the window.

use lottery_core::{DrawRecord, ModelError, PredictionModel, PredictionSet, ScoreRequest};

use crate::window::{head_counts, lookback_slice, to_shares};

/// `p(head) = count(head) / total heads` over the lookback window.
#[derive(Debug, Clone, Default)]
pub struct FrequencyModel;

impl PredictionModel for FrequencyModel {
    fn score(
        &self,
        history: &[DrawRecord],
        request: &ScoreRequest,
    ) -> Result<PredictionSet, ModelError> {
        let window = lookback_slice(history, request.lookback_draws);
        let counts = head_counts(window, request.digits);
        let scores = to_shares(counts.into_iter().map(|(head, c)| (head, c as f64)));
        Ok(PredictionSet::from_scores(request.date, scores, request.top_k))
    }

    fn name(&self) -> &str {
        "frequency"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::fixtures::{day, draws};

    fn request(top_k: usize, lookback: Option<usize>) -> ScoreRequest {
        ScoreRequest {
            date: day(30),
            lookback_draws: lookback,
            digits: 2,
            top_k,
            seed: None,
        }
    }

    #[test]
    fn most_frequent_head_ranks_first() {
        let history = draws(&[&["111", "212"], &["311"], &["411", "512"], &["613"]]);
        let set = FrequencyModel.score(&history, &request(2, None)).unwrap();
        assert_eq!(set.entries[0].number, "11");
        assert!((set.entries[0].probability - 0.5).abs() < 1e-12);
        assert_eq!(set.entries[1].number, "12");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn lookback_limits_the_window() {
        let history = draws(&[&["11"], &["11"], &["22"]]);
        let set = FrequencyModel.score(&history, &request(1, Some(1))).unwrap();
        assert_eq!(set.entries[0].number, "22");
    }

    #[test]
    fn empty_history_gives_empty_set() {
        let set = FrequencyModel.score(&[], &request(3, None)).unwrap();
        assert!(set.is_empty());
    }
}
