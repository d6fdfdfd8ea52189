//! Ranked candidate numbers produced by a prediction model for one day.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 1-based rank, unique within a set.
    pub rank: u32,
    /// Head of `digits` characters.
    pub number: String,
    /// Model probability in `[0, 1]`.
    pub probability: f64,
}

/// At most `top_k` predictions for one date, ordered by rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub date: NaiveDate,
    pub entries: Vec<Prediction>,
}

impl PredictionSet {
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    /// Ranks raw `(number, score)` pairs and keeps the best `top_k`.
    ///
    /// Ordering is descending probability with ties broken by ascending number,
    /// so equal inputs always produce the same ranking. Duplicate numbers keep
    /// their best score. Probabilities are clamped into `[0, 1]`.
    #[must_use]
    pub fn from_scores(date: NaiveDate, scores: Vec<(String, f64)>, top_k: usize) -> Self {
        let mut scored: Vec<(String, f64)> = scores
            .into_iter()
            .map(|(number, p)| {
                let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
                (number, p)
            })
            .collect();
        scored.sort_by(|a, b| rank_order(a, b));

        let mut seen = HashSet::new();
        let entries = scored
            .into_iter()
            .filter(|(number, _)| seen.insert(number.clone()))
            .take(top_k)
            .enumerate()
            .map(|(idx, (number, probability))| Prediction {
                rank: idx as u32 + 1,
                number,
                probability,
            })
            .collect();

        Self { date, entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, number: &str) -> Option<&Prediction> {
        self.entries.iter().find(|p| p.number == number)
    }

    #[must_use]
    pub fn contains(&self, number: &str) -> bool {
        self.get(number).is_some()
    }

    /// Checks the structural rules every set must satisfy.
    ///
    /// # Errors
    /// Returns a description of the first violated rule.
    pub fn validate(&self, digits: u8, top_k: usize) -> Result<(), String> {
        if self.entries.len() > top_k {
            return Err(format!(
                "{} predictions exceed top_k {}",
                self.entries.len(),
                top_k
            ));
        }
        let mut numbers = HashSet::new();
        for (idx, prediction) in self.entries.iter().enumerate() {
            if prediction.rank as usize != idx + 1 {
                return Err(format!(
                    "rank {} at position {} is not sequential",
                    prediction.rank,
                    idx + 1
                ));
            }
            if prediction.number.len() != usize::from(digits)
                || !prediction.number.chars().all(|c| c.is_ascii_digit())
            {
                return Err(format!(
                    "number '{}' is not a {}-digit head",
                    prediction.number, digits
                ));
            }
            if !(0.0..=1.0).contains(&prediction.probability) {
                return Err(format!(
                    "probability {} for '{}' is outside [0, 1]",
                    prediction.probability, prediction.number
                ));
            }
            if !numbers.insert(prediction.number.as_str()) {
                return Err(format!("number '{}' appears twice", prediction.number));
            }
        }
        Ok(())
    }
}

fn rank_order(a: &(String, f64), b: &(String, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn scores(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(n, p)| ((*n).to_string(), *p)).collect()
    }

    #[test]
    fn ranks_by_probability_then_number() {
        let set = PredictionSet::from_scores(
            day(),
            scores(&[("45", 0.2), ("12", 0.3), ("07", 0.2)]),
            5,
        );
        let numbers: Vec<&str> = set.entries.iter().map(|p| p.number.as_str()).collect();
        assert_eq!(numbers, vec!["12", "07", "45"]);
        let ranks: Vec<u32> = set.entries.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn truncates_to_top_k() {
        let set = PredictionSet::from_scores(
            day(),
            scores(&[("01", 0.5), ("02", 0.3), ("03", 0.2)]),
            2,
        );
        assert_eq!(set.len(), 2);
        assert!(!set.contains("03"));
    }

    #[test]
    fn duplicate_numbers_keep_best_score() {
        let set = PredictionSet::from_scores(day(), scores(&[("01", 0.1), ("01", 0.6)]), 5);
        assert_eq!(set.len(), 1);
        assert!((set.entries[0].probability - 0.6).abs() < 1e-12);
    }

    #[test]
    fn probabilities_are_clamped() {
        let set = PredictionSet::from_scores(
            day(),
            scores(&[("01", 1.5), ("02", -0.2), ("03", f64::NAN)]),
            5,
        );
        assert!(set.validate(2, 5).is_ok());
        assert!((set.get("01").unwrap().probability - 1.0).abs() < 1e-12);
        assert_eq!(set.get("02").unwrap().probability, 0.0);
    }

    #[test]
    fn validate_rejects_wrong_width_and_duplicates() {
        let mut set = PredictionSet::from_scores(day(), scores(&[("123", 0.5)]), 5);
        assert!(set.validate(2, 5).is_err());

        set = PredictionSet {
            date: day(),
            entries: vec![
                Prediction {
                    rank: 1,
                    number: "12".into(),
                    probability: 0.5,
                },
                Prediction {
                    rank: 2,
                    number: "12".into(),
                    probability: 0.4,
                },
            ],
        };
        assert!(set.validate(2, 5).unwrap_err().contains("twice"));
    }

    #[test]
    fn validate_rejects_oversized_sets() {
        let set = PredictionSet::from_scores(day(), scores(&[("01", 0.5), ("02", 0.4)]), 5);
        assert!(set.validate(2, 1).is_err());
    }
}
