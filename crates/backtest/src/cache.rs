//! Memoized prediction sets.

use std::collections::HashMap;

use chrono::NaiveDate;
use lottery_core::{ModelError, PredictionSet, ScoreRequest};

/// Identifies one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub model: String,
    pub region: Option<String>,
    pub date: NaiveDate,
    pub lookback_draws: Option<usize>,
    pub digits: u8,
    pub top_k: usize,
    pub seed: Option<u64>,
}

impl CacheKey {
    #[must_use]
    pub fn new(model: &str, region: Option<&str>, request: &ScoreRequest) -> Self {
        Self {
            model: model.to_string(),
            region: region.map(str::to_string),
            date: request.date,
            lookback_draws: request.lookback_draws,
            digits: request.digits,
            top_k: request.top_k,
            seed: request.seed,
        }
    }
}

/// Prediction sets already computed, so strategies compared against the same
/// model score each date once.
#[derive(Debug, Default)]
pub struct PredictionCache {
    entries: HashMap<CacheKey, PredictionSet>,
    hits: usize,
    misses: usize,
}

impl PredictionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached set for `key`, scoring it with `score` on a miss.
    ///
    /// Failed scoring calls are not cached.
    ///
    /// # Errors
    /// Propagates the error returned by `score`.
    pub fn get_or_score<F>(&mut self, key: CacheKey, score: F) -> Result<PredictionSet, ModelError>
    where
        F: FnOnce() -> Result<PredictionSet, ModelError>,
    {
        if let Some(set) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(set.clone());
        }
        self.misses += 1;
        let set = score()?;
        self.entries.insert(key, set.clone());
        Ok(set)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[must_use]
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(day: u32) -> ScoreRequest {
        ScoreRequest {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            lookback_draws: Some(10),
            digits: 2,
            top_k: 3,
            seed: None,
        }
    }

    #[test]
    fn scores_each_key_once() {
        let mut cache = PredictionCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let req = request(1);
            cache
                .get_or_score(CacheKey::new("frequency", None, &req), || {
                    calls += 1;
                    Ok(PredictionSet::empty(req.date))
                })
                .unwrap();
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), (2, 1));
    }

    #[test]
    fn keys_differ_by_model_and_date() {
        let mut cache = PredictionCache::new();
        for (model, day) in [("frequency", 1), ("markov", 1), ("frequency", 2)] {
            let req = request(day);
            cache
                .get_or_score(CacheKey::new(model, Some("north"), &req), || {
                    Ok(PredictionSet::empty(req.date))
                })
                .unwrap();
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = PredictionCache::new();
        let req = request(1);
        let key = CacheKey::new("frequency", None, &req);
        let failed = cache.get_or_score(key, || {
            Err(ModelError::InvalidRequest {
                model: "frequency".into(),
                reason: "test".into(),
            })
        });
        assert!(failed.is_err());
        assert!(cache.is_empty());
    }
}
