//! Monte Carlo model: resamples the empirical head distribution.
//!
//! Draws `iterations` samples from the frequency distribution of the lookback
//! window and ranks heads by how often they were sampled. The RNG is a
//! `ChaCha8Rng` seeded from the request seed and the target date, so a fixed
//! seed reproduces every day's ranking exactly.

use chrono::Datelike;
use lottery_core::{DrawRecord, ModelError, PredictionModel, PredictionSet, ScoreRequest};
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::window::{head_counts, lookback_slice};

/// Samples drawn per scoring call by default.
pub const DEFAULT_ITERATIONS: usize = 4000;

/// Seed used when the request carries none.
const DEFAULT_SEED: u64 = 0x5EED_1077;

#[derive(Debug, Clone)]
pub struct MonteCarloModel {
    iterations: usize,
}

impl Default for MonteCarloModel {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl MonteCarloModel {
    #[must_use]
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    fn rng_for(request: &ScoreRequest) -> ChaCha8Rng {
        let base = request.seed.unwrap_or(DEFAULT_SEED);
        let day = u64::try_from(request.date.num_days_from_ce()).unwrap_or_default();
        ChaCha8Rng::seed_from_u64(base.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ day)
    }
}

impl PredictionModel for MonteCarloModel {
    fn score(
        &self,
        history: &[DrawRecord],
        request: &ScoreRequest,
    ) -> Result<PredictionSet, ModelError> {
        let window = lookback_slice(history, request.lookback_draws);
        let counts = head_counts(window, request.digits);
        if counts.is_empty() {
            return Ok(PredictionSet::empty(request.date));
        }

        let (heads, weights): (Vec<String>, Vec<u64>) = counts.into_iter().unzip();
        let dist = WeightedIndex::new(&weights).map_err(|e| ModelError::InvalidRequest {
            model: self.name().to_string(),
            reason: e.to_string(),
        })?;

        let mut rng = Self::rng_for(request);
        let mut tally = vec![0u64; heads.len()];
        for _ in 0..self.iterations {
            tally[dist.sample(&mut rng)] += 1;
        }

        let total = self.iterations as f64;
        let scores = heads
            .into_iter()
            .zip(tally)
            .filter(|(_, hits)| *hits > 0)
            .map(|(head, hits)| (head, hits as f64 / total))
            .collect();

        Ok(PredictionSet::from_scores(request.date, scores, request.top_k))
    }

    fn name(&self) -> &str {
        "montecarlo"
    }
}
