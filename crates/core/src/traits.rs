use crate::draw::DrawRecord;
use crate::error::{ModelError, ProviderError};
use crate::prediction::PredictionSet;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of historical draws.
#[async_trait]
pub trait DrawHistoryProvider: Send + Sync {
    /// Returns the draws of `region` (all regions when `None`) dated within
    /// `[start, end]`, ordered by date.
    ///
    /// # Errors
    /// `ProviderError::NoData` when the range is empty; other variants when the
    /// underlying storage fails.
    async fn fetch(
        &self,
        region: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DrawRecord>, ProviderError>;
}

/// Parameters of one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreRequest {
    /// Day being predicted. History handed to the model ends strictly before it.
    pub date: NaiveDate,
    pub lookback_draws: Option<usize>,
    pub digits: u8,
    pub top_k: usize,
    pub seed: Option<u64>,
}

/// Ranks candidate heads for a day from the draws that preceded it.
pub trait PredictionModel: Send + Sync {
    /// Scores candidates for `request.date`.
    ///
    /// `history` is ordered by date and holds only draws before `request.date`.
    /// Implementations must be deterministic for a given seed.
    ///
    /// # Errors
    /// Returns `ModelError` if the request cannot be served.
    fn score(
        &self,
        history: &[DrawRecord],
        request: &ScoreRequest,
    ) -> Result<PredictionSet, ModelError>;

    /// Model id used for lookup and caching.
    fn name(&self) -> &str;
}
