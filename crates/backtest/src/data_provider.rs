use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use lottery_core::{DrawHistoryProvider, DrawRecord, ProviderError};
use serde::Deserialize;
use tracing::info;

/// One CSV row: a single prize number of one draw.
#[derive(Debug, Deserialize)]
struct DrawRow {
    date: NaiveDate,
    region: String,
    number: String,
}

/// Draw history held in memory, loaded up front.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDrawProvider {
    draws: Vec<DrawRecord>,
}

impl InMemoryDrawProvider {
    #[must_use]
    pub fn new(mut draws: Vec<DrawRecord>) -> Self {
        draws.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.region.cmp(&b.region)));
        Self { draws }
    }

    /// Loads draws from a CSV file with a `date,region,number` header.
    ///
    /// Rows sharing a date and region form one draw, keeping file order for
    /// the prize numbers.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the file cannot be opened and `Parse` for rows
    /// that do not match the expected columns.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path)
            .map_err(|e| ProviderError::Storage(format!("{}: {e}", path.display())))?;
        let provider = Self::from_csv_reader(reader)?;
        info!(
            path = %path.display(),
            draws = provider.len(),
            "loaded draw history"
        );
        Ok(provider)
    }

    /// Loads draws from any CSV source with a header row.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed rows.
    pub fn from_reader(source: impl Read) -> Result<Self, ProviderError> {
        Self::from_csv_reader(csv::Reader::from_reader(source))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, ProviderError> {
        let mut grouped: BTreeMap<(NaiveDate, String), Vec<String>> = BTreeMap::new();
        for (line, row) in reader.deserialize::<DrawRow>().enumerate() {
            let row = row.map_err(|e| ProviderError::Parse(format!("row {}: {e}", line + 1)))?;
            grouped
                .entry((row.date, row.region.trim().to_string()))
                .or_default()
                .push(row.number.trim().to_string());
        }

        let draws = grouped
            .into_iter()
            .map(|((date, region), numbers)| DrawRecord::new(date, region, numbers))
            .collect();
        Ok(Self::new(draws))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Distinct regions present in the data.
    #[must_use]
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.draws.iter().map(|d| d.region.clone()).collect();
        regions.sort();
        regions.dedup();
        regions
    }
}

#[async_trait]
impl DrawHistoryProvider for InMemoryDrawProvider {
    async fn fetch(
        &self,
        region: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DrawRecord>, ProviderError> {
        let draws: Vec<DrawRecord> = self
            .draws
            .iter()
            .filter(|d| d.date >= start && d.date <= end)
            .filter(|d| region.map_or(true, |r| d.region.eq_ignore_ascii_case(r)))
            .cloned()
            .collect();

        if draws.is_empty() {
            return Err(ProviderError::NoData {
                region: region.map(str::to_string),
                start,
                end,
            });
        }
        Ok(draws)
    }
}
