//! Draw records and head extraction.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One official draw: a date, its region and the prize numbers it announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub date: NaiveDate,
    pub region: String,
    /// Prize numbers in announcement order.
    pub numbers: Vec<String>,
}

impl DrawRecord {
    #[must_use]
    pub fn new(date: NaiveDate, region: impl Into<String>, numbers: Vec<String>) -> Self {
        Self {
            date,
            region: region.into(),
            numbers,
        }
    }

    /// Returns the deduplicated set of trailing `digits`-character heads.
    ///
    /// Non-digit characters are stripped first; numbers shorter than `digits`
    /// contribute nothing.
    #[must_use]
    pub fn heads(&self, digits: u8) -> BTreeSet<String> {
        self.numbers
            .iter()
            .filter_map(|number| head_of(number, digits))
            .collect()
    }

    /// Appends the numbers of another draw on the same date.
    pub fn absorb(&mut self, other: DrawRecord) {
        self.numbers.extend(other.numbers);
    }
}

/// Extracts the head (trailing `digits` digit characters) of a prize number.
#[must_use]
pub fn head_of(number: &str, digits: u8) -> Option<String> {
    let normalized: String = number.chars().filter(char::is_ascii_digit).collect();
    let digits = usize::from(digits);
    if digits == 0 || normalized.len() < digits {
        return None;
    }
    Some(normalized[normalized.len() - digits..].to_string())
}

/// Coalesces draws sharing a date into one record per date, in ascending order.
///
/// Records from several regions on one date become a single day whose numbers
/// are the concatenation of each region's numbers.
#[must_use]
pub fn coalesce_by_date(mut draws: Vec<DrawRecord>) -> Vec<DrawRecord> {
    draws.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.region.cmp(&b.region)));

    let mut merged: Vec<DrawRecord> = Vec::with_capacity(draws.len());
    for draw in draws {
        match merged.last_mut() {
            Some(last) if last.date == draw.date => {
                if !last.region.split('+').any(|r| r == draw.region) {
                    last.region = format!("{}+{}", last.region, draw.region);
                }
                last.absorb(draw);
            }
            _ => merged.push(draw),
        }
    }
    merged
}
