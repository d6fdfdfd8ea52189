//! History windowing shared by the models.

use std::collections::BTreeMap;

use lottery_core::{head_of, DrawRecord};

/// Returns the trailing `lookback` draws (all of them when `None`).
#[must_use]
pub fn lookback_slice(history: &[DrawRecord], lookback: Option<usize>) -> &[DrawRecord] {
    match lookback {
        Some(n) if n < history.len() => &history[history.len() - n..],
        _ => history,
    }
}

/// Counts head occurrences across every prize number of every draw.
#[must_use]
pub fn head_counts(draws: &[DrawRecord], digits: u8) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for draw in draws {
        for number in &draw.numbers {
            if let Some(head) = head_of(number, digits) {
                *counts.entry(head).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Head of each draw's headline (first announced) number, in date order.
///
/// Draws whose headline is too short for `digits` are skipped.
#[must_use]
pub fn headline_sequence(draws: &[DrawRecord], digits: u8) -> Vec<String> {
    draws
        .iter()
        .filter_map(|draw| draw.numbers.first())
        .filter_map(|number| head_of(number, digits))
        .collect()
}

/// Turns weighted counts into `(head, share)` pairs.
#[must_use]
pub fn to_shares<I>(weights: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let weights: Vec<(String, f64)> = weights.into_iter().collect();
    let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    weights
        .into_iter()
        .map(|(head, w)| (head, w.max(0.0) / total))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::draws;
    use super::*;

    #[test]
    fn lookback_keeps_most_recent() {
        let history = draws(&[&["11"], &["22"], &["33"]]);
        let window = lookback_slice(&history, Some(2));
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].numbers[0], "22");
        assert_eq!(lookback_slice(&history, Some(10)).len(), 3);
        assert_eq!(lookback_slice(&history, None).len(), 3);
    }

    #[test]
    fn counts_every_prize_number() {
        let history = draws(&[&["1011", "2022"], &["3011"]]);
        let counts = head_counts(&history, 2);
        assert_eq!(counts.get("11"), Some(&2));
        assert_eq!(counts.get("22"), Some(&1));
    }

    #[test]
    fn headline_uses_first_number() {
        let history = draws(&[&["1011", "2022"], &["3033"]]);
        assert_eq!(headline_sequence(&history, 2), vec!["11", "33"]);
    }

    #[test]
    fn shares_sum_to_one() {
        let shares = to_shares(vec![("a".to_string(), 3.0), ("b".to_string(), 1.0)]);
        assert!((shares[0].1 - 0.75).abs() < 1e-12);
        assert!(to_shares(vec![("a".to_string(), 0.0)]).is_empty());
    }
}
