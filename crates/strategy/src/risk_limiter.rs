use std::collections::HashMap;

use lottery_core::money::truncate_currency;
use lottery_core::RiskLimits;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::StakeProposal;

/// A stake that passed both caps and is ready to be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampedStake {
    pub number: String,
    pub stake: Decimal,
}

/// Enforces the per-number and per-day stake caps.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskLimiter {
    currency_scale: u32,
}

impl RiskLimiter {
    /// Creates a limiter that truncates stakes to `currency_scale` decimals.
    #[must_use]
    pub const fn new(currency_scale: u32) -> Self {
        Self { currency_scale }
    }

    /// Turns a raw proposal into committed stakes.
    ///
    /// Caps are applied in order:
    /// 1. each stake is cut to `capital_start * max_single_stake_ratio`, the
    ///    excess is discarded;
    /// 2. if the capped total exceeds `capital_start * max_daily_stake_ratio`,
    ///    every stake is scaled by `daily_cap / total`.
    ///
    /// Stakes are then truncated to the currency unit and zero stakes dropped.
    /// Repeated numbers are merged before capping.
    #[must_use]
    pub fn clamp(
        &self,
        capital_start: Decimal,
        proposal: &StakeProposal,
        limits: &RiskLimits,
    ) -> Vec<ClampedStake> {
        if capital_start <= Decimal::ZERO {
            return Vec::new();
        }
        let single_cap = limits.single_cap(capital_start);
        let daily_cap = limits.daily_cap(capital_start);

        let mut stakes = merge_numbers(proposal);
        for stake in &mut stakes {
            stake.stake = stake.stake.min(single_cap);
        }

        let total = stakes
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.stake));
        if total > daily_cap {
            debug!(%total, %daily_cap, "scaling stakes to daily cap");
            let scale = daily_cap / total;
            for stake in &mut stakes {
                stake.stake *= scale;
            }
        }

        for stake in &mut stakes {
            stake.stake = truncate_currency(stake.stake, self.currency_scale);
        }
        trim_excess(&mut stakes, daily_cap);
        stakes.retain(|s| s.stake > Decimal::ZERO);
        stakes
    }
}

/// Sums repeated numbers and drops non-positive stakes, keeping first-seen order.
fn merge_numbers(proposal: &StakeProposal) -> Vec<ClampedStake> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut merged: Vec<ClampedStake> = Vec::with_capacity(proposal.stakes.len());
    for raw in &proposal.stakes {
        if raw.raw_stake <= Decimal::ZERO {
            continue;
        }
        match index.get(raw.number.as_str()) {
            Some(&i) => merged[i].stake = merged[i].stake.saturating_add(raw.raw_stake),
            None => {
                index.insert(raw.number.as_str(), merged.len());
                merged.push(ClampedStake {
                    number: raw.number.clone(),
                    stake: raw.raw_stake,
                });
            }
        }
    }
    merged
}

/// Removes any residue left above the daily cap by decimal rounding,
/// taking it from the largest stake.
fn trim_excess(stakes: &mut [ClampedStake], daily_cap: Decimal) {
    let total = stakes
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.stake));
    let mut excess = total - daily_cap;
    while excess > Decimal::ZERO {
        let Some(largest) = stakes.iter_mut().max_by_key(|s| s.stake) else {
            return;
        };
        let cut = excess.min(largest.stake);
        if cut <= Decimal::ZERO {
            return;
        }
        largest.stake -= cut;
        excess -= cut;
    }
}
