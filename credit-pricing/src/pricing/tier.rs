//! Volume tier lookup and next-tier advice.
//!
//! Tier tables are accepted in any order and sorted by `min_credits` on every
//! call. Lookups are total over non-empty tables: values above every bounded
//! range land in the last tier, values below the first minimum land in the
//! first tier, and a value inside a gap of a misconfigured table lands in the
//! highest tier that starts at or below it.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{credits_to_decimal, round_currency};
use crate::settings::PricingTier;

/// The tier above the current one and how far away it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextTier<'a> {
    /// The next higher tier.
    pub tier: &'a PricingTier,
    /// Additional credits required to reach `tier.min_credits`.
    pub credits_needed: f64,
}

/// Hint that a small amount of extra usage would reach a cheaper tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierNudge<'a> {
    /// Tier of the current credit total.
    pub current_tier: &'a PricingTier,
    /// The next higher tier.
    pub next_tier: &'a PricingTier,
    /// Additional credits required to reach the next tier.
    pub credits_needed: f64,
    /// Current price minus the price of the next tier's minimum, never negative.
    pub potential_savings: Decimal,
}

fn sorted(tiers: &[PricingTier]) -> Vec<&PricingTier> {
    let mut sorted: Vec<&PricingTier> = tiers.iter().collect();
    sorted.sort_by(|a, b| a.min_credits.total_cmp(&b.min_credits));
    sorted
}

/// Index into `sorted` of the tier `credits` resolves to.
fn position(sorted: &[&PricingTier], credits: f64) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }
    sorted
        .iter()
        .position(|tier| tier.contains(credits))
        .or_else(|| sorted.iter().rposition(|tier| tier.min_credits <= credits))
        .or(Some(0))
}

/// Returns the tier whose range contains `credits`.
///
/// Returns `None` only when `tiers` is empty.
///
/// # Examples
///
/// ```
/// use credit_pricing::{pricing::determine_tier, settings::PricingSettings};
///
/// let settings = PricingSettings::default();
/// let credit_pricing::settings::RateScheme::Tiered { tiers } = &settings.rate_scheme else {
///     unreachable!()
/// };
///
/// assert_eq!(determine_tier(10_000.0, tiers).unwrap().name, "Starter");
/// assert_eq!(determine_tier(10_001.0, tiers).unwrap().name, "Growth");
/// assert_eq!(determine_tier(1e9, tiers).unwrap().name, "Enterprise");
/// ```
#[must_use]
pub fn determine_tier(credits: f64, tiers: &[PricingTier]) -> Option<&PricingTier> {
    let sorted = sorted(tiers);
    position(&sorted, credits).map(|index| sorted[index])
}

/// Returns the next higher tier and the credits still needed to reach it.
///
/// Returns `None` when `credits` already falls in the highest tier or the
/// table is empty.
#[must_use]
pub fn find_next_tier_threshold(credits: f64, tiers: &[PricingTier]) -> Option<NextTier<'_>> {
    let sorted = sorted(tiers);
    let current = position(&sorted, credits)?;
    let tier = sorted.get(current + 1).copied()?;
    Some(NextTier { tier, credits_needed: (tier.min_credits - credits).max(0.0) })
}

/// Suggests moving up a tier when the gap is at most `threshold_percent` percent
/// of the current credits.
///
/// # Examples
///
/// ```
/// use credit_pricing::{pricing::tier_nudge, settings::PricingSettings};
///
/// let settings = PricingSettings::default();
/// let credit_pricing::settings::RateScheme::Tiered { tiers } = &settings.rate_scheme else {
///     unreachable!()
/// };
///
/// let nudge = tier_nudge(9_500.0, tiers, 10.0).unwrap();
/// assert_eq!(nudge.next_tier.name, "Growth");
/// assert_eq!(nudge.credits_needed, 501.0);
///
/// assert!(tier_nudge(5_000.0, tiers, 10.0).is_none());
/// ```
#[must_use]
pub fn tier_nudge(
    credits: f64,
    tiers: &[PricingTier],
    threshold_percent: f64,
) -> Option<TierNudge<'_>> {
    if credits <= 0.0 {
        return None;
    }

    let current_tier = determine_tier(credits, tiers)?;
    let NextTier { tier: next_tier, credits_needed } = find_next_tier_threshold(credits, tiers)?;

    if credits_needed > credits * threshold_percent / 100.0 {
        return None;
    }

    let current_price = credits_to_decimal(credits) * current_tier.price_per_credit;
    let next_price = credits_to_decimal(next_tier.min_credits) * next_tier.price_per_credit;
    let potential_savings = round_currency((current_price - next_price).max(Decimal::ZERO));

    Some(TierNudge { current_tier, next_tier, credits_needed, potential_savings })
}
