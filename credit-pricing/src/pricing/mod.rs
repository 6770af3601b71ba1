//! Credit and price computation.
//!
//! This module contains the pricing pipeline and its building blocks:
//!
//! - [`component`]: credits for a single product (direct or formula mode)
//! - [`tier`]: volume tier lookup, next-tier threshold, upsell nudge
//! - [`pipeline`]: [`calculate_pricing`], the full calculation
//! - [`quote`]: deal context, upsell price and quotes
//!
//! # Examples
//!
//! ```
//! use credit_pricing::{
//!     pricing::{ProductDiscount, UsageInput, calculate_pricing},
//!     settings::PricingSettings,
//! };
//! use rust_decimal::Decimal;
//!
//! let settings = PricingSettings::default();
//! let inputs = [
//!     UsageInput::new("chatbot", "Conversations", 4_000.0),
//!     UsageInput::new("listings", "Locations", 25.0),
//! ];
//! let discounts = [ProductDiscount::new("chatbot", Decimal::new(100, 0))];
//!
//! let result = calculate_pricing(&inputs, &settings, &discounts);
//! assert_eq!(result.total_credits, 8_500.0);
//! assert_eq!(result.breakdown.len(), 2);
//! assert_eq!(result.total_price, Decimal::new(1_600, 0));
//! ```

pub mod component;
pub mod models;
pub mod pipeline;
pub mod quote;
pub mod tier;

use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};

pub use component::{ProductCredits, price_product};
pub use models::{BreakdownLine, CalculationResult, ProductDiscount, ResolvedRate, UsageInput};
pub use pipeline::{FORMULA_LABEL, calculate_pricing, resolve_rate};
pub use quote::{DealInfo, DealType, ExistingContract, Quote, calculate_upsell_price};
pub use tier::{NextTier, TierNudge, determine_tier, find_next_tier_threshold, tier_nudge};

/// Rounds a currency amount to cents, halves away from zero.
pub(crate) fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a credit quantity for multiplication with a rate.
///
/// Values `Decimal` cannot hold (non-finite or beyond its range) become zero.
pub(crate) fn credits_to_decimal(credits: f64) -> Decimal {
    Decimal::from_f64(credits).unwrap_or_default()
}
