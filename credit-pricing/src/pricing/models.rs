//! Inputs and results of a pricing calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::settings::PricingTier;

/// Usage entered for one component of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageInput {
    /// Product the usage belongs to.
    pub product_id: String,
    /// Component name within the product.
    pub component_name: String,
    /// Usage quantity.
    pub value: f64,
}

impl UsageInput {
    /// Creates a usage input.
    pub fn new(
        product_id: impl Into<String>,
        component_name: impl Into<String>,
        value: f64,
    ) -> Self {
        Self { product_id: product_id.into(), component_name: component_name.into(), value }
    }
}

/// Currency discount granted on one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDiscount {
    /// Product the discount applies to.
    pub product_id: String,
    /// Amount subtracted from the product's base price.
    pub discount_amount: Decimal,
}

impl ProductDiscount {
    /// Creates a product discount.
    pub fn new(product_id: impl Into<String>, discount_amount: Decimal) -> Self {
        Self { product_id: product_id.into(), discount_amount }
    }
}

/// Rate that was applied to the final credit total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolvedRate {
    /// The deployment uses a single fixed rate.
    Fixed {
        /// Price of a single credit.
        price_per_credit: Decimal,
    },
    /// The final credits fell into this tier.
    Tier {
        /// The matching tier.
        tier: PricingTier,
    },
    /// The tier table was empty; nothing could be resolved and the rate is zero.
    Unresolved,
}

impl ResolvedRate {
    /// Price per credit implied by this rate.
    #[must_use]
    pub fn price_per_credit(&self) -> Decimal {
        match self {
            Self::Fixed { price_per_credit } => *price_per_credit,
            Self::Tier { tier } => tier.price_per_credit,
            Self::Unresolved => Decimal::ZERO,
        }
    }

    /// Name of the resolved tier, if any.
    #[must_use]
    pub fn tier_name(&self) -> Option<&str> {
        match self {
            Self::Tier { tier } => Some(&tier.name),
            Self::Fixed { .. } | Self::Unresolved => None,
        }
    }
}

/// One product's contribution to a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// Product identifier.
    pub product_id: String,
    /// Product display name.
    pub product_name: String,
    /// `"Formula-based calculation"` in formula mode, otherwise the names of the
    /// components that received usage, comma separated.
    pub component_label: String,
    /// Sum of the product's usage values.
    pub usage: f64,
    /// Credits for this product, before buffer and minimum.
    pub credits: f64,
    /// `credits * price_per_credit`, rounded to cents.
    pub base_price: Decimal,
    /// Discount granted on this product, rounded to cents. It may exceed
    /// `base_price`; the full amount still counts toward `total_discount`.
    pub discount: Decimal,
    /// `base_price - discount`, never negative.
    pub final_price: Decimal,
    /// The product formula failed and the multiplier sum was used instead.
    pub formula_fallback: bool,
}

/// Result of [`calculate_pricing`](super::calculate_pricing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Sum of product credits before buffer and minimum, rounded.
    pub total_credits: f64,
    /// Credits after the safety buffer, rounded.
    pub buffered_credits: f64,
    /// Billed credits after buffer and minimum, rounded.
    pub final_credits: f64,
    /// The enterprise minimum raised the billed credits.
    pub applied_minimum: bool,
    /// Rate resolved for the final credits.
    pub rate: ResolvedRate,
    /// Price of one credit at the resolved rate.
    pub price_per_credit: Decimal,
    /// `final_credits * price_per_credit` before discounts.
    pub base_price: Decimal,
    /// Sum of line discounts.
    pub total_discount: Decimal,
    /// `base_price - total_discount`, never negative.
    pub total_price: Decimal,
    /// Per-product lines in first-seen input order.
    pub breakdown: Vec<BreakdownLine>,
}

impl CalculationResult {
    /// Returns `true` if any product fell back from its formula.
    #[must_use]
    pub fn has_formula_fallback(&self) -> bool {
        self.breakdown.iter().any(|line| line.formula_fallback)
    }
}
