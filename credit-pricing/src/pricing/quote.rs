//! Deal context, upsell adjustment and quote assembly.
//!
//! Quotes are either new business or an upsell on an existing contract. For
//! upsells the customer pays only the difference between the new total and
//! what the current contract is worth.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{credits_to_decimal, models::CalculationResult, round_currency};

/// Value of a customer's current contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExistingContract {
    /// Contract value known as an amount.
    Price {
        /// Current contract price.
        amount: Decimal,
    },
    /// Contract value derived from its credits and their price.
    Credits {
        /// Credits under contract.
        credits: f64,
        /// Price paid per credit.
        price_per_credit: Decimal,
    },
}

impl ExistingContract {
    /// Current value of the contract.
    #[must_use]
    pub fn value(&self) -> Decimal {
        match self {
            Self::Price { amount } => *amount,
            Self::Credits { credits, price_per_credit } => {
                credits_to_decimal(*credits) * price_per_credit
            }
        }
    }
}

/// Amount due on an upsell: the new price minus the existing contract value,
/// never negative.
///
/// # Examples
///
/// ```
/// use credit_pricing::pricing::{ExistingContract, calculate_upsell_price};
/// use rust_decimal::Decimal;
///
/// let existing = ExistingContract::Credits { credits: 10_000.0, price_per_credit: Decimal::new(15, 2) };
/// assert_eq!(calculate_upsell_price(Decimal::new(2_000, 0), &existing), Decimal::new(500, 0));
///
/// let existing = ExistingContract::Price { amount: Decimal::new(3_000, 0) };
/// assert_eq!(calculate_upsell_price(Decimal::new(2_000, 0), &existing), Decimal::ZERO);
/// ```
#[must_use]
pub fn calculate_upsell_price(new_total_price: Decimal, existing: &ExistingContract) -> Decimal {
    round_currency((new_total_price - existing.value()).max(Decimal::ZERO))
}

/// Kind of deal being quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    /// New business.
    #[default]
    New,
    /// Upsell or renewal of an existing contract.
    Upsell,
}

/// Customer and contract context of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealInfo {
    /// Customer the quote is for.
    pub customer_name: String,
    /// New business or upsell.
    pub deal_type: DealType,
    /// Current contract, for upsells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<ExistingContract>,
}

impl DealInfo {
    /// New-business deal.
    pub fn new_business(customer_name: impl Into<String>) -> Self {
        Self { customer_name: customer_name.into(), deal_type: DealType::New, existing: None }
    }

    /// Upsell on an existing contract.
    pub fn upsell(customer_name: impl Into<String>, existing: ExistingContract) -> Self {
        Self {
            customer_name: customer_name.into(),
            deal_type: DealType::Upsell,
            existing: Some(existing),
        }
    }
}

/// A calculation bound to a deal at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Deal context.
    pub deal: DealInfo,
    /// Priced calculation.
    pub calculation: CalculationResult,
    /// When the quote was produced.
    pub generated_at: DateTime<Utc>,
}

impl Quote {
    /// Creates a quote stamped with the current time.
    #[must_use]
    pub fn new(deal: DealInfo, calculation: CalculationResult) -> Self {
        Self::at(deal, calculation, Utc::now())
    }

    /// Creates a quote with an explicit timestamp.
    #[must_use]
    pub fn at(deal: DealInfo, calculation: CalculationResult, generated_at: DateTime<Utc>) -> Self {
        Self { deal, calculation, generated_at }
    }

    /// Amount the customer pays.
    ///
    /// For upsells with a known existing contract this is the upsell price,
    /// otherwise the calculation's total price.
    #[must_use]
    pub fn net_pay(&self) -> Decimal {
        match (&self.deal.deal_type, &self.deal.existing) {
            (DealType::Upsell, Some(existing)) => {
                calculate_upsell_price(self.calculation.total_price, existing)
            }
            _ => self.calculation.total_price,
        }
    }
}
