//! Turns a list of usage inputs into a priced calculation.

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::{
    component::{ProductCredits, price_product},
    credits_to_decimal,
    models::{BreakdownLine, CalculationResult, ProductDiscount, ResolvedRate, UsageInput},
    round_currency,
    tier::determine_tier,
};
use crate::settings::{PricingMode, PricingSettings, Product, RateScheme};

/// Label used on breakdown lines of formula-mode products.
pub const FORMULA_LABEL: &str = "Formula-based calculation";

/// Computes credits and price for a set of usage inputs.
///
/// 1. Inputs are grouped by product id in first-seen order. Groups naming a
///    product that is not in the catalog are dropped.
/// 2. Each group is priced by [`price_product`].
/// 3. Product credits are summed, the safety buffer is applied if enabled, and
///    the result is raised to the enterprise minimum.
/// 4. The rate is resolved from the unrounded final credits.
/// 5. Discounts for products present in the calculation are subtracted in
///    full from the total, which never goes below zero. A line's own
///    `final_price` is floored at zero independently.
///
/// Credit totals are rounded to whole credits and currency to cents. The
/// settings are used as given; call [`PricingSettings::validate`] beforehand
/// if they come from an untrusted source.
///
/// # Examples
///
/// ```
/// use credit_pricing::{
///     pricing::{UsageInput, calculate_pricing},
///     settings::PricingSettings,
/// };
/// use rust_decimal::Decimal;
///
/// let settings = PricingSettings::default();
/// let inputs = [UsageInput::new("mass-texting", "Texts Sent", 10_001.0)];
///
/// let result = calculate_pricing(&inputs, &settings, &[]);
/// assert_eq!(result.final_credits, 10_001.0);
/// assert_eq!(result.rate.tier_name(), Some("Growth"));
/// assert_eq!(result.total_price, Decimal::new(150_015, 2));
/// ```
#[must_use]
#[instrument(
    skip_all,
    fields(
        inputs = usage_inputs.len(),
        products = settings.products.len(),
        discounts = discounts.len()
    )
)]
pub fn calculate_pricing(
    usage_inputs: &[UsageInput],
    settings: &PricingSettings,
    discounts: &[ProductDiscount],
) -> CalculationResult {
    let priced: Vec<(&Product, Vec<UsageInput>, ProductCredits)> = group_by_product(usage_inputs)
        .into_iter()
        .filter_map(|(product_id, inputs)| {
            let Some(product) = settings.product(product_id) else {
                debug!(product_id, "dropping usage for unknown product");
                return None;
            };
            let credits = price_product(product, &inputs);
            Some((product, inputs, credits))
        })
        .collect();

    let global = &settings.global;
    let total_credits: f64 = priced.iter().map(|(_, _, c)| c.credits).sum();
    let buffered_credits = if global.safety_buffer_enabled {
        total_credits * (1.0 + global.safety_buffer / 100.0)
    } else {
        total_credits
    };
    let applied_minimum = buffered_credits < global.enterprise_minimum;
    let final_credits = buffered_credits.max(global.enterprise_minimum);

    let rate = resolve_rate(final_credits, &settings.rate_scheme);
    let price_per_credit = rate.price_per_credit();
    debug!(tier = ?rate.tier_name(), %price_per_credit, final_credits, "resolved rate");

    let breakdown: Vec<BreakdownLine> = priced
        .into_iter()
        .map(|(product, inputs, credits)| {
            let discount = discount_for(&product.id, discounts);
            breakdown_line(product, &inputs, credits, price_per_credit, discount)
        })
        .collect();

    let base_price = round_currency(credits_to_decimal(final_credits) * price_per_credit);
    let total_discount: Decimal = breakdown.iter().map(|line| line.discount).sum();
    let total_price = (base_price - total_discount).max(Decimal::ZERO);

    CalculationResult {
        total_credits: total_credits.round(),
        buffered_credits: buffered_credits.round(),
        final_credits: final_credits.round(),
        applied_minimum,
        rate,
        price_per_credit,
        base_price,
        total_discount,
        total_price,
        breakdown,
    }
}

/// Resolves the rate for `final_credits` under `scheme`.
#[must_use]
pub fn resolve_rate(final_credits: f64, scheme: &RateScheme) -> ResolvedRate {
    match scheme {
        RateScheme::Fixed { price_per_credit } => {
            ResolvedRate::Fixed { price_per_credit: *price_per_credit }
        }
        RateScheme::Tiered { tiers } => determine_tier(final_credits, tiers)
            .map_or(ResolvedRate::Unresolved, |tier| ResolvedRate::Tier { tier: tier.clone() }),
    }
}

fn group_by_product(usage_inputs: &[UsageInput]) -> Vec<(&str, Vec<UsageInput>)> {
    let mut groups: Vec<(&str, Vec<UsageInput>)> = Vec::new();
    for input in usage_inputs {
        match groups.iter_mut().find(|(id, _)| *id == input.product_id) {
            Some((_, inputs)) => inputs.push(input.clone()),
            None => groups.push((input.product_id.as_str(), vec![input.clone()])),
        }
    }
    groups
}

/// Sum of the discounts granted on `product_id`.
fn discount_for(product_id: &str, discounts: &[ProductDiscount]) -> Decimal {
    discounts
        .iter()
        .filter(|d| d.product_id == product_id)
        .map(|d| d.discount_amount)
        .sum()
}

fn breakdown_line(
    product: &Product,
    inputs: &[UsageInput],
    credits: ProductCredits,
    price_per_credit: Decimal,
    discount: Decimal,
) -> BreakdownLine {
    let base_price = round_currency(credits_to_decimal(credits.credits) * price_per_credit);
    let discount = round_currency(discount);

    BreakdownLine {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        component_label: component_label(product, inputs),
        usage: inputs.iter().map(|i| i.value).sum(),
        credits: credits.credits,
        base_price,
        discount,
        final_price: (base_price - discount).max(Decimal::ZERO),
        formula_fallback: credits.formula_fallback,
    }
}

fn component_label(product: &Product, inputs: &[UsageInput]) -> String {
    if let PricingMode::Formula { .. } = product.mode {
        return FORMULA_LABEL.to_owned();
    }

    let mut names: Vec<&str> = Vec::new();
    for input in inputs {
        let name = input.component_name.as_str();
        if product.component(name).is_some() && !names.contains(&name) {
            names.push(name);
        }
    }
    names.join(", ")
}
