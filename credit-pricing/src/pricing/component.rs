//! Converts one product's usage into credits.
//!
//! Direct-mode products sum `value * multiplier` over their inputs. Formula-mode
//! products bind every declared `var_name` (zero when no usage was entered) and
//! evaluate the product formula. A failing formula is logged and replaced by the
//! direct-mode sum, so this module never returns an error.

use std::collections::HashMap;

use tracing::warn;

use super::models::UsageInput;
use crate::{
    formula::evaluate_formula,
    settings::{PricingMode, Product},
};

/// Credits computed for one product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductCredits {
    /// Credit total for the product.
    pub credits: f64,
    /// The formula failed and `credits` is the multiplier sum.
    pub formula_fallback: bool,
}

/// Computes the credits for `product` from the inputs that belong to it.
///
/// Inputs naming a component the product does not have are skipped.
///
/// # Examples
///
/// ```
/// use credit_pricing::{
///     pricing::{UsageInput, price_product},
///     settings::PricingSettings,
/// };
///
/// let settings = PricingSettings::default();
/// let listings = settings.product("listings").unwrap();
/// let inputs = [UsageInput::new("listings", "Locations", 3.0)];
///
/// assert_eq!(price_product(listings, &inputs).credits, 300.0);
/// ```
#[must_use]
pub fn price_product(product: &Product, inputs: &[UsageInput]) -> ProductCredits {
    match &product.mode {
        PricingMode::Direct => {
            ProductCredits { credits: multiplier_sum(product, inputs), formula_fallback: false }
        }
        PricingMode::Formula { formula } => {
            let variables = bind_variables(product, inputs);
            match evaluate_formula(formula, &variables) {
                Ok(credits) => ProductCredits { credits, formula_fallback: false },
                Err(error) => {
                    warn!(
                        product_id = %product.id,
                        %formula,
                        %error,
                        "formula failed, using multiplier sum"
                    );
                    let credits = multiplier_sum(product, inputs);
                    ProductCredits { credits, formula_fallback: true }
                }
            }
        }
    }
}

fn multiplier_sum(product: &Product, inputs: &[UsageInput]) -> f64 {
    inputs
        .iter()
        .filter_map(|input| {
            product.component(&input.component_name).map(|c| input.value * c.multiplier)
        })
        .sum()
}

/// Every declared variable starts at zero; entered usage overwrites it.
fn bind_variables(product: &Product, inputs: &[UsageInput]) -> HashMap<String, f64> {
    let mut variables: HashMap<String, f64> = product
        .components
        .iter()
        .filter_map(|c| c.var_name.clone())
        .map(|name| (name, 0.0))
        .collect();

    for input in inputs {
        if let Some(var_name) =
            product.component(&input.component_name).and_then(|c| c.var_name.as_ref())
        {
            variables.insert(var_name.clone(), input.value);
        }
    }

    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Component;

    fn direct_product() -> Product {
        Product {
            id: "insights".to_owned(),
            name: "Insights".to_owned(),
            category: "Analytics".to_owned(),
            components: vec![
                Component::new("Reviews Processed", "Per Review Processed", 0.1),
                Component::new("Calls Processed", "Per Call Processed", 5.0),
            ],
            mode: PricingMode::Direct,
        }
    }

    fn formula_product(formula: &str) -> Product {
        Product {
            id: "listings".to_owned(),
            name: "Listings".to_owned(),
            category: "Business Management".to_owned(),
            components: vec![
                Component::new("Locations", "Per Location", 100.0).with_var("L"),
                Component::new("Directories", "Per Directory", 10.0).with_var("G"),
                Component::new("Setup", "Flat", 50.0).flat(),
            ],
            mode: PricingMode::Formula { formula: formula.to_owned() },
        }
    }

    fn input(component: &str, value: f64) -> UsageInput {
        UsageInput::new("p", component, value)
    }

    // ========================================================================
    // Direct Mode Tests
    // ========================================================================

    #[test]
    fn test_direct_mode_sums_multipliers() {
        let inputs = [input("Reviews Processed", 1000.0), input("Calls Processed", 20.0)];
        let result = price_product(&direct_product(), &inputs);
        assert_eq!(result, ProductCredits { credits: 200.0, formula_fallback: false });
    }

    #[test]
    fn test_direct_mode_skips_unknown_components() {
        let inputs = [input("Calls Processed", 2.0), input("Emails Sent", 1_000_000.0)];
        assert_eq!(price_product(&direct_product(), &inputs).credits, 10.0);
    }

    #[test]
    fn test_direct_mode_no_inputs_is_zero() {
        assert_eq!(price_product(&direct_product(), &[]).credits, 0.0);
    }

    #[test]
    fn test_direct_mode_is_linear() {
        let inputs = [input("Reviews Processed", 30.0), input("Calls Processed", 7.0)];
        let doubled: Vec<UsageInput> =
            inputs.iter().map(|i| input(&i.component_name, i.value * 2.0)).collect();

        let single = price_product(&direct_product(), &inputs).credits;
        let double = price_product(&direct_product(), &doubled).credits;
        assert_eq!(double, single * 2.0);
    }

    #[test]
    fn test_zero_multiplier_contributes_nothing() {
        let mut product = direct_product();
        product.components[1].multiplier = 0.0;
        assert_eq!(price_product(&product, &[input("Calls Processed", 99.0)]).credits, 0.0);
    }

    // ========================================================================
    // Formula Mode Tests
    // ========================================================================

    #[test]
    fn test_formula_mode_evaluates_formula() {
        let inputs = [input("Locations", 4.0), input("Directories", 5.0)];
        let result = price_product(&formula_product("L * G * 10"), &inputs);
        assert_eq!(result, ProductCredits { credits: 200.0, formula_fallback: false });
    }

    #[test]
    fn test_formula_mode_missing_usage_binds_zero() {
        let inputs = [input("Locations", 4.0)];
        assert_eq!(price_product(&formula_product("L * 100 + G"), &inputs).credits, 400.0);
    }

    #[test]
    fn test_formula_mode_ignores_components_without_var_name() {
        let inputs = [input("Locations", 2.0), input("Setup", 1.0)];
        assert_eq!(price_product(&formula_product("L + G"), &inputs).credits, 2.0);
    }

    #[test]
    fn test_formula_failure_falls_back_to_multiplier_sum() {
        let inputs = [input("Locations", 2.0), input("Directories", 3.0), input("Setup", 1.0)];
        let result = price_product(&formula_product("L * X"), &inputs);
        assert_eq!(result, ProductCredits { credits: 280.0, formula_fallback: true });
    }

    #[test]
    fn test_formula_division_by_zero_falls_back() {
        let inputs = [input("Locations", 1.0)];
        let result = price_product(&formula_product("L / G"), &inputs);
        assert!(result.formula_fallback);
        assert_eq!(result.credits, 100.0);
    }

    #[test]
    fn test_formula_with_prefix_variable_names() {
        let mut product = formula_product("Loc * L");
        product.components[1].var_name = Some("Loc".to_owned());
        let inputs = [input("Locations", 3.0), input("Directories", 7.0)];
        assert_eq!(price_product(&product, &inputs).credits, 21.0);
    }

    #[test]
    fn test_bind_variables_zero_initialises_declared_names() {
        let variables = bind_variables(&formula_product("L"), &[]);
        assert_eq!(variables.len(), 2);
        assert_eq!(variables["L"], 0.0);
        assert_eq!(variables["G"], 0.0);
    }
}
