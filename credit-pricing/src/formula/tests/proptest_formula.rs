use std::collections::HashMap;

use proptest::prelude::*;

use crate::formula::evaluate_formula;

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_prefix_names_evaluate_like_direct_arithmetic(
        l in -1_000.0f64..1_000.0,
        loc in -1_000.0f64..1_000.0,
        lo in -1_000.0f64..1_000.0,
    ) {
        let vars = HashMap::from([
            ("L".to_owned(), l),
            ("Loc".to_owned(), loc),
            ("Lo".to_owned(), lo),
        ]);

        let result = evaluate_formula("Loc * L + Lo - L", &vars)
            .expect("formula with bound variables should evaluate");

        prop_assert_eq!(result, round_2(loc * l + lo - l));
    }

    #[test]
    fn test_grouping_and_power_match_direct_arithmetic(
        a in 0.0f64..100.0,
        b in 0.0f64..100.0,
        c in 1.0f64..100.0,
    ) {
        let vars = HashMap::from([
            ("A".to_owned(), a),
            ("B".to_owned(), b),
            ("C".to_owned(), c),
        ]);

        let result = evaluate_formula("(A + B) / C ^ 2", &vars)
            .expect("formula with bound variables should evaluate");

        prop_assert_eq!(result, round_2((a + b) / c.powf(2.0)));
    }

    #[test]
    fn test_negative_bindings_stay_single_operands(
        a in -100.0f64..100.0,
        exponent in 1u32..4,
    ) {
        let vars = HashMap::from([("A".to_owned(), a)]);
        let formula = format!("A ^ {exponent}");

        let result = evaluate_formula(&formula, &vars)
            .expect("power of a bound variable should evaluate");

        prop_assert_eq!(result, round_2(a.powf(f64::from(exponent))));
    }

    #[test]
    fn test_binding_order_does_not_matter(
        names in proptest::sample::subsequence(vec!["x", "xy", "xyz", "y", "yx"], 1..=5),
        value in 0u32..10_000,
    ) {
        let vars: HashMap<String, f64> =
            names.iter().map(|name| ((*name).to_owned(), f64::from(value))).collect();
        let formula = names.join(" + ");

        let result = evaluate_formula(&formula, &vars)
            .expect("formula with bound variables should evaluate");

        prop_assert_eq!(result, f64::from(value) * names.len() as f64);
    }

    #[test]
    fn test_unbound_identifier_always_rejected(
        identifier in "[A-Za-z][A-Za-z0-9_]{0,8}",
        constant in 0u32..1_000,
    ) {
        let formula = format!("{constant} + {identifier}");
        prop_assert!(evaluate_formula(&formula, &HashMap::new()).is_err());
    }

    #[test]
    fn test_results_have_at_most_two_decimals(
        numerator in 0u32..1_000_000,
        denominator in 1u32..1_000,
    ) {
        let formula = format!("{numerator} / {denominator}");
        let result = evaluate_formula(&formula, &HashMap::new())
            .expect("division by a non-zero constant should evaluate");

        prop_assert_eq!(result, round_2(f64::from(numerator) / f64::from(denominator)));
    }
}
