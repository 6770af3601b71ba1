use std::collections::HashMap;

use super::*;

mod proptest_formula;

fn vars(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(name, value)| ((*name).to_owned(), *value)).collect()
}

// ========================================================================
// Evaluation Tests
// ========================================================================

#[test]
fn test_evaluate_single_variable() {
    assert_eq!(evaluate_formula("L + 1", &vars(&[("L", 5.0)])).unwrap(), 6.0);
}

#[test]
fn test_evaluate_power_of_product() {
    let result = evaluate_formula("(L * G) ^ 2", &vars(&[("L", 2.0), ("G", 3.0)])).unwrap();
    assert_eq!(result, 36.0);
}

#[test]
fn test_evaluate_without_variables() {
    assert_eq!(evaluate_formula("2 * (3 + 4)", &HashMap::new()).unwrap(), 14.0);
}

#[test]
fn test_evaluate_rounds_to_two_decimals() {
    assert_eq!(evaluate_formula("10 / 3", &HashMap::new()).unwrap(), 3.33);
    assert_eq!(evaluate_formula("2 / 3", &HashMap::new()).unwrap(), 0.67);
}

#[test]
fn test_evaluate_example_formulas() {
    let bindings = vars(&[("L", 2.0), ("G", 4.0), ("F", 1.5), ("B", 10.0), ("M", 5.0)]);
    let results: Vec<f64> = EXAMPLE_FORMULAS
        .iter()
        .map(|(_, formula)| evaluate_formula(formula, &bindings).unwrap())
        .collect();
    assert_eq!(results, vec![120.0, 180.0, 24.0, 40.0]);
}

#[test]
fn test_evaluate_fractional_and_negative_values() {
    assert_eq!(evaluate_formula("A * B", &vars(&[("A", 0.5), ("B", -4.0)])).unwrap(), -2.0);
    assert_eq!(evaluate_formula("1 - A", &vars(&[("A", -4.0)])).unwrap(), 5.0);
}

// ========================================================================
// Substitution Tests
// ========================================================================

#[test]
fn test_negative_value_raised_to_power() {
    assert_eq!(evaluate_formula("L ^ 2", &vars(&[("L", -5.0)])).unwrap(), 25.0);
    assert_eq!(evaluate_formula("L ** 3", &vars(&[("L", -2.0)])).unwrap(), -8.0);
    assert_eq!(evaluate_formula("2 ^ L", &vars(&[("L", -1.0)])).unwrap(), 0.5);
}

#[test]
fn test_negative_value_after_operators() {
    assert_eq!(evaluate_formula("10 - L", &vars(&[("L", -3.0)])).unwrap(), 13.0);
    assert_eq!(evaluate_formula("-L", &vars(&[("L", -3.0)])).unwrap(), 3.0);
}

#[test]
fn test_prefix_variable_names_do_not_collide() {
    let bindings = vars(&[("L", 2.0), ("Loc", 10.0)]);
    assert_eq!(evaluate_formula("Loc * L", &bindings).unwrap(), 20.0);
    assert_eq!(evaluate_formula("L + Loc + L", &bindings).unwrap(), 14.0);
}

#[test]
fn test_suffix_variable_names_do_not_collide() {
    let bindings = vars(&[("G", 3.0), ("AG", 7.0)]);
    assert_eq!(evaluate_formula("AG - G", &bindings).unwrap(), 4.0);
}

#[test]
fn test_substitution_respects_word_boundaries() {
    assert_eq!(substitute_variables("L*Loc", &vars(&[("L", 1.0)])), "1*Loc");
    assert_eq!(substitute_variables("(L)+L_2", &vars(&[("L", 3.0)])), "(3)+L_2");
}

#[test]
fn test_substitution_ignores_empty_names() {
    assert_eq!(substitute_variables("1 + 1", &vars(&[("", 9.0)])), "1 + 1");
}

#[test]
fn test_multi_letter_variable_names() {
    let bindings = vars(&[("Base", 100.0), ("Locations", 3.0)]);
    assert_eq!(evaluate_formula("Base * Locations", &bindings).unwrap(), 300.0);
}

// ========================================================================
// Failure Tests
// ========================================================================

#[test]
fn test_division_by_zero_fails() {
    let err = evaluate_formula("1 / 0", &HashMap::new()).unwrap_err();
    assert_eq!(err, PricingError::formula("1 / 0", FormulaErrorKind::NonFinite));
}

#[test]
fn test_zero_over_zero_fails() {
    let err = evaluate_formula("L / G", &vars(&[("L", 0.0), ("G", 0.0)])).unwrap_err();
    assert!(matches!(err, PricingError::Formula { kind: FormulaErrorKind::NonFinite, .. }));
}

#[test]
fn test_unbound_variable_fails() {
    let err = evaluate_formula("X + 1", &HashMap::new()).unwrap_err();
    assert_eq!(err, PricingError::formula("X + 1", FormulaErrorKind::UnauthorizedCharacters));
}

#[test]
fn test_typo_in_variable_fails() {
    let err = evaluate_formula("Lc * 2", &vars(&[("L", 1.0), ("Loc", 1.0)])).unwrap_err();
    assert!(err.to_string().contains("Lc * 2"));
}

#[test]
fn test_code_injection_rejected() {
    for formula in ["process.exit(1)", "1; drop", "alert`1`", "[] + {}", "1 % 2", "1, 2"] {
        assert!(evaluate_formula(formula, &HashMap::new()).is_err(), "accepted {formula}");
    }
}

#[test]
fn test_empty_formula_fails() {
    assert!(evaluate_formula("", &HashMap::new()).is_err());
    assert!(evaluate_formula("   ", &HashMap::new()).is_err());
}

#[test]
fn test_malformed_formula_fails() {
    let err = evaluate_formula("(L + 1", &vars(&[("L", 1.0)])).unwrap_err();
    assert_eq!(err, PricingError::formula("(L + 1", FormulaErrorKind::UnexpectedEnd));
}

#[test]
fn test_overflow_to_infinity_fails() {
    let err = evaluate_formula("10 ^ 400", &HashMap::new()).unwrap_err();
    assert!(matches!(err, PricingError::Formula { kind: FormulaErrorKind::NonFinite, .. }));
}

#[test]
fn test_non_finite_binding_fails() {
    assert!(evaluate_formula("L + 1", &vars(&[("L", f64::NAN)])).is_err());
    assert!(evaluate_formula("L + 1", &vars(&[("L", f64::INFINITY)])).is_err());
}

// ========================================================================
// Validation Tests
// ========================================================================

#[test]
fn test_validate_formula_accepts_complete_formula() {
    assert!(validate_formula("(L * G * F) * (B + M)", &["L", "G", "F", "B", "M"]).is_ok());
}

#[test]
fn test_validate_formula_reports_missing_variable() {
    let err = validate_formula("L * G", &["L", "G", "F"]).unwrap_err();
    assert_eq!(
        err,
        PricingError::MissingVariable { formula: "L * G".to_owned(), variable: "F".to_owned() }
    );
}

#[test]
fn test_validate_formula_requires_whole_words() {
    assert!(validate_formula("Loc * 2", &["L"]).is_err());
}

#[test]
fn test_validate_formula_rejects_unknown_variable() {
    let err = validate_formula("L * Z", &["L"]).unwrap_err();
    assert!(matches!(err, PricingError::Formula { .. }));
}

#[test]
fn test_validate_formula_without_requirements() {
    assert!(validate_formula("2 + 2", &[]).is_ok());
    assert!(validate_formula("2 +", &[]).is_err());
}

// ========================================================================
// Display Tests
// ========================================================================

#[test]
fn test_display_formula() {
    assert_eq!(display_formula("(L * G) / B ^ 2"), "(L × G) ÷ B ^ 2");
}

// ========================================================================
// Syntax Check Tests
// ========================================================================

#[test]
fn test_check_syntax_accepts_non_finite_results() {
    assert!(check_syntax("1 / (A - B)", &["A", "B"]).is_ok());
}

#[test]
fn test_check_syntax_rejects_undeclared_variable() {
    let err = check_syntax("A * C", &["A", "B"]).unwrap_err();
    assert_eq!(err, PricingError::formula("A * C", FormulaErrorKind::UnauthorizedCharacters));
}

#[test]
fn test_deeply_nested_formula_fails() {
    let formula = format!("{}L{}", "(".repeat(1000), ")".repeat(1000));
    let err = evaluate_formula(&formula, &vars(&[("L", 1.0)])).unwrap_err();
    assert!(matches!(err, PricingError::Formula { kind: FormulaErrorKind::TooDeep { .. }, .. }));
}

#[test]
fn test_check_syntax_rejects_deeply_nested_formula() {
    let formula = format!("{}L{}", "(".repeat(1000), ")".repeat(1000));
    assert!(check_syntax(&formula, &["L"]).is_err());
}

#[test]
fn test_check_syntax_rejects_malformed_formula() {
    assert!(check_syntax("A * (B", &["A", "B"]).is_err());
}
