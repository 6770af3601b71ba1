//! Restricted arithmetic formulas over named component variables.
//!
//! A product in formula mode computes its credits from an expression such as
//! `(L * G * F) * (B + M)`, where each letter is the `var_name` of one of its
//! components. Evaluation happens in three steps:
//!
//! 1. Every bound variable is replaced by its value, whole words only and longest
//!    name first, so `Loc` is never rewritten through `L`.
//! 2. The substituted text must contain nothing but digits, whitespace and
//!    `+ - * / ^ . ( )`. Anything left over, such as an unbound variable, fails here.
//! 3. The text is parsed and evaluated by a small recursive-descent parser; no
//!    general-purpose evaluator is involved.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//!
//! use credit_pricing::formula::evaluate_formula;
//!
//! let vars = HashMap::from([("L".to_owned(), 2.0), ("G".to_owned(), 3.0)]);
//! assert_eq!(evaluate_formula("(L * G) ^ 2", &vars).unwrap(), 36.0);
//! ```

mod parser;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::error::{FormulaErrorKind, PricingError, Result};

/// Sample formulas offered to administrators when configuring a product.
pub const EXAMPLE_FORMULAS: &[(&str, &str)] = &[
    ("Simple volume", "(L * G * F) * B"),
    ("Volume with premium", "(L * G * F) * (B + M)"),
    ("Tiered pricing", "L * (B + (G * 0.5))"),
    ("Exponential", "B * (L ^ 2)"),
];

/// Evaluates `formula` with the given variable bindings.
///
/// Negative values are substituted in parentheses, so `L ^ 2` with `L = -5`
/// is `25`. The result is rounded to two decimal places.
///
/// # Errors
///
/// Returns [`PricingError::Formula`] carrying the formula text as configured when:
/// - the substituted expression contains anything besides numbers and operators,
///   which includes every variable name that has no binding
/// - the expression is malformed
/// - the result is NaN or infinite (e.g. division by zero)
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use credit_pricing::formula::evaluate_formula;
///
/// let vars = HashMap::from([("L".to_owned(), 5.0)]);
/// assert_eq!(evaluate_formula("L + 1", &vars).unwrap(), 6.0);
/// assert!(evaluate_formula("1 / 0", &HashMap::new()).is_err());
/// assert!(evaluate_formula("X + 1", &HashMap::new()).is_err());
/// ```
pub fn evaluate_formula(formula: &str, variables: &HashMap<String, f64>) -> Result<f64> {
    let expression = substitute_variables(formula, variables);

    if !parser::is_whitelisted(&expression) {
        return Err(PricingError::formula(formula, FormulaErrorKind::UnauthorizedCharacters));
    }

    let value = parser::evaluate(&expression).map_err(|kind| PricingError::formula(formula, kind))?;

    if !value.is_finite() {
        return Err(PricingError::formula(formula, FormulaErrorKind::NonFinite));
    }

    Ok((value * 100.0).round() / 100.0)
}

/// Checks that `formula` uses every name in `required_variables` and evaluates
/// when each of them is bound to `1`.
///
/// # Errors
///
/// Returns [`PricingError::MissingVariable`] for the first required variable that
/// does not occur as a whole word, or the evaluation error otherwise.
///
/// # Examples
///
/// ```
/// use credit_pricing::formula::validate_formula;
///
/// assert!(validate_formula("L * (B + G)", &["L", "B", "G"]).is_ok());
/// assert!(validate_formula("L * B", &["L", "B", "G"]).is_err());
/// ```
pub fn validate_formula(formula: &str, required_variables: &[&str]) -> Result<()> {
    if let Some(missing) = required_variables.iter().find(|name| !contains_word(formula, name)) {
        return Err(PricingError::MissingVariable {
            formula: formula.to_owned(),
            variable: (*missing).to_owned(),
        });
    }

    let test_values: HashMap<String, f64> =
        required_variables.iter().map(|name| ((*name).to_owned(), 1.0)).collect();
    evaluate_formula(formula, &test_values).map(|_| ())
}

/// Checks that `formula` only uses the given variable names and is well-formed.
///
/// Unlike [`validate_formula`], a non-finite result (for example `1 / (A - B)`
/// with every variable bound to 1) is accepted, since it depends on usage values.
pub(crate) fn check_syntax(formula: &str, declared_variables: &[&str]) -> Result<()> {
    let bindings: HashMap<String, f64> =
        declared_variables.iter().map(|name| ((*name).to_owned(), 1.0)).collect();
    let expression = substitute_variables(formula, &bindings);

    if !parser::is_whitelisted(&expression) {
        return Err(PricingError::formula(formula, FormulaErrorKind::UnauthorizedCharacters));
    }
    parser::evaluate(&expression).map(|_| ()).map_err(|kind| PricingError::formula(formula, kind))
}

/// Renders a formula for display, using `×` and `÷` for multiplication and division.
#[must_use]
pub fn display_formula(formula: &str) -> String {
    formula.replace('*', "×").replace('/', "÷")
}

/// Replaces every whole-word occurrence of each bound variable with its value.
///
/// Names are processed longest first; ties are broken alphabetically so the
/// output does not depend on map iteration order. Negative values are wrapped
/// in parentheses so they stay a single operand.
fn substitute_variables(formula: &str, variables: &HashMap<String, f64>) -> String {
    let mut bindings: Vec<(&String, &f64)> =
        variables.iter().filter(|(name, _)| !name.is_empty()).collect();
    bindings.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    bindings.into_iter().fold(formula.to_owned(), |expression, (name, value)| {
        let rendered = if *value < 0.0 {
            format!("({value})")
        } else {
            value.to_string()
        };
        replace_word(&expression, name, &rendered)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte offsets of `word` in `text` that sit on word boundaries at both ends.
fn word_matches<'a>(text: &'a str, word: &'a str) -> impl Iterator<Item = usize> + 'a {
    text.match_indices(word).filter_map(move |(start, _)| {
        let end = start + word.len();
        let before_ok = !text[..start].chars().next_back().is_some_and(is_word_char);
        let after_ok = !text[end..].chars().next().is_some_and(is_word_char);
        (before_ok && after_ok).then_some(start)
    })
}

fn contains_word(text: &str, word: &str) -> bool {
    !word.is_empty() && word_matches(text, word).next().is_some()
}

fn replace_word(text: &str, word: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for start in word_matches(text, word) {
        out.push_str(&text[last..start]);
        out.push_str(replacement);
        last = start + word.len();
    }
    out.push_str(&text[last..]);
    out
}
