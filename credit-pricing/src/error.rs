//! Error types for the credit pricing core.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Formula Errors** ([`PricingError::Formula`], [`PricingError::MissingVariable`]):
//!   a product formula could not be evaluated or does not reference a declared variable
//! - **Settings Errors** ([`PricingError::InvalidSettings`]): configuration could not be
//!   read, parsed, or failed validation
//!
//! [`calculate_pricing`](crate::pricing::calculate_pricing) never returns an error:
//! formula failures are absorbed by the component pricer, which falls back to the
//! multiplier sum.
//!
//! # Examples
//!
//! ```
//! use credit_pricing::error::{FormulaErrorKind, PricingError};
//!
//! let err = PricingError::formula("X + 1", FormulaErrorKind::UnauthorizedCharacters);
//! assert!(err.to_string().contains("X + 1"));
//! ```

use thiserror::Error;

/// Result type alias for pricing operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur in the pricing core.
///
/// # Error Recovery
///
/// - **Formula errors** ([`Formula`](Self::Formula)): fix the formula in the product
///   settings; during a calculation the multiplier sum is used instead
/// - **Validation errors** ([`MissingVariable`](Self::MissingVariable),
///   [`InvalidSettings`](Self::InvalidSettings)): fix the configuration and reload
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Formula evaluation failed.
    ///
    /// Carries the original formula text (before variable substitution) so the
    /// failing product can be identified. Common causes include:
    /// - A variable name that no component declares (typo or stale formula)
    /// - Unbalanced parentheses or a dangling operator
    /// - Division by zero or another non-finite result
    ///
    /// # Recovery
    ///
    /// Check the formula against the `var_name` of every component of the product.
    #[error("Failed to evaluate formula: {formula} ({kind})")]
    Formula {
        /// Formula text as configured.
        formula: String,
        /// What went wrong.
        kind: FormulaErrorKind,
    },

    /// A formula does not reference a variable it is required to use.
    #[error("Formula does not reference required variable '{variable}': {formula}")]
    MissingVariable {
        /// Formula text as configured.
        formula: String,
        /// The variable name that was not found.
        variable: String,
    },

    /// Pricing settings are unreadable or inconsistent.
    ///
    /// This error occurs when settings cannot be parsed (TOML or JSON syntax, missing
    /// fields) or when [`PricingSettings::validate`](crate::settings::PricingSettings::validate)
    /// rejects them, for example a tier table with gaps or overlapping ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use credit_pricing::error::PricingError;
    ///
    /// let err = PricingError::InvalidSettings("tier table is empty".to_owned());
    /// assert_eq!(err.to_string(), "Invalid pricing settings: tier table is empty");
    /// ```
    #[error("Invalid pricing settings: {0}")]
    InvalidSettings(String),
}

impl PricingError {
    /// Builds a [`PricingError::Formula`] for the given formula text.
    pub fn formula(formula: impl Into<String>, kind: FormulaErrorKind) -> Self {
        Self::Formula { formula: formula.into(), kind }
    }
}

/// Reason a formula could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaErrorKind {
    /// After substitution the expression still contains characters outside of
    /// digits, whitespace and `+ - * / ^ . ( )`. Unbound variables end up here.
    #[error("contains unauthorized characters")]
    UnauthorizedCharacters,

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected '{token}' at offset {offset}")]
    UnexpectedToken {
        /// Textual form of the token.
        token: String,
        /// Byte offset in the substituted expression.
        offset: usize,
    },

    /// The expression ended while an operand or `)` was still expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A numeric literal could not be parsed (e.g. `1.2.3`).
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    /// Parentheses, unary signs or powers are nested deeper than the parser allows.
    #[error("expression nested deeper than {limit} levels")]
    TooDeep {
        /// Maximum nesting depth.
        limit: usize,
    },

    /// The result is NaN or infinite.
    #[error("evaluation resulted in a non-finite number")]
    NonFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_error_display_echoes_formula() {
        let error = PricingError::formula("1 / 0", FormulaErrorKind::NonFinite);
        assert_eq!(
            error.to_string(),
            "Failed to evaluate formula: 1 / 0 (evaluation resulted in a non-finite number)"
        );
    }

    #[test]
    fn test_unexpected_token_display() {
        let kind = FormulaErrorKind::UnexpectedToken { token: ")".to_owned(), offset: 4 };
        assert_eq!(kind.to_string(), "unexpected ')' at offset 4");
    }

    #[test]
    fn test_too_deep_display() {
        let kind = FormulaErrorKind::TooDeep { limit: 256 };
        assert_eq!(kind.to_string(), "expression nested deeper than 256 levels");
    }

    #[test]
    fn test_missing_variable_display() {
        let error = PricingError::MissingVariable {
            formula: "L * 2".to_owned(),
            variable: "G".to_owned(),
        };
        assert!(error.to_string().contains("'G'"));
        assert!(error.to_string().contains("L * 2"));
    }

    #[test]
    fn test_invalid_settings_display() {
        let error = PricingError::InvalidSettings("duplicate product id".into());
        assert_eq!(error.to_string(), "Invalid pricing settings: duplicate product id");
    }
}
