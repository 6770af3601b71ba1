//! Pricing settings: global parameters, product catalog and rate scheme.
//!
//! Settings are supplied by the caller as a fully resolved value. They can be
//! built in code, deserialized from TOML or JSON, or taken from
//! [`PricingSettings::default`], which carries the built-in catalog.
//!
//! # Examples
//!
//! ```
//! use credit_pricing::settings::{PricingSettings, RateScheme};
//!
//! let toml = r#"
//!     [global]
//!     currency_symbol = "$"
//!     enterprise_minimum = 5000
//!     safety_buffer = 10
//!     safety_buffer_enabled = true
//!
//!     [rate_scheme]
//!     type = "fixed"
//!     price_per_credit = 0.15
//!
//!     [[products]]
//!     id = "chatbot"
//!     name = "Chatbot"
//!     category = "Customer Engagement"
//!
//!     [[products.components]]
//!     name = "Conversations"
//!     metric = "Per Conversation Responded"
//!     multiplier = 1.5
//! "#;
//!
//! let settings = PricingSettings::from_toml(toml).unwrap();
//! assert!(matches!(settings.rate_scheme, RateScheme::Fixed { .. }));
//! assert_eq!(settings.products.len(), 1);
//! ```

mod defaults;

use std::{collections::HashSet, path::Path};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PricingError, Result},
    formula,
};

/// Root pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Currency, buffer and minimum parameters.
    pub global: GlobalParameters,

    /// How a credit total is converted into a price.
    pub rate_scheme: RateScheme,

    /// Product catalog, in display order.
    #[serde(default)]
    pub products: Vec<Product>,
}

impl PricingSettings {
    /// Parses settings from TOML and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidSettings`] if the TOML is malformed or
    /// [`validate`](Self::validate) rejects the result.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let settings: Self = toml::from_str(toml_str)
            .map_err(|e| PricingError::InvalidSettings(format!("invalid TOML settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from JSON and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidSettings`] if the JSON is malformed or
    /// [`validate`](Self::validate) rejects the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| PricingError::InvalidSettings(format!("invalid JSON settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a file. Files ending in `.json` are read as JSON,
    /// anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidSettings`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PricingError::InvalidSettings(format!(
                "cannot read settings file {}: {e}",
                path.display()
            ))
        })?;

        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Looks up a product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Validates the settings for internal consistency.
    ///
    /// This method checks for:
    /// - Non-negative, finite enterprise minimum and safety buffer
    /// - A non-negative fixed rate, or a tier table that is non-empty, contiguous,
    ///   non-overlapping and open-ended only in its last tier
    /// - Unique, non-empty product ids
    /// - Unique component names and variable names within a product
    /// - Variable names that are plain identifiers
    /// - Formulas that only reference declared variables and parse
    ///
    /// [`calculate_pricing`](crate::pricing::calculate_pricing) does not call this;
    /// the loaders do.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidSettings`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.global.validate()?;
        self.rate_scheme.validate()?;

        let mut ids = HashSet::new();
        for product in &self.products {
            if !ids.insert(product.id.as_str()) {
                return Err(PricingError::InvalidSettings(format!(
                    "duplicate product id: {}",
                    product.id
                )));
            }
            product.validate()?;
        }

        Ok(())
    }
}

/// Deployment-wide pricing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalParameters {
    /// ISO 4217 currency code (e.g. "USD").
    #[serde(default = "default_currency_base")]
    pub currency_base: String,

    /// Symbol prepended to formatted amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Billed credits never fall below this floor.
    #[serde(default)]
    pub enterprise_minimum: f64,

    /// Markup applied to raw credits, in percent.
    #[serde(default)]
    pub safety_buffer: f64,

    /// Whether [`safety_buffer`](Self::safety_buffer) is applied.
    #[serde(default)]
    pub safety_buffer_enabled: bool,
}

fn default_currency_base() -> String {
    "USD".to_owned()
}

fn default_currency_symbol() -> String {
    "$".to_owned()
}

impl GlobalParameters {
    fn validate(&self) -> Result<()> {
        if !self.enterprise_minimum.is_finite() || self.enterprise_minimum < 0.0 {
            return Err(PricingError::InvalidSettings(format!(
                "enterprise_minimum must be a non-negative number, got {}",
                self.enterprise_minimum
            )));
        }
        if !self.safety_buffer.is_finite() || self.safety_buffer < 0.0 {
            return Err(PricingError::InvalidSettings(format!(
                "safety_buffer must be a non-negative percentage, got {}",
                self.safety_buffer
            )));
        }
        Ok(())
    }
}

/// How credits are converted into a price.
///
/// A deployment uses exactly one scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateScheme {
    /// One price per credit regardless of volume.
    Fixed {
        /// Price of a single credit.
        price_per_credit: Decimal,
    },

    /// Volume pricing: the whole credit total is billed at the rate of the tier
    /// it falls into.
    Tiered {
        /// Tier table; order does not matter, it is sorted by `min_credits` on use.
        tiers: Vec<PricingTier>,
    },
}

impl RateScheme {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed { price_per_credit } => {
                if price_per_credit.is_sign_negative() && !price_per_credit.is_zero() {
                    return Err(PricingError::InvalidSettings(format!(
                        "price_per_credit must not be negative, got {price_per_credit}"
                    )));
                }
                Ok(())
            }
            Self::Tiered { tiers } => validate_tiers(tiers),
        }
    }
}

/// Checks that a tier table partitions the credit axis.
fn validate_tiers(tiers: &[PricingTier]) -> Result<()> {
    if tiers.is_empty() {
        return Err(PricingError::InvalidSettings("tier table is empty".to_owned()));
    }

    let mut sorted: Vec<&PricingTier> = tiers.iter().collect();
    sorted.sort_by(|a, b| a.min_credits.total_cmp(&b.min_credits));

    for tier in &sorted {
        if tier.price_per_credit.is_sign_negative() && !tier.price_per_credit.is_zero() {
            return Err(PricingError::InvalidSettings(format!(
                "tier '{}' has a negative price_per_credit",
                tier.name
            )));
        }
        if tier.max_credits.is_some_and(|max| max < tier.min_credits) {
            return Err(PricingError::InvalidSettings(format!(
                "tier '{}' has max_credits below min_credits {}",
                tier.name, tier.min_credits
            )));
        }
    }

    for pair in sorted.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        let Some(max) = lower.max_credits else {
            return Err(PricingError::InvalidSettings(format!(
                "only the last tier may be open-ended, but '{}' is followed by '{}'",
                lower.name, upper.name
            )));
        };
        if upper.min_credits <= max {
            return Err(PricingError::InvalidSettings(format!(
                "tiers '{}' and '{}' overlap",
                lower.name, upper.name
            )));
        }
        if upper.min_credits > max + 1.0 {
            return Err(PricingError::InvalidSettings(format!(
                "gap between tiers '{}' and '{}': {max} to {}",
                lower.name, upper.name, upper.min_credits
            )));
        }
    }

    Ok(())
}

/// One row of a volume tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Display name (e.g. "Starter", "Enterprise").
    pub name: String,
    /// Lowest credit total in this tier, inclusive.
    pub min_credits: f64,
    /// Highest credit total in this tier, inclusive (None = unbounded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_credits: Option<f64>,
    /// Price of every credit when the total falls in this tier.
    pub price_per_credit: Decimal,
}

impl PricingTier {
    /// Returns `true` if `credits` lies within this tier's inclusive range.
    #[must_use]
    pub fn contains(&self, credits: f64) -> bool {
        credits >= self.min_credits && self.max_credits.is_none_or(|max| credits <= max)
    }
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier referenced by usage inputs.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Catalog grouping.
    #[serde(default)]
    pub category: String,
    /// Billable components, in display order.
    #[serde(default)]
    pub components: Vec<Component>,
    /// How component usage turns into credits.
    #[serde(default)]
    pub mode: PricingMode,
}

impl Product {
    /// Looks up a component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Returns `true` if credits come from a formula.
    #[must_use]
    pub fn is_formula(&self) -> bool {
        matches!(self.mode, PricingMode::Formula { .. })
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PricingError::InvalidSettings(format!(
                "product '{}' has an empty id",
                self.name
            )));
        }

        let mut names = HashSet::new();
        let mut var_names = Vec::new();
        for component in &self.components {
            if !names.insert(component.name.as_str()) {
                return Err(PricingError::InvalidSettings(format!(
                    "product '{}' has duplicate component '{}'",
                    self.id, component.name
                )));
            }
            if !component.multiplier.is_finite() {
                return Err(PricingError::InvalidSettings(format!(
                    "component '{}' of product '{}' has a non-finite multiplier",
                    component.name, self.id
                )));
            }
            if let Some(var_name) = component.var_name.as_deref() {
                if !is_identifier(var_name) {
                    return Err(PricingError::InvalidSettings(format!(
                        "component '{}' of product '{}' has invalid var_name '{var_name}'",
                        component.name, self.id
                    )));
                }
                if var_names.contains(&var_name) {
                    return Err(PricingError::InvalidSettings(format!(
                        "product '{}' declares var_name '{var_name}' more than once",
                        self.id
                    )));
                }
                var_names.push(var_name);
            }
        }

        if let PricingMode::Formula { formula } = &self.mode {
            formula::check_syntax(formula, &var_names).map_err(|e| {
                PricingError::InvalidSettings(format!("product '{}': {e}", self.id))
            })?;
        }

        Ok(())
    }
}

/// Variable names must start with a letter or underscore and contain only
/// ASCII alphanumerics and underscores.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// How a product's component usage is turned into credits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PricingMode {
    /// Sum of `usage * multiplier` over components.
    #[default]
    Direct,

    /// A formula over component variables.
    Formula {
        /// Expression using the `var_name`s of the product's components,
        /// e.g. `"(L * G) * B"`.
        formula: String,
    },
}

/// A billable part of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Name referenced by usage inputs.
    pub name: String,
    /// Usage metric label (e.g. "Per Location").
    #[serde(default)]
    pub metric: String,
    /// Credits per unit of usage.
    #[serde(default)]
    pub multiplier: f64,
    /// Usage is entered as 0 or 1 rather than a quantity. Display hint only.
    #[serde(default)]
    pub is_flat: bool,
    /// Variable that binds this component's usage in a product formula.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_name: Option<String>,
}

impl Component {
    /// Creates a component with the given multiplier and no formula variable.
    pub fn new(name: impl Into<String>, metric: impl Into<String>, multiplier: f64) -> Self {
        Self {
            name: name.into(),
            metric: metric.into(),
            multiplier,
            is_flat: false,
            var_name: None,
        }
    }

    /// Marks the component as a flat (0/1) fee.
    #[must_use]
    pub fn flat(mut self) -> Self {
        self.is_flat = true;
        self
    }

    /// Binds the component to a formula variable.
    #[must_use]
    pub fn with_var(mut self, var_name: impl Into<String>) -> Self {
        self.var_name = Some(var_name.into());
        self
    }
}
