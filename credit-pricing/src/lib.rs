//! Credit Pricing: usage-based quote computation
//!
//! A Rust library that turns per-component usage estimates into a credit total
//! and a contract price. Products convert usage into credits either by fixed
//! multipliers or by an administrator-authored formula; the credit total is
//! buffered, raised to an enterprise minimum, and priced with a fixed rate or a
//! volume tier table.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────────┐
//! │  Usage inputs    │     │  PricingSettings    │  TOML / JSON / Default
//! │  (product,       │     │  (catalog, tiers,   │
//! │   component, n)  │     │   buffer, minimum)  │
//! └────────┬─────────┘     └──────────┬──────────┘
//!          │                          │
//! ┌────────▼──────────────────────────▼──────────┐
//! │            calculate_pricing                  │
//! │  ┌─────────────────┐   ┌──────────────────┐  │
//! │  │ Component       │──▶│ Formula          │  │
//! │  │ pricer          │   │ evaluator        │  │
//! │  └────────┬────────┘   └──────────────────┘  │
//! │           │ credits                          │
//! │  ┌────────▼────────┐   ┌──────────────────┐  │
//! │  │ Buffer, minimum │──▶│ Tier / rate      │  │
//! │  │ discounts       │   │ resolver         │  │
//! │  └─────────────────┘   └──────────────────┘  │
//! └────────┬─────────────────────────────────────┘
//!          │ CalculationResult
//! ┌────────▼────────┐
//! │  Quote, format  │  upsell net pay, display strings
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Price a Set of Usage Inputs
//!
//! ```rust
//! use credit_pricing::{
//!     format::{format_credits, format_currency},
//!     pricing::{UsageInput, calculate_pricing},
//!     settings::PricingSettings,
//! };
//!
//! let settings = PricingSettings::default();
//! let inputs = vec![
//!     UsageInput::new("search-ai", "Prompts", 2_000.0),
//!     UsageInput::new("reviews", "Reviews Aggregated", 3_000.0),
//! ];
//!
//! let result = calculate_pricing(&inputs, &settings, &[]);
//!
//! assert_eq!(format_credits(result.final_credits), "16,000");
//! assert_eq!(result.rate.tier_name(), Some("Growth"));
//! assert_eq!(format_currency(result.total_price, &settings.global.currency_symbol), "$2,400.00");
//! ```
//!
//! ## 2. Load Settings from TOML
//!
//! ```rust
//! use credit_pricing::settings::PricingSettings;
//!
//! # fn example() -> credit_pricing::Result<()> {
//! let settings = PricingSettings::from_toml(
//!     r#"
//!     [global]
//!     enterprise_minimum = 1000
//!
//!     [rate_scheme]
//!     type = "fixed"
//!     price_per_credit = 0.12
//!     "#,
//! )?;
//! assert_eq!(settings.global.enterprise_minimum, 1000.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## 3. Evaluate a Formula
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use credit_pricing::formula::evaluate_formula;
//!
//! let vars = HashMap::from([("L".to_owned(), 2.0), ("Loc".to_owned(), 10.0)]);
//! assert_eq!(evaluate_formula("Loc * L + 1", &vars).unwrap(), 21.0);
//! ```
//!
//! # Module Organization
//!
//! - [`formula`]: restricted arithmetic formulas over component variables
//! - [`settings`]: catalog, rate scheme and global parameters, with loaders
//! - [`pricing`]: component pricer, tier resolver, pipeline, quotes
//! - [`format`]: currency and credit display strings
//! - [`error`]: error types with recovery guidance
//!
//! # Error Handling
//!
//! [`calculate_pricing`](pricing::calculate_pricing) cannot fail. A product whose
//! formula does not evaluate is priced by its multipliers and flagged on its
//! breakdown line. Fallible operations (formula evaluation, settings loading)
//! return [`Result<T, PricingError>`](error::Result):
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use credit_pricing::{PricingError, error::FormulaErrorKind, formula::evaluate_formula};
//!
//! match evaluate_formula("L / 0", &HashMap::from([("L".to_owned(), 1.0)])) {
//!     Ok(value) => println!("credits: {value}"),
//!     Err(PricingError::Formula { formula, kind: FormulaErrorKind::NonFinite }) => {
//!         eprintln!("{formula} divides by zero");
//!     }
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (formula fallbacks at `WARN`, dropped
//! products and resolved rates at `DEBUG`) and installs no subscriber.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod format;
pub mod formula;
pub mod pricing;
pub mod settings;

pub use error::{PricingError, Result};
pub use pricing::{CalculationResult, UsageInput, calculate_pricing};
pub use settings::PricingSettings;
