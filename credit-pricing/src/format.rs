//! Display strings for currency amounts and credit counts.
//!
//! # Examples
//!
//! ```
//! use credit_pricing::format::{NumberLocale, format_credits, format_currency, format_currency_with};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(format_currency(Decimal::new(123_450, 2), "$"), "$1,234.50");
//! assert_eq!(format_credits(12_345.0), "12,345");
//! assert_eq!(format_currency_with(Decimal::new(123_450, 2), "€", NumberLocale::DE_DE), "€1.234,50");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

/// Separators used when rendering numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    /// Separator between groups of three integer digits.
    pub grouping: char,
    /// Separator before the fractional digits.
    pub decimal: char,
}

impl NumberLocale {
    /// `1,234.5`
    pub const EN_US: Self = Self { grouping: ',', decimal: '.' };
    /// `1.234,5`
    pub const DE_DE: Self = Self { grouping: '.', decimal: ',' };
    /// `1 234,5` with a narrow no-break space.
    pub const FR_FR: Self = Self { grouping: '\u{202f}', decimal: ',' };
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::EN_US
    }
}

/// Formats `amount` with `symbol`, thousands separators and exactly two decimals.
///
/// Negative amounts put the sign before the symbol: `-$12.00`.
#[must_use]
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    format_currency_with(amount, symbol, NumberLocale::EN_US)
}

/// [`format_currency`] with explicit separators.
#[must_use]
pub fn format_currency_with(amount: Decimal, symbol: &str, locale: NumberLocale) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{}{}{fraction}", group(integer, locale.grouping), locale.decimal)
}

/// Formats a credit count with thousands separators and up to three decimals,
/// trailing zeros removed: `12,345`, `1,234.5`.
#[must_use]
pub fn format_credits(credits: f64) -> String {
    format_credits_with(credits, NumberLocale::EN_US)
}

/// [`format_credits`] with explicit separators.
#[must_use]
pub fn format_credits_with(credits: f64, locale: NumberLocale) -> String {
    if !credits.is_finite() {
        return credits.to_string();
    }

    let digits = format!("{:.3}", credits.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let negative = credits < 0.0 && (integer.bytes().any(|b| b != b'0') || !fraction.is_empty());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group(integer, locale.grouping));
    if !fraction.is_empty() {
        out.push(locale.decimal);
        out.push_str(fraction);
    }
    out
}

/// Inserts `separator` between groups of three digits, counting from the right.
fn group(integer: &str, separator: char) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len_utf8());
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
