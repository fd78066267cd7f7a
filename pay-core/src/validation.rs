//! Salary input validation.
//!
//! Raw salary values arrive either as free-form text typed by a user or as a
//! number read from a stored record. Both are checked by
//! [`SalaryValidator::validate`], which applies these rules in order:
//!
//! 1. empty or non-numeric input is [`InputErrorKind::NotNumeric`]
//! 2. a number that is zero or negative is [`InputErrorKind::NotPositive`]
//! 3. anything else is accepted as a [`ValidSalary`]
//!
//! `NaN` and infinities are never numeric. Text is trimmed and comma thousands
//! separators are removed before parsing.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Message shown to the user for every rejected salary.
pub const INVALID_SALARY_MESSAGE: &str = "Please enter a valid numeric value greater than 0.";

/// Why a raw salary was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputErrorKind {
    /// Empty, non-numeric, `NaN`, or infinite input.
    #[error("salary is not a finite number")]
    NotNumeric,

    /// Numeric but zero or negative.
    #[error("salary must be greater than zero")]
    NotPositive,
}

impl InputErrorKind {
    /// User-facing text for this rejection.
    pub fn user_message(&self) -> &'static str {
        INVALID_SALARY_MESSAGE
    }
}

/// A salary as received from a host, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSalary {
    /// Free-form text from an input field.
    Text(String),
    /// A floating point value, e.g. from a loaded record.
    Number(f64),
    /// An exact decimal value.
    Amount(Decimal),
}

impl From<&str> for RawSalary {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawSalary {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawSalary {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Decimal> for RawSalary {
    fn from(value: Decimal) -> Self {
        Self::Amount(value)
    }
}

/// A salary that passed validation: finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ValidSalary(Decimal);

impl ValidSalary {
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for ValidSalary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stateless salary validator.
pub struct SalaryValidator;

impl SalaryValidator {
    /// Validates a raw salary.
    ///
    /// # Errors
    ///
    /// * [`InputErrorKind::NotNumeric`] for empty, unparseable, `NaN` or
    ///   infinite input.
    /// * [`InputErrorKind::NotPositive`] for values `<= 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pay_core::{InputErrorKind, RawSalary, SalaryValidator};
    ///
    /// let salary = SalaryValidator::validate(&RawSalary::from(" 52000 ")).unwrap();
    /// assert_eq!(salary.amount(), dec!(52000));
    ///
    /// assert_eq!(
    ///     SalaryValidator::validate(&RawSalary::from("abc")),
    ///     Err(InputErrorKind::NotNumeric)
    /// );
    /// assert_eq!(
    ///     SalaryValidator::validate(&RawSalary::from("-5")),
    ///     Err(InputErrorKind::NotPositive)
    /// );
    /// ```
    pub fn validate(raw: &RawSalary) -> Result<ValidSalary, InputErrorKind> {
        let amount = match raw {
            RawSalary::Text(text) => parse_text(text)?,
            RawSalary::Number(number) => from_f64(*number)?,
            RawSalary::Amount(amount) => *amount,
        };

        if amount <= Decimal::ZERO {
            return Err(InputErrorKind::NotPositive);
        }

        Ok(ValidSalary(amount))
    }
}

fn parse_text(text: &str) -> Result<Decimal, InputErrorKind> {
    let normalized = text.trim().replace(',', "");
    if normalized.is_empty() {
        return Err(InputErrorKind::NotNumeric);
    }

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| InputErrorKind::NotNumeric)
}

fn from_f64(number: f64) -> Result<Decimal, InputErrorKind> {
    if !number.is_finite() {
        return Err(InputErrorKind::NotNumeric);
    }
    Decimal::try_from(number).map_err(|_| InputErrorKind::NotNumeric)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn validate(raw: impl Into<RawSalary>) -> Result<Decimal, InputErrorKind> {
        SalaryValidator::validate(&raw.into()).map(|s| s.amount())
    }

    // =========================================================================
    // not numeric
    // =========================================================================

    #[test]
    fn empty_and_blank_text_is_not_numeric() {
        assert_eq!(validate(""), Err(InputErrorKind::NotNumeric));
        assert_eq!(validate("   "), Err(InputErrorKind::NotNumeric));
    }

    #[test]
    fn words_are_not_numeric() {
        assert_eq!(validate("abc"), Err(InputErrorKind::NotNumeric));
        assert_eq!(validate("52000abc"), Err(InputErrorKind::NotNumeric));
        assert_eq!(validate("$52000"), Err(InputErrorKind::NotNumeric));
    }

    #[test]
    fn nan_and_infinity_text_is_not_numeric() {
        for raw in ["NaN", "nan", "inf", "Infinity", "-Infinity"] {
            assert_eq!(validate(raw), Err(InputErrorKind::NotNumeric), "{raw}");
        }
    }

    #[test]
    fn non_finite_numbers_are_not_numeric() {
        assert_eq!(validate(f64::NAN), Err(InputErrorKind::NotNumeric));
        assert_eq!(validate(f64::INFINITY), Err(InputErrorKind::NotNumeric));
        assert_eq!(validate(f64::NEG_INFINITY), Err(InputErrorKind::NotNumeric));
    }

    // =========================================================================
    // not positive
    // =========================================================================

    #[test]
    fn zero_is_not_positive() {
        assert_eq!(validate("0"), Err(InputErrorKind::NotPositive));
        assert_eq!(validate(0.0), Err(InputErrorKind::NotPositive));
        assert_eq!(validate(Decimal::ZERO), Err(InputErrorKind::NotPositive));
    }

    #[test]
    fn negative_values_are_not_positive() {
        assert_eq!(validate("-5"), Err(InputErrorKind::NotPositive));
        assert_eq!(validate(" -0.01 "), Err(InputErrorKind::NotPositive));
        assert_eq!(validate(-52000.0), Err(InputErrorKind::NotPositive));
    }

    // =========================================================================
    // accepted
    // =========================================================================

    #[test]
    fn accepts_positive_text_with_surrounding_whitespace() {
        assert_eq!(validate("  52000\t"), Ok(dec!(52000)));
        assert_eq!(validate("0.01"), Ok(dec!(0.01)));
    }

    #[test]
    fn accepts_comma_thousands_separator() {
        assert_eq!(validate("52,000.50"), Ok(dec!(52000.50)));
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(validate("5.2e4"), Ok(dec!(52000)));
    }

    #[test]
    fn accepts_positive_numbers_and_amounts() {
        assert_eq!(validate(52000.0), Ok(dec!(52000)));
        assert_eq!(validate(dec!(75000.25)), Ok(dec!(75000.25)));
    }

    #[test]
    fn every_rejection_uses_the_same_user_message() {
        assert_eq!(
            InputErrorKind::NotNumeric.user_message(),
            InputErrorKind::NotPositive.user_message()
        );
        assert_eq!(
            InputErrorKind::NotNumeric.user_message(),
            "Please enter a valid numeric value greater than 0."
        );
    }
}
