//! Shapes a flat calculator result into per-category breakdowns.
//!
//! Each category is looked up under the four `"{Period} {Category}"` keys.
//! A key that is absent, `null`, non-numeric or negative reads as zero, so a
//! partial response still yields a complete, valid breakdown.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::calculator::FlatResult;
use crate::models::{Category, PeriodBreakdown, TaxBreakdown, result_key};

/// The six breakdowns produced from one calculator result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedBreakdown {
    pub gross_income: PeriodBreakdown,
    pub taxes: TaxBreakdown,
    pub total_taxes: PeriodBreakdown,
    pub net_income: PeriodBreakdown,
}

pub struct ResultMapper;

impl ResultMapper {
    /// Reads the breakdown for `category` (e.g. `"Medicare Tax"`) out of
    /// `result`.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use serde_json::json;
    /// use pay_core::{FlatResult, ResultMapper};
    ///
    /// let mut result = FlatResult::new();
    /// result.insert("Weekly Net Income".to_string(), json!(800));
    /// result.insert("Annual Net Income".to_string(), json!(41600));
    ///
    /// let net = ResultMapper::map_category(&result, "Net Income");
    /// assert_eq!(net.weekly, dec!(800));
    /// assert_eq!(net.biweekly, dec!(0));
    /// assert_eq!(net.annual, dec!(41600));
    /// ```
    pub fn map_category(
        result: &FlatResult,
        category: &str,
    ) -> PeriodBreakdown {
        PeriodBreakdown::from_fn(|period| amount(result, &result_key(period, category)))
    }

    /// Maps all six categories.
    pub fn map(result: &FlatResult) -> MappedBreakdown {
        let category = |c: Category| Self::map_category(result, c.label());

        MappedBreakdown {
            gross_income: category(Category::GrossIncome),
            taxes: TaxBreakdown {
                social_security: category(Category::SocialSecurityTax),
                medicare: category(Category::MedicareTax),
                federal: category(Category::FederalTax),
            },
            total_taxes: category(Category::TotalTaxes),
            net_income: category(Category::NetIncome),
        }
    }
}

fn amount(
    result: &FlatResult,
    key: &str,
) -> Decimal {
    let value = match result.get(key) {
        None | Some(Value::Null) => return Decimal::ZERO,
        Some(value) => value,
    };

    match to_decimal(value) {
        Some(amount) if amount >= Decimal::ZERO => amount,
        Some(amount) => {
            warn!(key, %amount, "negative amount in calculator result, using 0");
            Decimal::ZERO
        }
        None => {
            warn!(key, %value, "non-numeric amount in calculator result, using 0");
            Decimal::ZERO
        }
    }
}

/// Accepts JSON numbers and numeric strings.
fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::models::PayPeriod;

    fn result_of(entries: &[(&str, Value)]) -> FlatResult {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn full_result() -> FlatResult {
        let mut result = FlatResult::new();
        for (index, category) in Category::ALL.iter().enumerate() {
            for period in PayPeriod::ALL {
                let amount = (index as u64 + 1) * 100 * u64::from(period.periods_per_year());
                result.insert(category.key(period), json!(amount));
            }
        }
        result
    }

    #[test]
    fn maps_present_labels_and_defaults_absent_ones() {
        let result = result_of(&[
            ("Weekly Net Income", json!(800)),
            ("Annual Net Income", json!(41600)),
        ]);

        let net = ResultMapper::map_category(&result, "Net Income");

        assert_eq!(
            net,
            PeriodBreakdown {
                weekly: dec!(800),
                biweekly: dec!(0),
                monthly: dec!(0),
                annual: dec!(41600),
            }
        );
    }

    #[test]
    fn null_and_non_numeric_values_read_as_zero() {
        let result = result_of(&[
            ("Weekly Federal Tax", Value::Null),
            ("Biweekly Federal Tax", json!("n/a")),
            ("Monthly Federal Tax", json!(true)),
            ("Annual Federal Tax", json!({ "amount": 10 })),
        ]);

        assert!(ResultMapper::map_category(&result, "Federal Tax").is_zero());
    }

    #[test]
    fn negative_values_read_as_zero() {
        let result = result_of(&[("Annual Medicare Tax", json!(-12.5))]);

        assert!(ResultMapper::map_category(&result, "Medicare Tax").is_zero());
    }

    #[test]
    fn numeric_strings_and_fractions_are_accepted() {
        let result = result_of(&[
            ("Weekly Medicare Tax", json!(" 14.50 ")),
            ("Monthly Medicare Tax", json!(62.83)),
        ]);

        let medicare = ResultMapper::map_category(&result, "Medicare Tax");

        assert_eq!(medicare.weekly, dec!(14.50));
        assert_eq!(medicare.monthly, dec!(62.83));
    }

    #[test]
    fn unrelated_labels_are_ignored() {
        let result = result_of(&[("Quarterly Net Income", json!(10400))]);

        assert!(ResultMapper::map_category(&result, "Net Income").is_zero());
    }

    #[test]
    fn map_fills_every_category_from_its_own_keys() {
        let mapped = ResultMapper::map(&full_result());

        assert_eq!(mapped.gross_income.weekly, dec!(5200));
        assert_eq!(mapped.taxes.social_security.annual, dec!(200));
        assert_eq!(mapped.taxes.medicare.monthly, dec!(3600));
        assert_eq!(mapped.taxes.federal.biweekly, dec!(10400));
        assert_eq!(mapped.total_taxes.annual, dec!(500));
        assert_eq!(mapped.net_income.weekly, dec!(31200));
    }

    #[test]
    fn map_of_empty_result_is_all_zero() {
        assert_eq!(ResultMapper::map(&FlatResult::new()), MappedBreakdown::default());
    }

    #[test]
    fn mapped_breakdown_serializes_in_camel_case() {
        let json = serde_json::to_value(MappedBreakdown::default()).unwrap();

        assert!(json.get("grossIncome").is_some());
        assert!(json.get("totalTaxes").is_some());
        assert!(json.get("netIncome").is_some());
        assert!(json["taxes"].get("socialSecurity").is_some());
    }

    #[test]
    fn map_does_not_mutate_result() {
        let result = full_result();
        let before = result.clone();

        let _ = ResultMapper::map(&result);

        assert_eq!(result, before);
    }
}
