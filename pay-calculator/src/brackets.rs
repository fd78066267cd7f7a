//! Bracket-table tax calculator.
//!
//! Computes the annual figures for a gross salary from configured rates and
//! a federal bracket table, then spreads each figure over the pay periods.
//!
//! | Figure              | Rule |
//! |---------------------|------|
//! | Gross income        | the salary |
//! | Social security tax | `min(salary, ss_wage_max) × ss_tax_rate` |
//! | Medicare tax        | `salary × medicare_tax_rate` |
//! | Federal tax         | bracket tax on `max(salary − standard_deduction, 0)` |
//! | Total taxes         | sum of the three taxes |
//! | Net income          | `salary − total taxes` (minimum 0) |
//!
//! Annual figures are rounded half-up to cents; each shorter period is the
//! rounded annual figure divided by the periods per year, rounded to cents.
//! Rounding per period means the shorter periods need not add up exactly.
//! Amounts are emitted as decimal strings so no precision is lost on the
//! way to the mapper.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pay_calculator::{BracketCalculatorConfig, BracketTaxCalculator};
//!
//! let calculator = BracketTaxCalculator::new(BracketCalculatorConfig::default()).unwrap();
//! let figures = calculator.annual_figures(dec!(52000)).unwrap();
//!
//! assert_eq!(figures.social_security_tax, dec!(3224.00));
//! assert_eq!(figures.federal_tax, dec!(4201.50));
//! assert_eq!(figures.net_income, dec!(43820.50));
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use pay_core::calculations::round_half_up;
use pay_core::{
    CalculatorError, Category, FlatResult, PayPeriod, TaxCalculatorClient, TaxDetailsRequest,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors in a bracket calculator configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketConfigError {
    #[error("social security tax rate must be between 0 and 1, got {0}")]
    InvalidSocialSecurityRate(Decimal),

    #[error("medicare tax rate must be between 0 and 1, got {0}")]
    InvalidMedicareRate(Decimal),

    #[error("social security wage maximum must be positive, got {0}")]
    InvalidSsWageMax(Decimal),

    #[error("standard deduction must be non-negative, got {0}")]
    InvalidStandardDeduction(Decimal),

    #[error("no federal tax brackets configured")]
    NoBrackets,

    #[error("bracket starting at {0} has a rate outside 0..=1")]
    InvalidBracketRate(Decimal),

    #[error("bracket starting at {0} is out of order")]
    UnorderedBrackets(Decimal),

    #[error("the first bracket must start at 0, got {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket starting at {0} does not continue from the previous bracket")]
    NonContiguousBrackets(Decimal),

    #[error("only the last bracket may be unbounded (bracket starting at {0})")]
    UnboundedBracketNotLast(Decimal),
}

impl From<BracketConfigError> for CalculatorError {
    fn from(err: BracketConfigError) -> Self {
        CalculatorError::Configuration(err.to_string())
    }
}

/// One row of a federal rate schedule.
///
/// Taxable income in `(min_income, max_income]` is taxed as
/// `base_tax + (income − min_income) × rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

/// Checks that `brackets` is non-empty, starts at 0, has no gaps, and is
/// unbounded only at the end.
pub fn validate_brackets(brackets: &[FederalBracket]) -> Result<(), BracketConfigError> {
    let Some(first) = brackets.first() else {
        return Err(BracketConfigError::NoBrackets);
    };
    if !first.min_income.is_zero() {
        return Err(BracketConfigError::FirstBracketNotAtZero(first.min_income));
    }

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(BracketConfigError::InvalidBracketRate(bracket.min_income));
        }
        if let Some(max) = bracket.max_income {
            if max <= bracket.min_income {
                return Err(BracketConfigError::UnorderedBrackets(bracket.min_income));
            }
        } else if index + 1 != brackets.len() {
            return Err(BracketConfigError::UnboundedBracketNotLast(bracket.min_income));
        }
        if index > 0 && brackets[index - 1].max_income != Some(bracket.min_income) {
            return Err(BracketConfigError::NonContiguousBrackets(bracket.min_income));
        }
    }

    Ok(())
}

/// Rates, limits and brackets for [`BracketTaxCalculator`].
///
/// Every field has a default (2025 figures for a single filer), so a
/// configuration file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketCalculatorConfig {
    /// Employee social security rate, e.g. 6.2%.
    pub ss_tax_rate: Decimal,

    /// Maximum wages subject to social security tax.
    pub ss_wage_max: Decimal,

    /// Employee medicare rate, e.g. 1.45%.
    pub medicare_tax_rate: Decimal,

    /// Subtracted from the salary before the federal brackets apply.
    pub standard_deduction: Decimal,

    /// Federal schedule, ascending by `min_income`.
    pub brackets: Vec<FederalBracket>,

    /// CSV file that replaces `brackets` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brackets_file: Option<PathBuf>,
}

impl Default for BracketCalculatorConfig {
    fn default() -> Self {
        Self {
            ss_tax_rate: Decimal::new(62, 3),
            ss_wage_max: Decimal::new(176_100, 0),
            medicare_tax_rate: Decimal::new(145, 4),
            standard_deduction: Decimal::new(15_000, 0),
            brackets: default_brackets(),
            brackets_file: None,
        }
    }
}

fn bracket(
    min_income: i64,
    max_income: Option<i64>,
    base_tax_cents: i64,
    rate_percent: i64,
) -> FederalBracket {
    FederalBracket {
        min_income: Decimal::from(min_income),
        max_income: max_income.map(Decimal::from),
        base_tax: Decimal::new(base_tax_cents, 2),
        rate: Decimal::new(rate_percent, 2),
    }
}

fn default_brackets() -> Vec<FederalBracket> {
    vec![
        bracket(0, Some(11_925), 0, 10),
        bracket(11_925, Some(48_475), 119_250, 12),
        bracket(48_475, Some(103_350), 557_850, 22),
        bracket(103_350, Some(197_300), 1_765_100, 24),
        bracket(197_300, Some(250_525), 4_019_900, 32),
        bracket(250_525, Some(626_350), 5_723_100, 35),
        bracket(626_350, None, 18_876_975, 37),
    ]
}

impl BracketCalculatorConfig {
    pub fn validate(&self) -> Result<(), BracketConfigError> {
        let unit = Decimal::ZERO..=Decimal::ONE;

        if !unit.contains(&self.ss_tax_rate) {
            return Err(BracketConfigError::InvalidSocialSecurityRate(self.ss_tax_rate));
        }
        if !unit.contains(&self.medicare_tax_rate) {
            return Err(BracketConfigError::InvalidMedicareRate(self.medicare_tax_rate));
        }
        if self.ss_wage_max <= Decimal::ZERO {
            return Err(BracketConfigError::InvalidSsWageMax(self.ss_wage_max));
        }
        if self.standard_deduction < Decimal::ZERO {
            return Err(BracketConfigError::InvalidStandardDeduction(self.standard_deduction));
        }
        validate_brackets(&self.brackets)
    }
}

/// Annual amounts for one salary, before they are spread over periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnualFigures {
    pub gross_income: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_tax: Decimal,
    pub federal_tax: Decimal,
    pub total_taxes: Decimal,
    pub net_income: Decimal,
}

impl AnnualFigures {
    pub fn get(
        &self,
        category: Category,
    ) -> Decimal {
        match category {
            Category::GrossIncome => self.gross_income,
            Category::SocialSecurityTax => self.social_security_tax,
            Category::MedicareTax => self.medicare_tax,
            Category::FederalTax => self.federal_tax,
            Category::TotalTaxes => self.total_taxes,
            Category::NetIncome => self.net_income,
        }
    }

    /// All 24 `"{Period} {Category}"` entries.
    pub fn to_flat_result(&self) -> FlatResult {
        let mut result = FlatResult::new();
        for category in Category::ALL {
            let annual = self.get(category);
            for period in PayPeriod::ALL {
                let amount = round_half_up(annual / Decimal::from(period.periods_per_year()));
                result.insert(category.key(period), Value::String(amount.to_string()));
            }
        }
        result
    }
}

/// [`TaxCalculatorClient`] backed by a [`BracketCalculatorConfig`].
#[derive(Debug, Clone)]
pub struct BracketTaxCalculator {
    config: BracketCalculatorConfig,
}

impl BracketTaxCalculator {
    /// # Errors
    /// Returns [`BracketConfigError`] if the configuration is invalid.
    pub fn new(config: BracketCalculatorConfig) -> Result<Self, BracketConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Computes the annual figures for `salary`.
    ///
    /// # Errors
    /// [`CalculatorError::Computation`] for a non-positive salary, when no
    /// bracket covers the taxable income, or when a figure exceeds the
    /// `Decimal` range.
    pub fn annual_figures(
        &self,
        salary: Decimal,
    ) -> Result<AnnualFigures, CalculatorError> {
        if salary <= Decimal::ZERO {
            return Err(CalculatorError::Computation(format!(
                "gross salary must be positive, got {salary}"
            )));
        }
        let overflow = |figure: &str| {
            CalculatorError::Computation(format!("{figure} overflows for salary {salary}"))
        };

        let social_security_tax = salary
            .min(self.config.ss_wage_max)
            .checked_mul(self.config.ss_tax_rate)
            .map(round_half_up)
            .ok_or_else(|| overflow("social security tax"))?;
        let medicare_tax = salary
            .checked_mul(self.config.medicare_tax_rate)
            .map(round_half_up)
            .ok_or_else(|| overflow("medicare tax"))?;
        let taxable_income = salary
            .checked_sub(self.config.standard_deduction)
            .ok_or_else(|| overflow("taxable income"))?
            .max(Decimal::ZERO);
        let federal_tax = self
            .federal_tax(taxable_income)?
            .ok_or_else(|| overflow("federal tax"))?;
        let total_taxes = social_security_tax
            .checked_add(medicare_tax)
            .and_then(|sum| sum.checked_add(federal_tax))
            .ok_or_else(|| overflow("total taxes"))?;
        let net_income = salary
            .checked_sub(total_taxes)
            .ok_or_else(|| overflow("net income"))?;

        Ok(AnnualFigures {
            gross_income: round_half_up(salary),
            social_security_tax,
            medicare_tax,
            federal_tax,
            total_taxes,
            net_income: round_half_up(net_income).max(Decimal::ZERO),
        })
    }

    /// Bracket tax on `taxable_income`; `Ok(None)` on overflow.
    fn federal_tax(
        &self,
        taxable_income: Decimal,
    ) -> Result<Option<Decimal>, CalculatorError> {
        if taxable_income <= Decimal::ZERO {
            return Ok(Some(Decimal::ZERO));
        }

        let bracket = self
            .config
            .brackets
            .iter()
            .find(|b| {
                taxable_income > b.min_income
                    && b.max_income.is_none_or(|max| taxable_income <= max)
            })
            .ok_or_else(|| {
                CalculatorError::Computation(format!(
                    "no tax bracket found for taxable income {taxable_income}"
                ))
            })?;

        Ok(taxable_income
            .checked_sub(bracket.min_income)
            .and_then(|marginal| marginal.checked_mul(bracket.rate))
            .and_then(|tax| tax.checked_add(bracket.base_tax))
            .map(round_half_up))
    }
}

#[async_trait]
impl TaxCalculatorClient for BracketTaxCalculator {
    fn name(&self) -> &str {
        "brackets"
    }

    async fn compute_tax_details(
        &self,
        request: TaxDetailsRequest,
    ) -> Result<FlatResult, CalculatorError> {
        let figures = self.annual_figures(request.gross_salary)?;
        debug!(
            salary = %request.gross_salary,
            total_taxes = %figures.total_taxes,
            net_income = %figures.net_income,
            "computed annual figures"
        );
        Ok(figures.to_flat_result())
    }
}
