use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, PeriodBreakdown};

/// The three itemized tax categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub social_security: PeriodBreakdown,
    pub medicare: PeriodBreakdown,
    pub federal: PeriodBreakdown,
}

impl TaxBreakdown {
    pub fn is_zero(&self) -> bool {
        self.social_security.is_zero() && self.medicare.is_zero() && self.federal.is_zero()
    }
}

/// Where a [`PayCalculationSession`](crate::PayCalculationSession) is in its
/// lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing computed yet, or reset after a degenerate calculator response.
    #[default]
    Idle,
    /// A calculator call for the latest submission is in flight.
    Computing,
    /// Holds the breakdown of the latest successful calculation.
    Ready,
    /// Input was rejected or the calculator failed; breakdowns are zero.
    Failed,
}

/// Everything a host needs to render the take-home pay breakdown.
///
/// Whenever `input_error` or `error_message` is non-empty, every breakdown
/// is zero. The session replaces this value wholesale on each transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayCalculationState {
    pub phase: SessionPhase,
    pub salary: Decimal,
    pub gross_income: PeriodBreakdown,
    pub taxes: TaxBreakdown,
    pub total_taxes: PeriodBreakdown,
    pub net_income: PeriodBreakdown,
    pub input_error: String,
    pub error_message: String,
}

impl PayCalculationState {
    /// The all-zero `Idle` state a session starts in.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_error(&self) -> bool {
        !self.input_error.is_empty() || !self.error_message.is_empty()
    }

    pub fn breakdowns_are_zero(&self) -> bool {
        self.gross_income.is_zero()
            && self.taxes.is_zero()
            && self.total_taxes.is_zero()
            && self.net_income.is_zero()
    }

    /// The breakdown shown for `category`.
    pub fn breakdown(
        &self,
        category: Category,
    ) -> &PeriodBreakdown {
        match category {
            Category::GrossIncome => &self.gross_income,
            Category::SocialSecurityTax => &self.taxes.social_security,
            Category::MedicareTax => &self.taxes.medicare,
            Category::FederalTax => &self.taxes.federal,
            Category::TotalTaxes => &self.total_taxes,
            Category::NetIncome => &self.net_income,
        }
    }

    /// Zeroed state that only echoes `salary`.
    pub(crate) fn zeroed(
        phase: SessionPhase,
        salary: Decimal,
    ) -> Self {
        Self {
            phase,
            salary,
            ..Self::default()
        }
    }

    /// In-flight state: keeps the last breakdowns on screen, clears errors.
    pub(crate) fn computing(
        previous: &Self,
        salary: Decimal,
    ) -> Self {
        Self {
            phase: SessionPhase::Computing,
            salary,
            input_error: String::new(),
            error_message: String::new(),
            ..previous.clone()
        }
    }

    pub(crate) fn input_failed(
        salary: Decimal,
        message: &str,
    ) -> Self {
        Self {
            input_error: message.to_string(),
            ..Self::zeroed(SessionPhase::Failed, salary)
        }
    }

    pub(crate) fn failed(
        salary: Decimal,
        message: &str,
    ) -> Self {
        Self {
            error_message: message.to_string(),
            ..Self::zeroed(SessionPhase::Failed, salary)
        }
    }
}
