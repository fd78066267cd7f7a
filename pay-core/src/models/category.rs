use std::fmt;

use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// Amount categories reported by a tax calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    GrossIncome,
    SocialSecurityTax,
    MedicareTax,
    FederalTax,
    TotalTaxes,
    NetIncome,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 6] = [
        Category::GrossIncome,
        Category::SocialSecurityTax,
        Category::MedicareTax,
        Category::FederalTax,
        Category::TotalTaxes,
        Category::NetIncome,
    ];

    /// Category suffix used in calculator result keys.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GrossIncome => "Gross Income",
            Self::SocialSecurityTax => "Social Security Tax",
            Self::MedicareTax => "Medicare Tax",
            Self::FederalTax => "Federal Tax",
            Self::TotalTaxes => "Total Taxes",
            Self::NetIncome => "Net Income",
        }
    }

    /// Full result key for this category in `period`, e.g. `"Biweekly Total Taxes"`.
    pub fn key(
        &self,
        period: PayPeriod,
    ) -> String {
        result_key(period, self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Formats the `"{Period} {category}"` key used by calculator results.
pub fn result_key(
    period: PayPeriod,
    category: &str,
) -> String {
    format!("{period} {category}")
}
