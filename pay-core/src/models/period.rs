use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::round_to;

/// One of the four granularities an amount is broken into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayPeriod {
    Weekly,
    Biweekly,
    Monthly,
    Annual,
}

impl PayPeriod {
    /// Every period, shortest first.
    pub const ALL: [PayPeriod; 4] = [
        PayPeriod::Weekly,
        PayPeriod::Biweekly,
        PayPeriod::Monthly,
        PayPeriod::Annual,
    ];

    /// Label prefix used by calculator result keys (`"Weekly Net Income"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Biweekly => "Biweekly",
            Self::Monthly => "Monthly",
            Self::Annual => "Annual",
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::Biweekly => 26,
            Self::Monthly => 12,
            Self::Annual => 1,
        }
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An amount spread across the four pay periods.
///
/// All four fields are non-negative; [`PeriodBreakdown::ZERO`] is the
/// default and reset value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBreakdown {
    pub weekly: Decimal,
    pub biweekly: Decimal,
    pub monthly: Decimal,
    pub annual: Decimal,
}

impl PeriodBreakdown {
    pub const ZERO: PeriodBreakdown = PeriodBreakdown {
        weekly: Decimal::ZERO,
        biweekly: Decimal::ZERO,
        monthly: Decimal::ZERO,
        annual: Decimal::ZERO,
    };

    /// Builds a breakdown by asking `amount` for each period in turn.
    pub fn from_fn(mut amount: impl FnMut(PayPeriod) -> Decimal) -> Self {
        Self {
            weekly: amount(PayPeriod::Weekly),
            biweekly: amount(PayPeriod::Biweekly),
            monthly: amount(PayPeriod::Monthly),
            annual: amount(PayPeriod::Annual),
        }
    }

    /// Derives the shorter periods from an annual amount
    /// (`annual / 52`, `annual / 26`, `annual / 12`).
    ///
    /// Negative input is clamped to zero.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pay_core::PeriodBreakdown;
    ///
    /// let gross = PeriodBreakdown::from_annual(dec!(52000));
    /// assert_eq!(gross.weekly, dec!(1000));
    /// assert_eq!(gross.biweekly, dec!(2000));
    /// ```
    pub fn from_annual(annual: Decimal) -> Self {
        let annual = annual.max(Decimal::ZERO);
        Self::from_fn(|period| annual / Decimal::from(period.periods_per_year()))
    }

    pub fn get(
        &self,
        period: PayPeriod,
    ) -> Decimal {
        match period {
            PayPeriod::Weekly => self.weekly,
            PayPeriod::Biweekly => self.biweekly,
            PayPeriod::Monthly => self.monthly,
            PayPeriod::Annual => self.annual,
        }
    }

    pub fn is_zero(&self) -> bool {
        PayPeriod::ALL.iter().all(|p| self.get(*p).is_zero())
    }

    /// Copy of this breakdown rounded for display.
    pub fn rounded(
        &self,
        decimal_places: u32,
    ) -> Self {
        Self::from_fn(|period| round_to(self.get(period), decimal_places))
    }
}
