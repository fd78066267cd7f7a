mod category;
mod period;
mod state;

pub use category::{Category, result_key};
pub use period::{PayPeriod, PeriodBreakdown};
pub use state::{PayCalculationState, SessionPhase, TaxBreakdown};
