//! Take-home pay breakdown core.
//!
//! Turns a raw annual salary into per-period gross income, taxes and net
//! income: [`SalaryValidator`] checks the input, a [`TaxCalculatorClient`]
//! computes the figures, [`ResultMapper`] shapes them, and
//! [`PayCalculationSession`] ties the steps together and publishes the
//! resulting [`PayCalculationState`].

pub mod calculations;
pub mod calculator;
pub mod mapper;
pub mod models;
pub mod session;
pub mod validation;

pub use calculator::{
    CalculatorConfig, CalculatorError, CalculatorFactory, CalculatorRegistry, FlatResult,
    TaxCalculatorClient, TaxDetailsRequest,
};
pub use mapper::{MappedBreakdown, ResultMapper};
pub use models::*;
pub use session::{
    CALCULATOR_ERROR_MESSAGE, PayCalculationSession, RECORD_ERROR_MESSAGE, SubmitOutcome,
};
pub use validation::{
    INVALID_SALARY_MESSAGE, InputErrorKind, RawSalary, SalaryValidator, ValidSalary,
};
