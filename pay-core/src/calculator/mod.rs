pub mod client;
pub mod factory;

pub use client::{CalculatorError, FlatResult, TaxCalculatorClient, TaxDetailsRequest};
pub use factory::{CalculatorConfig, CalculatorFactory, CalculatorRegistry};
