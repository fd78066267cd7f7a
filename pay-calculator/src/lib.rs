//! Tax calculator backends for `pay-core`.
//!
//! * `brackets` computes every figure locally from configured rates and a
//!   federal bracket table ([`BracketTaxCalculator`]).
//! * `fixture` replays a recorded calculator response
//!   ([`FixtureTaxCalculator`]).
//!
//! Both are reachable through [`default_registry`].

pub mod brackets;
pub mod factory;
pub mod fixture;
pub mod loader;

pub use brackets::{
    AnnualFigures, BracketCalculatorConfig, BracketConfigError, BracketTaxCalculator,
    FederalBracket, validate_brackets,
};
pub use factory::{
    BRACKETS_BACKEND, BracketCalculatorFactory, FIXTURE_BACKEND, FixtureCalculatorFactory,
    default_registry,
};
pub use fixture::FixtureTaxCalculator;
pub use loader::{BracketLoader, BracketLoaderError, BracketRecord};
