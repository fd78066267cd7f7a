//! Numeric helpers shared by the session, the calculator backends and the
//! presentation layer.

pub mod common;

pub use common::{round_half_up, round_to};
