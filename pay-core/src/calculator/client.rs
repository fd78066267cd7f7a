use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat calculator response: result key (`"Weekly Net Income"`) to amount.
///
/// Values are kept as raw JSON because the calculator is a black box; the
/// [`ResultMapper`](crate::ResultMapper) decides what counts as a number.
pub type FlatResult = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    /// The calculator could not be reached or failed server-side.
    #[error("Calculator unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid calculator response: {0}")]
    InvalidResponse(String),

    #[error("Calculator configuration error: {0}")]
    Configuration(String),

    #[error("Calculation failed: {0}")]
    Computation(String),
}

/// What a calculator is asked to compute. Serializes as
/// `{"grossSalary": ...}` for transports that send it over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDetailsRequest {
    pub gross_salary: Decimal,
}

impl TaxDetailsRequest {
    pub fn new(gross_salary: Decimal) -> Self {
        Self { gross_salary }
    }
}

/// Computes per-period tax details for a gross annual salary.
///
/// Implementations may return any subset of the 24
/// `"{Period} {Category}"` keys; missing keys are read as zero.
#[async_trait]
pub trait TaxCalculatorClient: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    async fn compute_tax_details(
        &self,
        request: TaxDetailsRequest,
    ) -> Result<FlatResult, CalculatorError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn request_serializes_gross_salary_in_camel_case() {
        let request = TaxDetailsRequest::new(dec!(52000));

        let json = serde_json::to_value(request).unwrap();

        assert_eq!(json, serde_json::json!({ "grossSalary": "52000" }));
    }

    #[test]
    fn errors_display_their_detail() {
        let error = CalculatorError::Unavailable("connection refused".to_string());

        assert_eq!(
            error.to_string(),
            "Calculator unavailable: connection refused"
        );
    }
}
