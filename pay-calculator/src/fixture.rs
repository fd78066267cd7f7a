//! Recorded-response calculator.
//!
//! Replays a flat result captured from a real calculator, whatever salary
//! is submitted. Useful for demos and for checking how a host renders
//! partial or malformed responses.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use pay_core::{CalculatorError, FlatResult, TaxCalculatorClient, TaxDetailsRequest};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FixtureTaxCalculator {
    result: FlatResult,
}

impl FixtureTaxCalculator {
    pub fn new(result: FlatResult) -> Self {
        Self { result }
    }

    /// Reads a JSON object of `"{Period} {Category}": amount` entries.
    /// A top-level `null` is read as an empty result.
    ///
    /// # Errors
    /// [`CalculatorError::InvalidResponse`] when the JSON is malformed or is
    /// not an object.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CalculatorError> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| CalculatorError::InvalidResponse(e.to_string()))?;

        match value {
            Value::Object(entries) => Ok(Self::new(entries.into_iter().collect())),
            Value::Null => Ok(Self::default()),
            other => Err(CalculatorError::InvalidResponse(format!(
                "expected a JSON object of labeled amounts, got {other}"
            ))),
        }
    }

    /// Loads a recorded response from `path`.
    pub async fn from_path(path: &Path) -> Result<Self, CalculatorError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            CalculatorError::Configuration(format!(
                "cannot read fixture '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(bytes.as_slice())
    }

    pub fn result(&self) -> &FlatResult {
        &self.result
    }
}

#[async_trait]
impl TaxCalculatorClient for FixtureTaxCalculator {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn compute_tax_details(
        &self,
        request: TaxDetailsRequest,
    ) -> Result<FlatResult, CalculatorError> {
        debug!(salary = %request.gross_salary, labels = self.result.len(), "replaying fixture");
        Ok(self.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn replays_the_same_result_for_any_salary() {
        let calculator =
            FixtureTaxCalculator::from_reader(r#"{"Weekly Net Income": 800}"#.as_bytes()).unwrap();

        let low = calculator.compute_tax_details(TaxDetailsRequest::new(dec!(1))).await.unwrap();
        let high = calculator.compute_tax_details(TaxDetailsRequest::new(dec!(1000000))).await.unwrap();

        assert_eq!(low, high);
        assert_eq!(low["Weekly Net Income"], json!(800));
    }

    #[test]
    fn null_document_is_an_empty_result() {
        let calculator = FixtureTaxCalculator::from_reader("null".as_bytes()).unwrap();

        assert!(calculator.result().is_empty());
    }

    #[test]
    fn non_object_document_is_rejected() {
        let result = FixtureTaxCalculator::from_reader("[1, 2, 3]".as_bytes());

        assert!(matches!(result, Err(CalculatorError::InvalidResponse(_))));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = FixtureTaxCalculator::from_reader("{ not json".as_bytes());

        assert!(matches!(result, Err(CalculatorError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn missing_file_is_a_configuration_error() {
        let result = FixtureTaxCalculator::from_path(Path::new("/nonexistent/response.json")).await;

        assert!(matches!(result, Err(CalculatorError::Configuration(msg)) if msg.contains("response.json")));
    }
}
