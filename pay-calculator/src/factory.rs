use std::path::PathBuf;

use async_trait::async_trait;
use pay_core::{
    CalculatorConfig, CalculatorError, CalculatorFactory, CalculatorRegistry, TaxCalculatorClient,
};
use serde::Deserialize;
use tracing::info;

use crate::brackets::{BracketCalculatorConfig, BracketTaxCalculator};
use crate::fixture::FixtureTaxCalculator;
use crate::loader::BracketLoader;

pub const BRACKETS_BACKEND: &str = "brackets";
pub const FIXTURE_BACKEND: &str = "fixture";

/// Builds a [`BracketTaxCalculator`] from [`BracketCalculatorConfig`] settings.
pub struct BracketCalculatorFactory;

#[async_trait]
impl CalculatorFactory for BracketCalculatorFactory {
    fn backend_name(&self) -> &'static str {
        BRACKETS_BACKEND
    }

    async fn create(
        &self,
        config: &CalculatorConfig,
    ) -> Result<Box<dyn TaxCalculatorClient>, CalculatorError> {
        let mut settings: BracketCalculatorConfig = config.settings_as()?;

        if let Some(path) = &settings.brackets_file {
            settings.brackets = BracketLoader::load_from_path(path)
                .map_err(|e| CalculatorError::Configuration(e.to_string()))?;
            info!(
                path = %path.display(),
                count = settings.brackets.len(),
                "loaded federal brackets"
            );
        }

        Ok(Box::new(BracketTaxCalculator::new(settings)?))
    }
}

#[derive(Debug, Deserialize)]
struct FixtureSettings {
    fixture_file: PathBuf,
}

/// Builds a [`FixtureTaxCalculator`] from a `fixture_file` setting.
pub struct FixtureCalculatorFactory;

#[async_trait]
impl CalculatorFactory for FixtureCalculatorFactory {
    fn backend_name(&self) -> &'static str {
        FIXTURE_BACKEND
    }

    async fn create(
        &self,
        config: &CalculatorConfig,
    ) -> Result<Box<dyn TaxCalculatorClient>, CalculatorError> {
        let settings: FixtureSettings = config.settings_as()?;
        let calculator = FixtureTaxCalculator::from_path(&settings.fixture_file).await?;
        info!(
            path = %settings.fixture_file.display(),
            labels = calculator.result().len(),
            "loaded recorded calculator response"
        );
        Ok(Box::new(calculator))
    }
}

/// Registry with every backend in this crate registered.
pub fn default_registry() -> CalculatorRegistry {
    let mut registry = CalculatorRegistry::new();
    registry.register(Box::new(BracketCalculatorFactory));
    registry.register(Box::new(FixtureCalculatorFactory));
    registry
}
