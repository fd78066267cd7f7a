use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::client::{CalculatorError, TaxCalculatorClient};

/// Backend-agnostic calculator configuration.
///
/// `backend` must match the [`CalculatorFactory::backend_name`] of a
/// registered factory. `settings` is passed through to that factory
/// unchanged; its meaning is entirely backend-specific.
///
/// | backend    | settings                                             |
/// |------------|------------------------------------------------------|
/// | `brackets` | rates, wage base, standard deduction, bracket table  |
/// | `fixture`  | `fixture_file` path of a recorded JSON response      |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"brackets"`).
    pub backend: String,
    /// Opaque key/value settings forwarded to the factory's `create` method.
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl CalculatorConfig {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            settings: serde_json::Map::new(),
        }
    }

    /// Decodes `settings` into a backend's own settings type.
    ///
    /// # Errors
    /// [`CalculatorError::Configuration`] when the settings do not match `T`.
    pub fn settings_as<T: DeserializeOwned>(&self) -> Result<T, CalculatorError> {
        serde_json::from_value(serde_json::Value::Object(self.settings.clone())).map_err(|e| {
            CalculatorError::Configuration(format!(
                "invalid settings for backend '{}': {e}",
                self.backend
            ))
        })
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::new("brackets")
    }
}

/// One implementation per calculator backend, registered with a
/// [`CalculatorRegistry`] at startup.
#[async_trait]
pub trait CalculatorFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use calculator. Implementations may load rate tables
    /// or recorded responses here.
    async fn create(
        &self,
        config: &CalculatorConfig,
    ) -> Result<Box<dyn TaxCalculatorClient>, CalculatorError>;
}

/// Registry of [`CalculatorFactory`] instances, keyed by backend name.
pub struct CalculatorRegistry {
    factories: HashMap<&'static str, Box<dyn CalculatorFactory>>,
}

impl CalculatorRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any factory with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn CalculatorFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`CalculatorError::Configuration`] when no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &CalculatorConfig,
    ) -> Result<Box<dyn TaxCalculatorClient>, CalculatorError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                CalculatorError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use serde::Deserialize;

    use super::*;
    use crate::calculator::{FlatResult, TaxDetailsRequest};

    // ── stub calculator ──────────────────────────────────────────────────
    struct StubCalculator;

    #[async_trait]
    impl TaxCalculatorClient for StubCalculator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn compute_tax_details(
            &self,
            _request: TaxDetailsRequest,
        ) -> Result<FlatResult, CalculatorError> {
            Ok(FlatResult::new())
        }
    }

    // ── stub factory ─────────────────────────────────────────────────────
    /// Flips an `AtomicBool` when `create` runs so tests can prove dispatch.
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CalculatorFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            _config: &CalculatorConfig,
        ) -> Result<Box<dyn TaxCalculatorClient>, CalculatorError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(StubCalculator))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl CalculatorFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn create(
            &self,
            _config: &CalculatorConfig,
        ) -> Result<Box<dyn TaxCalculatorClient>, CalculatorError> {
            Err(CalculatorError::Unavailable("intentional failure".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn CalculatorFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    // ── CalculatorConfig ─────────────────────────────────────────────────
    #[test]
    fn default_config_uses_bracket_backend() {
        let config = CalculatorConfig::default();

        assert_eq!(config.backend, "brackets");
        assert!(config.settings.is_empty());
    }

    #[derive(Debug, Deserialize)]
    struct ExampleSettings {
        path: String,
    }

    #[test]
    fn settings_as_decodes_backend_settings() {
        let mut config = CalculatorConfig::new("fixture");
        config
            .settings
            .insert("path".to_string(), serde_json::json!("response.json"));

        let settings: ExampleSettings = config.settings_as().unwrap();

        assert_eq!(settings.path, "response.json");
    }

    #[test]
    fn settings_as_reports_configuration_error() {
        let config = CalculatorConfig::new("fixture");

        let result = config.settings_as::<ExampleSettings>();

        match result {
            Err(CalculatorError::Configuration(msg)) => assert!(msg.contains("fixture")),
            other => panic!("expected Configuration error, got {other:#?}"),
        }
    }

    // ── registration ─────────────────────────────────────────────────────
    #[test]
    fn new_registry_has_no_backends() {
        assert!(CalculatorRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut reg = CalculatorRegistry::new();
        let (f1, _) = stub_factory("fixture");
        let (f2, _) = stub_factory("brackets");
        reg.register(f1);
        reg.register(f2);

        assert_eq!(reg.available_backends(), vec!["brackets", "fixture"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = CalculatorRegistry::new();
        let (old, _) = stub_factory("brackets");
        let (new, _) = stub_factory("brackets");
        reg.register(old);
        reg.register(new);

        assert_eq!(reg.available_backends(), vec!["brackets"]);
    }

    // ── dispatch ─────────────────────────────────────────────────────────
    #[tokio::test]
    async fn create_calls_matching_factory_only() {
        let mut reg = CalculatorRegistry::new();
        let (brackets, brackets_called) = stub_factory("brackets");
        let (fixture, fixture_called) = stub_factory("fixture");
        reg.register(brackets);
        reg.register(fixture);

        let calculator = reg.create(&CalculatorConfig::new("fixture")).await;

        assert!(calculator.is_ok());
        assert!(fixture_called.load(Ordering::SeqCst));
        assert!(!brackets_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_names_requested_and_available_backends() {
        let mut reg = CalculatorRegistry::new();
        let (f, _) = stub_factory("brackets");
        reg.register(f);

        match reg.create(&CalculatorConfig::new("remote")).await {
            Err(CalculatorError::Configuration(msg)) => {
                assert!(msg.contains("remote"), "error should name the requested backend");
                assert!(msg.contains("brackets"), "error should list available backends");
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a calculator"),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = CalculatorRegistry::new();
        reg.register(Box::new(FailingFactory));

        let result = reg.create(&CalculatorConfig::new("failing")).await;

        assert!(matches!(
            result,
            Err(CalculatorError::Unavailable(msg)) if msg == "intentional failure"
        ));
    }
}
