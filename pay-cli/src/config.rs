use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use pay_core::CalculatorConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_BACKEND: &str = "brackets";

/// Prefix of environment variables layered over the config file. Nested keys
/// use a double underscore: `TAKE_HOME_PAY_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "TAKE_HOME_PAY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file '{0}' not found")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("Invalid [calculator] section: {0}")]
    Calculator(String),
}

/// Settings layered from defaults, the optional TOML file, `TAKE_HOME_PAY_*`
/// environment variables and command-line flags, later layers winning.
///
/// ```toml
/// [display]
/// decimal_places = 2
///
/// [logging]
/// level = "info"
/// file = "pay.log"
///
/// [calculator]
/// backend = "brackets"
/// standard_deduction = 15000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    /// `backend` picks the calculator; every other key is handed to that
    /// backend's factory untouched.
    pub calculator: toml::Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub decimal_places: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { decimal_places: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Command-line values, the topmost configuration layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub decimal_places: Option<u32>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Overrides {
    fn merge_into(
        &self,
        figment: Figment,
    ) -> Figment {
        let mut figment = figment;
        if let Some(backend) = &self.backend {
            figment = figment.merge(Serialized::default("calculator.backend", backend));
        }
        if let Some(places) = self.decimal_places {
            figment = figment.merge(Serialized::default("display.decimal_places", places));
        }
        if let Some(level) = &self.log_level {
            figment = figment.merge(Serialized::default("logging.level", level));
        }
        if let Some(file) = &self.log_file {
            figment = figment.merge(Serialized::default("logging.file", file));
        }
        figment
    }
}

impl Settings {
    /// Resolves every layer. `path`, when given, must exist.
    pub fn load(
        path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file_exact(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        overrides
            .merge_into(figment)
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Defaults overlaid with `text` only; no environment or flags.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::string(text))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Splits the `[calculator]` table into a backend name and its settings.
    pub fn calculator_config(&self) -> Result<CalculatorConfig, ConfigError> {
        let mut table = self.calculator.clone();
        let backend = match table.remove("backend") {
            None => DEFAULT_BACKEND.to_string(),
            Some(toml::Value::String(name)) => name,
            Some(other) => {
                return Err(ConfigError::Calculator(format!(
                    "backend must be a string, found {}",
                    other.type_str()
                )));
            }
        };

        let settings = match serde_json::to_value(&table) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => serde_json::Map::new(),
            Err(e) => return Err(ConfigError::Calculator(e.to_string())),
        };

        let mut config = CalculatorConfig::new(backend);
        config.settings = settings;
        Ok(config)
    }
}
