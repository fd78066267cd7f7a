pub mod app;
pub mod config;
pub mod logging;
pub mod render;

pub use app::{App, OutputFormat};
pub use config::{ConfigError, DisplayConfig, LoggingConfig, Overrides, Settings};
