use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use pay_calculator::default_registry;
use pay_core::{PayCalculationSession, PayCalculationState, SubmitOutcome, TaxCalculatorClient};
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::config::{DisplayConfig, Settings};
use crate::render::{render_json, render_table};

const QUIT_COMMANDS: [&str; 3] = ["q", "quit", "exit"];
const PROMPT: &str = "salary> ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// A stored record holding the salary to start from.
#[derive(Debug, Deserialize)]
struct SalaryRecord {
    salary: Option<Decimal>,
}

/// Command-line host for a [`PayCalculationSession`].
pub struct App {
    session: PayCalculationSession,
    display: DisplayConfig,
    format: OutputFormat,
}

impl App {
    /// Builds the calculator named in `settings` and wraps it in a session.
    pub async fn build(
        settings: &Settings,
        format: OutputFormat,
    ) -> Result<Self> {
        let config = settings.calculator_config()?;
        debug!(backend = %config.backend, "building tax calculator");

        let calculator = default_registry()
            .create(&config)
            .await
            .with_context(|| format!("failed to build '{}' calculator", config.backend))?;
        info!(calculator = calculator.name(), "calculator ready");

        Ok(Self::with_calculator(
            Arc::from(calculator),
            settings.display.clone(),
            format,
        ))
    }

    pub fn with_calculator(
        calculator: Arc<dyn TaxCalculatorClient>,
        display: DisplayConfig,
        format: OutputFormat,
    ) -> Self {
        Self {
            session: PayCalculationSession::new(calculator),
            display,
            format,
        }
    }

    pub fn state(&self) -> PayCalculationState {
        self.session.state()
    }

    /// Renders the current state in the configured format.
    pub fn render(&self) -> Result<String> {
        let state = self.session.state();
        match self.format {
            OutputFormat::Table => Ok(render_table(&state, self.display.decimal_places)),
            OutputFormat::Json => render_json(&state, self.display.decimal_places)
                .context("failed to serialize pay breakdown"),
        }
    }

    /// Computes a single salary and renders the result.
    pub async fn run_once(
        &self,
        salary: &str,
    ) -> Result<String> {
        let outcome = self.session.on_salary_input_changed(salary).await;
        debug!(?outcome, "one-shot calculation finished");
        self.render()
    }

    /// Seeds the session from a JSON record such as `{"salary": 52000}`.
    ///
    /// A record that cannot be read or parsed is reported through the
    /// session rather than as an error.
    pub async fn load_record(
        &self,
        path: &Path,
    ) -> Result<String> {
        match read_record(path).await {
            Ok(record) => {
                self.session.on_salary_field_loaded(record.salary).await;
            }
            Err(err) => self.session.on_record_load_failed(format!("{err:#}")),
        }
        self.render()
    }

    /// Reads one salary per line from `input` until EOF or a quit command,
    /// writing the rendered state after every line.
    ///
    /// Each line is an edit of the salary field, so it goes through
    /// [`PayCalculationSession::on_salary_input_changed`].
    pub async fn run_interactive<R, W>(
        &self,
        input: R,
        output: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let Some(line) = lines
                .next_line()
                .await
                .context("failed to read salary input")?
            else {
                writeln!(output)?;
                break;
            };
            let trimmed = line.trim();
            if QUIT_COMMANDS.contains(&trimmed) {
                break;
            }

            if self.session.on_salary_input_changed(trimmed).await == SubmitOutcome::Superseded {
                continue;
            }
            writeln!(output, "{}", self.render()?)?;
        }
        Ok(())
    }
}

async fn read_record(path: &Path) -> Result<SalaryRecord> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read record '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid record '{}'", path.display()))
}
