//! Orchestrates validation, the calculator call and result mapping.
//!
//! # Lifecycle
//!
//! | From  | Event                              | To          |
//! |-------|------------------------------------|-------------|
//! | any   | invalid salary                     | `Failed`    |
//! | any   | valid salary                       | `Computing` |
//! | `Computing` | non-empty calculator result  | `Ready`     |
//! | `Computing` | empty calculator result      | `Idle`      |
//! | `Computing` | calculator error             | `Failed`    |
//! | any   | record load failure                | `Failed`    |
//!
//! Every transition takes a sequence token under the state lock. A calculator
//! response is only applied when its token is still the latest, so a slow
//! response to an older submission never overwrites a newer one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::calculator::{CalculatorError, TaxCalculatorClient, TaxDetailsRequest};
use crate::mapper::ResultMapper;
use crate::models::{PayCalculationState, SessionPhase};
use crate::validation::{InputErrorKind, RawSalary, SalaryValidator};

/// Shown when the calculator call fails.
pub const CALCULATOR_ERROR_MESSAGE: &str = "Error fetching tax details";

/// Shown when the host could not load the record holding the salary.
pub const RECORD_ERROR_MESSAGE: &str = "Error fetching record";

/// What happened to a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was rejected; the calculator was not called.
    Rejected(InputErrorKind),
    /// The calculator result was mapped and published.
    Ready,
    /// The calculator returned an empty result; breakdowns were zeroed.
    Reset,
    /// The calculator failed; the generic message was published.
    Failed(CalculatorError),
    /// A newer submission was made while this one was in flight; its result
    /// was discarded.
    Superseded,
}

/// Holds the displayable pay breakdown and recomputes it on every submission.
pub struct PayCalculationSession {
    calculator: Arc<dyn TaxCalculatorClient>,
    state: watch::Sender<PayCalculationState>,
    sequence: AtomicU64,
}

impl PayCalculationSession {
    /// Starts a session in the all-zero `Idle` state.
    pub fn new(calculator: Arc<dyn TaxCalculatorClient>) -> Self {
        let (state, _) = watch::channel(PayCalculationState::new());
        Self {
            calculator,
            state,
            sequence: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PayCalculationState {
        self.state.borrow().clone()
    }

    /// Read-only handle that is notified on every published state.
    pub fn subscribe(&self) -> watch::Receiver<PayCalculationState> {
        self.state.subscribe()
    }

    /// Token of the most recent transition.
    pub fn latest_token(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Validates `raw`, calls the calculator and publishes the result.
    ///
    /// Never fails: every error path publishes a zeroed state and is
    /// reported through the returned [`SubmitOutcome`].
    pub async fn submit_salary(
        &self,
        raw: impl Into<RawSalary>,
    ) -> SubmitOutcome {
        let raw = raw.into();

        let salary = match SalaryValidator::validate(&raw) {
            Ok(salary) => salary,
            Err(kind) => {
                let token = self.advance(|previous| {
                    PayCalculationState::input_failed(previous.salary, kind.user_message())
                });
                debug!(token, ?raw, reason = %kind, "salary rejected");
                return SubmitOutcome::Rejected(kind);
            }
        };

        let amount = salary.amount();
        let token = self.advance(|previous| PayCalculationState::computing(previous, amount));
        debug!(
            token,
            %salary,
            calculator = self.calculator.name(),
            "computing tax details"
        );

        match self.calculator.compute_tax_details(TaxDetailsRequest::new(amount)).await {
            Ok(result) if result.is_empty() => {
                let next = PayCalculationState::zeroed(SessionPhase::Idle, amount);
                self.settle(token, next, SubmitOutcome::Reset)
            }
            Ok(result) => {
                let mapped = ResultMapper::map(&result);
                let next = PayCalculationState {
                    phase: SessionPhase::Ready,
                    salary: amount,
                    gross_income: mapped.gross_income,
                    taxes: mapped.taxes,
                    total_taxes: mapped.total_taxes,
                    net_income: mapped.net_income,
                    input_error: String::new(),
                    error_message: String::new(),
                };
                self.settle(token, next, SubmitOutcome::Ready)
            }
            Err(err) => {
                error!(token, %salary, error = %err, "{CALCULATOR_ERROR_MESSAGE}");
                let next = PayCalculationState::failed(amount, CALCULATOR_ERROR_MESSAGE);
                self.settle(token, next, SubmitOutcome::Failed(err))
            }
        }
    }

    /// Runs [`submit_salary`](Self::submit_salary) on the tokio runtime so
    /// the caller does not wait for the calculator.
    pub fn spawn_submit(
        self: &Arc<Self>,
        raw: impl Into<RawSalary>,
    ) -> JoinHandle<SubmitOutcome> {
        let session = Arc::clone(self);
        let raw = raw.into();
        tokio::spawn(async move { session.submit_salary(raw).await })
    }

    /// A stored record supplied the salary. A missing value counts as zero.
    pub async fn on_salary_field_loaded(
        &self,
        value: Option<Decimal>,
    ) -> SubmitOutcome {
        self.submit_salary(value.unwrap_or(Decimal::ZERO)).await
    }

    /// The user edited the salary field.
    pub async fn on_salary_input_changed(
        &self,
        raw: &str,
    ) -> SubmitOutcome {
        self.submit_salary(raw).await
    }

    /// The host failed to load the record holding the salary.
    pub fn on_record_load_failed(
        &self,
        err: impl fmt::Display,
    ) {
        let token = self.advance(|previous| {
            PayCalculationState::failed(previous.salary, RECORD_ERROR_MESSAGE)
        });
        error!(token, error = %err, "{RECORD_ERROR_MESSAGE}");
    }

    /// Issues a new token and publishes the state built from the previous one.
    fn advance(
        &self,
        next: impl FnOnce(&PayCalculationState) -> PayCalculationState,
    ) -> u64 {
        let mut token = 0;
        self.state.send_modify(|state| {
            token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            *state = next(state);
        });
        token
    }

    /// Publishes `next` if `token` is still the latest.
    fn settle(
        &self,
        token: u64,
        next: PayCalculationState,
        outcome: SubmitOutcome,
    ) -> SubmitOutcome {
        let phase = next.phase;
        let applied = self.state.send_if_modified(|state| {
            if self.sequence.load(Ordering::SeqCst) != token {
                return false;
            }
            *state = next;
            true
        });

        if applied {
            info!(token, ?phase, "pay breakdown updated");
            outcome
        } else {
            debug!(token, latest = self.latest_token(), "discarding stale result");
            SubmitOutcome::Superseded
        }
    }
}
