//! Sequential test execution with one fresh browser session per case.

use crate::config::SuiteConfig;
use crate::driver::{Driver, DriverError};
use crate::error_mapping::hint_for_code;
use crate::fixture::{BrowserSession, FixtureError};
use crate::wait::WaitError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// A failed assertion or step inside a test body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CaseFailure {
    pub message: String,
    /// Stable error code when a driver or wait error ended the case.
    pub code: Option<&'static str>,
}

impl CaseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }
}

impl From<DriverError> for CaseFailure {
    fn from(e: DriverError) -> Self {
        Self {
            message: e.to_string(),
            code: Some(e.code()),
        }
    }
}

impl From<WaitError> for CaseFailure {
    fn from(e: WaitError) -> Self {
        Self {
            message: e.to_string(),
            code: Some(e.code()),
        }
    }
}

/// Fails the enclosing case with `message` unless `cond` holds.
#[macro_export]
macro_rules! ensure_case {
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err($crate::runner::CaseFailure::new(format!($($msg)+)));
        }
    };
}

#[async_trait]
pub trait TestCase: Send + Sync {
    /// Report name, e.g. `test_login_modular[empty_username]`.
    fn name(&self) -> String;

    /// Whether the session must be signed in as the standard user first.
    fn needs_login(&self) -> bool {
        false
    }

    async fn run(&self, driver: &mut dyn Driver, config: &SuiteConfig) -> Result<(), CaseFailure>;
}

/// Builds an unlaunched driver for each case.
pub trait DriverFactory: Send + Sync {
    fn create(&self, config: &SuiteConfig) -> Box<dyn Driver>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed {
        phase: Phase,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<&'static str>,
        /// Recovery hint for `code`, when one is known.
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<&'static str>,
    },
}

impl CaseOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub started_at: String,
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    fn new(started_at: String, cases: Vec<CaseReport>) -> Self {
        let passed = cases.iter().filter(|c| c.outcome.is_passed()).count();
        Self {
            started_at,
            passed,
            failed: cases.len() - passed,
            cases,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.outcome.is_passed())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} total",
            self.passed,
            self.failed,
            self.cases.len()
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Runner<F: DriverFactory> {
    factory: F,
    config: SuiteConfig,
}

impl<F: DriverFactory> Runner<F> {
    pub fn new(factory: F, config: SuiteConfig) -> Self {
        Self { factory, config }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Runs every case in order. A failing case never stops the suite.
    pub async fn run_all(&self, cases: &[Box<dyn TestCase>]) -> SuiteReport {
        let started_at = chrono::Local::now().to_rfc3339();
        info!(cases = cases.len(), "Starting suite");

        let mut reports = Vec::with_capacity(cases.len());
        for case in cases {
            reports.push(self.run_case(case.as_ref()).await);
        }

        let report = SuiteReport::new(started_at, reports);
        info!(
            passed = report.passed,
            failed = report.failed,
            "Suite finished"
        );
        report
    }

    pub async fn run_case(&self, case: &dyn TestCase) -> CaseReport {
        let name = case.name();
        let start = Instant::now();
        info!(test = %name, "Test scenario");

        let (outcome, screenshot) = self.execute(case, &name).await;
        match &outcome {
            CaseOutcome::Passed => info!(test = %name, "Scenario complete"),
            CaseOutcome::Failed {
                phase,
                message,
                code,
                hint,
            } => error!(
                test = %name,
                phase = ?phase,
                code = code.unwrap_or("-"),
                hint = hint.unwrap_or("-"),
                message = %message,
                "Scenario failed"
            ),
        }

        CaseReport {
            name,
            outcome,
            screenshot,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn execute(&self, case: &dyn TestCase, name: &str) -> (CaseOutcome, Option<PathBuf>) {
        let driver = self.factory.create(&self.config);
        let mut session = match BrowserSession::open(driver, name, &self.config).await {
            Ok(session) => session,
            Err(e) => return (failed(Phase::Setup, &e), None),
        };

        if case.needs_login()
            && let Err(e) = session.log_in_standard_user(&self.config).await
        {
            warn!(test = %name, "Test setup failed");
            let screenshot = session.capture("SETUP_FAIL").await;
            if let Err(teardown) = session.finish(false).await {
                warn!(test = %name, error = %teardown, "Teardown after setup failure also failed");
            }
            return (failed(Phase::Setup, &e), screenshot);
        }

        let result = case.run(session.driver(), &self.config).await;
        let teardown = session.finish(result.is_err()).await;

        match (result, teardown) {
            (Ok(()), Ok(_)) => (CaseOutcome::Passed, None),
            (Err(failure), teardown) => {
                let screenshot = match teardown {
                    Ok(shot) => shot,
                    Err(FixtureError::Teardown { screenshot, .. }) => screenshot,
                    Err(_) => None,
                };
                (
                    failure_outcome(Phase::Call, failure.message, failure.code),
                    screenshot,
                )
            }
            (Ok(()), Err(e)) => {
                let screenshot = match &e {
                    FixtureError::Teardown { screenshot, .. } => screenshot.clone(),
                    _ => None,
                };
                (failed(Phase::Teardown, &e), screenshot)
            }
        }
    }
}

fn failed(phase: Phase, error: &FixtureError) -> CaseOutcome {
    failure_outcome(phase, error.to_string(), error.code())
}

fn failure_outcome(phase: Phase, message: String, code: Option<&'static str>) -> CaseOutcome {
    CaseOutcome::Failed {
        phase,
        message,
        code,
        hint: code.and_then(hint_for_code),
    }
}
