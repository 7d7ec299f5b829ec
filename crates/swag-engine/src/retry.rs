//! Best-effort clicking for interactions that intermittently fail because of
//! rendering or timing races.

use crate::config::SuiteConfig;
use crate::driver::{Driver, DriverError, ElementId};
use async_trait::async_trait;
use std::time::Duration;
use swag_common::locator::Locator;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Something that can be located afresh on every attempt.
#[async_trait]
pub trait ClickTarget: Send + Sync {
    fn describe(&self) -> String;

    async fn locate(&self, driver: &mut dyn Driver) -> Result<ElementId, DriverError>;
}

#[async_trait]
impl ClickTarget for Locator {
    fn describe(&self) -> String {
        self.to_string()
    }

    async fn locate(&self, driver: &mut dyn Driver) -> Result<ElementId, DriverError> {
        driver.find(self).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStrategy {
    /// Simulated physical input through WebDriver.
    Direct,
    /// `arguments[0].click()` dispatched from page script.
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickPolicy {
    pub max_attempts: u32,
    /// Pause between failed attempts. Not applied after the last one.
    pub retry_delay: Duration,
    /// Pause after a successful click so the page can respond.
    pub settle: Duration,
}

impl ClickPolicy {
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            max_attempts: config.execution.retry_attempts,
            retry_delay: config.execution.retry_delay(),
            settle: config.timeouts.medium_sleep(),
        }
    }
}

impl Default for ClickPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            retry_delay: Duration::from_secs(1),
            settle: Duration::from_secs(1),
        }
    }
}

#[derive(Debug)]
struct AttemptRecord {
    attempt: u32,
    strategy: Option<ClickStrategy>,
    outcome: Result<(), String>,
}

/// Clicks `target`, re-locating it on each attempt.
///
/// Each attempt tries a direct click, then a script click. Returns `false`
/// once `policy.max_attempts` attempts have failed, or as soon as locating
/// fails with an error that retrying cannot clear (a closed session, an
/// invalid selector). Never returns an error.
pub async fn retrying_click(
    driver: &mut dyn Driver,
    target: &dyn ClickTarget,
    policy: ClickPolicy,
) -> bool {
    let description = target.describe();

    for attempt in 1..=policy.max_attempts {
        info!(
            target = %description,
            attempt,
            max_attempts = policy.max_attempts,
            "Click attempt"
        );

        let located = target.locate(driver).await;
        let record = match located {
            Ok(element) => click_with_fallback(driver, element, attempt).await,
            Err(e) if !e.is_transient() => {
                // Another attempt cannot bring back a dead session.
                warn!(target = %description, attempt, error = %e, "Giving up on click");
                return false;
            }
            Err(e) => AttemptRecord {
                attempt,
                strategy: None,
                outcome: Err(format!("locate failed: {}", e)),
            },
        };

        if record.outcome.is_ok() {
            info!(
                target = %description,
                attempt = record.attempt,
                strategy = ?record.strategy,
                "Click succeeded"
            );
            if !policy.settle.is_zero() {
                sleep(policy.settle).await;
            }
            return true;
        }

        debug!(
            target = %description,
            attempt = record.attempt,
            strategy = ?record.strategy,
            outcome = ?record.outcome,
            "Click attempt failed"
        );
        if attempt < policy.max_attempts {
            sleep(policy.retry_delay).await;
        }
    }

    warn!(
        target = %description,
        attempts = policy.max_attempts,
        "Failed to click after all attempts"
    );
    false
}

async fn click_with_fallback(
    driver: &mut dyn Driver,
    element: ElementId,
    attempt: u32,
) -> AttemptRecord {
    match driver.click(element).await {
        Ok(()) => {
            return AttemptRecord {
                attempt,
                strategy: Some(ClickStrategy::Direct),
                outcome: Ok(()),
            };
        }
        Err(e) => {
            debug!(%element, error = %e, "Direct click failed, trying script click");
        }
    }

    let outcome = driver
        .click_via_script(element)
        .await
        .map_err(|e| e.to_string());
    AttemptRecord {
        attempt,
        strategy: Some(ClickStrategy::Script),
        outcome,
    }
}
