//! Bounded polling for conditions over live page state.
//!
//! A condition is evaluated against the driver until it yields a value or
//! the timeout elapses. Page state is never cached between evaluations, and
//! the first satisfied evaluation wins.

use crate::driver::{Driver, DriverError, ElementId};
use async_trait::async_trait;
use std::time::Duration;
use swag_common::locator::Locator;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Lower bound on the poll interval so a zero interval cannot spin.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Hard upper bound on wall-clock time spent waiting.
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("Timed out after {timeout:?} waiting for {condition}")]
    TimeoutExceeded {
        condition: String,
        timeout: Duration,
        /// The last driver error seen while evaluating, if any.
        last_error: Option<String>,
    },
}

impl WaitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::TimeoutExceeded { .. })
    }

    /// Same code as a driver-side `Timeout`.
    pub fn code(&self) -> &'static str {
        match self {
            WaitError::TimeoutExceeded { .. } => "TIMEOUT",
        }
    }
}

/// A predicate over live page state.
///
/// `Ok(Some(_))` means satisfied, `Ok(None)` means not yet. Errors are
/// treated as not yet by `wait_until`.
#[async_trait]
pub trait Condition: Send + Sync {
    type Output: Send;

    fn describe(&self) -> String;

    async fn evaluate(&self, driver: &mut dyn Driver)
    -> Result<Option<Self::Output>, DriverError>;
}

/// Polls `condition` until it is satisfied or `config.timeout` elapses.
///
/// Returns the satisfied condition's value. When unsatisfied, returns
/// `TimeoutExceeded` no earlier than the timeout; the final sleep is clipped
/// to the deadline and the condition gets one last evaluation there.
pub async fn wait_until<C: Condition>(
    driver: &mut dyn Driver,
    condition: &C,
    config: WaitConfig,
) -> Result<C::Output, WaitError> {
    let description = condition.describe();
    let start = Instant::now();
    let deadline = start + config.timeout;
    let mut last_error: Option<String> = None;
    let mut polls: u32 = 0;

    loop {
        polls += 1;
        match condition.evaluate(driver).await {
            Ok(Some(value)) => {
                debug!(
                    condition = %description,
                    polls,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Condition satisfied"
                );
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) => {
                trace!(condition = %description, error = %e, "Condition evaluation failed");
                last_error = Some(e.to_string());
            }
        }

        let now = Instant::now();
        if now >= deadline {
            debug!(
                condition = %description,
                polls,
                timeout_ms = config.timeout.as_millis() as u64,
                "Condition timed out"
            );
            return Err(WaitError::TimeoutExceeded {
                condition: description,
                timeout: config.timeout,
                last_error,
            });
        }

        sleep(config.poll_interval.min(deadline - now)).await;
    }
}

/// `wait_until` for callers that only need to know whether the condition held.
pub async fn satisfied_within<C: Condition>(
    driver: &mut dyn Driver,
    condition: &C,
    config: WaitConfig,
) -> bool {
    wait_until(driver, condition, config).await.is_ok()
}

// ============================================================
// Built-in conditions
// ============================================================

/// Current URL contains a fragment. Yields the URL.
#[derive(Debug, Clone)]
pub struct UrlContains(pub String);

#[async_trait]
impl Condition for UrlContains {
    type Output = String;

    fn describe(&self) -> String {
        format!("URL containing '{}'", self.0)
    }

    async fn evaluate(&self, driver: &mut dyn Driver) -> Result<Option<String>, DriverError> {
        let url = driver.current_url().await?;
        Ok(url.contains(&self.0).then_some(url))
    }
}

#[derive(Debug, Clone)]
pub struct TitleIs(pub String);

#[async_trait]
impl Condition for TitleIs {
    type Output = ();

    fn describe(&self) -> String {
        format!("title '{}'", self.0)
    }

    async fn evaluate(&self, driver: &mut dyn Driver) -> Result<Option<()>, DriverError> {
        let title = driver.title().await?;
        Ok((title == self.0).then_some(()))
    }
}

/// Element is in the DOM, visible or not.
#[derive(Debug, Clone)]
pub struct ElementPresent(pub Locator);

#[async_trait]
impl Condition for ElementPresent {
    type Output = ElementId;

    fn describe(&self) -> String {
        format!("presence of {}", self.0)
    }

    async fn evaluate(&self, driver: &mut dyn Driver) -> Result<Option<ElementId>, DriverError> {
        match driver.find(&self.0).await {
            Ok(element) => Ok(Some(element)),
            Err(DriverError::ElementNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Element is in the DOM and displayed.
#[derive(Debug, Clone)]
pub struct ElementVisible(pub Locator);

#[async_trait]
impl Condition for ElementVisible {
    type Output = ElementId;

    fn describe(&self) -> String {
        format!("visibility of {}", self.0)
    }

    async fn evaluate(&self, driver: &mut dyn Driver) -> Result<Option<ElementId>, DriverError> {
        let element = match driver.find(&self.0).await {
            Ok(element) => element,
            Err(DriverError::ElementNotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(driver.is_displayed(element).await?.then_some(element))
    }
}

/// At least one element matches.
#[derive(Debug, Clone)]
pub struct AllElementsPresent(pub Locator);

#[async_trait]
impl Condition for AllElementsPresent {
    type Output = Vec<ElementId>;

    fn describe(&self) -> String {
        format!("presence of all {}", self.0)
    }

    async fn evaluate(
        &self,
        driver: &mut dyn Driver,
    ) -> Result<Option<Vec<ElementId>>, DriverError> {
        let elements = driver.find_all(&self.0).await?;
        Ok((!elements.is_empty()).then_some(elements))
    }
}

/// `document.readyState` is `complete`.
#[derive(Debug, Clone, Copy)]
pub struct DocumentReady;

#[async_trait]
impl Condition for DocumentReady {
    type Output = ();

    fn describe(&self) -> String {
        "document ready".to_string()
    }

    async fn evaluate(&self, driver: &mut dyn Driver) -> Result<Option<()>, DriverError> {
        let state = driver.execute_script("return document.readyState").await?;
        Ok((state.as_str() == Some("complete")).then_some(()))
    }
}

/// More than `n` windows are open. Yields the count.
#[derive(Debug, Clone, Copy)]
pub struct WindowCountAbove(pub usize);

#[async_trait]
impl Condition for WindowCountAbove {
    type Output = usize;

    fn describe(&self) -> String {
        format!("more than {} windows", self.0)
    }

    async fn evaluate(&self, driver: &mut dyn Driver) -> Result<Option<usize>, DriverError> {
        let count = driver.window_count().await?;
        Ok((count > self.0).then_some(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = WaitConfig::new(Duration::from_secs(1), Duration::ZERO);
        assert_eq!(config.poll_interval, MIN_POLL_INTERVAL);
    }

    #[test]
    fn test_timeout_message() {
        let err = WaitError::TimeoutExceeded {
            condition: "URL containing '/inventory.html'".into(),
            timeout: Duration::from_secs(3),
            last_error: None,
        };
        assert!(err.is_timeout());
        assert_eq!(err.code(), "TIMEOUT");
        assert_eq!(
            err.to_string(),
            "Timed out after 3s waiting for URL containing '/inventory.html'"
        );
    }

    #[test]
    fn test_descriptions_name_the_locator() {
        assert_eq!(
            ElementVisible(Locator::css("[data-test='error']")).describe(),
            "visibility of css=[data-test='error']"
        );
        assert_eq!(WindowCountAbove(1).describe(), "more than 1 windows");
    }
}
