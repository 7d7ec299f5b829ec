use crate::config::TimeoutsConfig;
use crate::driver::{Driver, ElementId};
use crate::wait::{ElementPresent, WaitConfig, WaitError, satisfied_within, wait_until};
use std::time::Duration;
use swag_common::locator::Locator;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Waits for an element to be present in the DOM.
pub async fn wait_for_element(
    driver: &mut dyn Driver,
    locator: &Locator,
    wait: WaitConfig,
) -> Result<ElementId, WaitError> {
    wait_until(driver, &ElementPresent(locator.clone()), wait).await
}

pub async fn is_element_present(
    driver: &mut dyn Driver,
    locator: &Locator,
    wait: WaitConfig,
) -> bool {
    satisfied_within(driver, &ElementPresent(locator.clone()), wait).await
}

/// Single lookup, no waiting. Searches under `parent` when given.
pub async fn safe_find_element(
    driver: &mut dyn Driver,
    locator: &Locator,
    parent: Option<ElementId>,
) -> Option<ElementId> {
    let found = match parent {
        Some(parent) => driver.find_within(parent, locator).await,
        None => driver.find(locator).await,
    };
    match found {
        Ok(element) => Some(element),
        Err(e) => {
            debug!(%locator, error = %e, "Element not found");
            None
        }
    }
}

/// Reloads the page, then pauses for `wait` (the configured page load
/// time when `None`).
pub async fn refresh_page_and_wait(
    driver: &mut dyn Driver,
    timeouts: &TimeoutsConfig,
    wait: Option<Duration>,
) {
    info!("Refreshing page");
    if let Err(e) = driver.refresh().await {
        warn!(error = %e, "Refresh failed");
    }
    sleep(wait.unwrap_or_else(|| timeouts.page_load())).await;
}

/// True if the current URL contains any of `patterns`.
pub async fn url_matches_any(driver: &mut dyn Driver, patterns: &[&str]) -> bool {
    match driver.current_url().await {
        Ok(url) => patterns.iter().any(|p| url.contains(p)),
        Err(e) => {
            warn!(error = %e, "Could not read current URL");
            false
        }
    }
}
