use crate::driver::{Driver, DriverError};
use crate::wait::{ElementVisible, UrlContains, WaitConfig, satisfied_within, wait_until};
use std::time::Duration;
use swag_common::data::{patterns, selectors};
use tokio::time::sleep;
use tracing::{debug, info};

/// Fills in the login form and submits it.
pub async fn login(
    driver: &mut dyn Driver,
    username: &str,
    password: &str,
) -> Result<(), DriverError> {
    let username_field = driver.find(&selectors::login::username_field()).await?;
    driver.clear(username_field).await?;
    driver.send_keys(username_field, username).await?;

    let password_field = driver.find(&selectors::login::password_field()).await?;
    driver.clear(password_field).await?;
    driver.send_keys(password_field, password).await?;

    let button = driver.find(&selectors::login::login_button()).await?;
    driver.click(button).await?;

    info!(username, "Login attempted");
    Ok(())
}

/// Text of the login error banner once it is visible, trimmed.
pub async fn error_message(driver: &mut dyn Driver, wait: WaitConfig) -> Option<String> {
    let banner = ElementVisible(selectors::login::error_message());
    let element = match wait_until(driver, &banner, wait).await {
        Ok(element) => element,
        Err(_) => {
            debug!("No error message found");
            return None;
        }
    };

    match driver.text(element).await {
        Ok(text) => {
            let text = text.trim().to_string();
            info!(error = %text, "Error message found");
            Some(text)
        }
        Err(e) => {
            debug!(error = %e, "Error banner disappeared before it could be read");
            None
        }
    }
}

/// Dismisses the error banner. `false` when there is no banner to close.
pub async fn close_error_message(driver: &mut dyn Driver, settle: Duration) -> bool {
    let closed = match driver.find(&selectors::login::error_close_button()).await {
        Ok(button) => driver.click(button).await,
        Err(e) => Err(e),
    };

    match closed {
        Ok(()) => {
            sleep(settle).await;
            info!("Error message closed");
            true
        }
        Err(e) => {
            debug!(error = %e, "Error close button not available");
            false
        }
    }
}

/// Waits for the redirect to the inventory page.
pub async fn is_logged_in(driver: &mut dyn Driver, wait: WaitConfig) -> bool {
    let logged_in = satisfied_within(
        driver,
        &UrlContains(patterns::INVENTORY_PAGE.to_string()),
        wait,
    )
    .await;
    if logged_in {
        info!("Login successful, on inventory page");
    } else {
        info!("Login failed, not on inventory page");
    }
    logged_in
}
