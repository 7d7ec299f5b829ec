//! Browser keywords for scripted, step-by-step scenarios.
//!
//! The library owns at most one browser session. It is created on the first
//! `open_browser_to_url` and dropped by `close_browser`.

use crate::config::SuiteConfig;
use crate::driver::{Driver, DriverError};
use crate::runner::DriverFactory;
use crate::wait::{
    DocumentReady, ElementPresent, WaitConfig, WaitError, WindowCountAbove, wait_until,
};
use swag_common::locator::{Locator, LocatorParseError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("No browser is open")]
    NoBrowser,

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error("Invalid locator: {0}")]
    Locator(#[from] LocatorParseError),

    #[error("URL '{url}' does not contain '{expected}'")]
    UrlMismatch { url: String, expected: String },
}

pub struct BrowserKeywords<F: DriverFactory> {
    factory: F,
    config: SuiteConfig,
    driver: Option<Box<dyn Driver>>,
}

impl<F: DriverFactory> BrowserKeywords<F> {
    pub fn new(factory: F, config: SuiteConfig) -> Self {
        Self {
            factory,
            config,
            driver: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.driver.is_some()
    }

    fn default_wait(&self) -> WaitConfig {
        self.config.timeouts.long_wait()
    }

    fn session(&mut self) -> Result<&mut dyn Driver, KeywordError> {
        match self.driver.as_mut() {
            Some(driver) => Ok(driver.as_mut()),
            None => Err(KeywordError::NoBrowser),
        }
    }

    /// Opens `url` (the configured base URL when `None`) and waits for the
    /// document to finish loading. Launches a browser if none is open.
    pub async fn open_browser_to_url(&mut self, url: Option<&str>) -> Result<(), KeywordError> {
        let url = url.unwrap_or(&self.config.urls.base_url).to_string();
        let wait = self.default_wait();

        if self.driver.is_none() {
            let mut driver = self.factory.create(&self.config);
            driver.launch().await?;
            if let Err(e) = driver
                .set_implicit_wait(self.config.timeouts.implicit_wait())
                .await
                .or_else(ignore_unsupported)
            {
                if let Err(close_err) = driver.close().await {
                    warn!(error = %close_err, "Could not close browser after failed setup");
                }
                return Err(e.into());
            }
            self.driver = Some(driver);
        }

        let driver = self.session()?;
        driver.navigate(&url).await?;
        wait_until(driver, &DocumentReady, wait).await?;
        info!(url = %url, "Browser opened");
        Ok(())
    }

    /// Ends the session. Does nothing when no browser is open.
    pub async fn close_browser(&mut self) -> Result<(), KeywordError> {
        if let Some(mut driver) = self.driver.take() {
            driver.close().await?;
            info!("Browser closed");
        }
        Ok(())
    }

    pub async fn current_url(&mut self) -> Result<String, KeywordError> {
        Ok(self.session()?.current_url().await?)
    }

    /// Waits for a second window to appear, then switches to the newest one.
    pub async fn switch_to_new_window(&mut self) -> Result<(), KeywordError> {
        let wait = self.default_wait();
        let driver = self.session()?;
        let count = wait_until(driver, &WindowCountAbove(1), wait).await?;
        driver.switch_to_window(count - 1).await?;
        info!(window = count - 1, "Switched to new window");
        Ok(())
    }

    pub async fn switch_to_main_window(&mut self) -> Result<(), KeywordError> {
        self.session()?.switch_to_window(0).await?;
        info!("Switched to main window");
        Ok(())
    }

    pub async fn close_current_window(&mut self) -> Result<(), KeywordError> {
        Ok(self.session()?.close_window().await?)
    }

    pub async fn window_count(&mut self) -> Result<usize, KeywordError> {
        Ok(self.session()?.window_count().await?)
    }

    pub async fn url_should_contain(&mut self, expected: &str) -> Result<(), KeywordError> {
        let url = self.session()?.current_url().await?;
        if !url.contains(expected) {
            return Err(KeywordError::UrlMismatch {
                url,
                expected: expected.to_string(),
            });
        }
        info!(expected, "URL contains expected text");
        Ok(())
    }

    /// Waits for an element given as a strategy name and value, e.g.
    /// `("id", "login-button")` or `("css_selector", ".title")`.
    pub async fn page_should_contain_element(
        &mut self,
        locator_type: &str,
        value: &str,
    ) -> Result<(), KeywordError> {
        let locator = Locator::from_parts(locator_type, value)?;
        let wait = self.default_wait();
        let driver = self.session()?;
        wait_until(driver, &ElementPresent(locator.clone()), wait).await?;
        info!(locator = %locator, "Element found");
        Ok(())
    }
}

fn ignore_unsupported(e: DriverError) -> Result<(), DriverError> {
    match e {
        DriverError::NotSupported(_) => Ok(()),
        other => Err(other),
    }
}
