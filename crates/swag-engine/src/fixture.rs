//! Per-test browser sessions: launch, optional login, failure capture and
//! teardown.

use crate::config::SuiteConfig;
use crate::diagnostic::capture_diagnostic;
use crate::driver::{Driver, DriverError};
use crate::pages::{is_logged_in, login};
use std::path::PathBuf;
use std::time::Duration;
use swag_common::data::{UserAccount, selectors, standard_user};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Cannot start browser session: {0}")]
    Launch(#[source] DriverError),

    #[error(
        "Login fixture failed for user '{username}'. The application did not redirect to the \
         inventory page. Current location: {current_url}"
    )]
    LoginFailed {
        username: String,
        current_url: String,
    },

    #[error("Navigation failed: {0}")]
    Navigation(#[source] DriverError),

    #[error("Browser did not close cleanly: {source}")]
    Teardown {
        #[source]
        source: DriverError,
        /// Best-effort capture taken after the close failed.
        screenshot: Option<PathBuf>,
    },
}

impl FixtureError {
    /// Code of the underlying driver error, if there is one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            FixtureError::Launch(e) | FixtureError::Navigation(e) => Some(e.code()),
            FixtureError::Teardown { source, .. } => Some(source.code()),
            FixtureError::LoginFailed { .. } => None,
        }
    }
}

/// One browser, owned by one test from setup to teardown.
pub struct BrowserSession {
    driver: Box<dyn Driver>,
    test_name: String,
    screenshot_dir: PathBuf,
    close_settle: Duration,
}

impl BrowserSession {
    /// Launches the browser behind `driver` and prepares it for a test.
    pub async fn open(
        mut driver: Box<dyn Driver>,
        test_name: &str,
        config: &SuiteConfig,
    ) -> Result<Self, FixtureError> {
        info!(test = test_name, "Setting up browser session");
        driver.launch().await.map_err(FixtureError::Launch)?;

        let implicit = config.timeouts.implicit_wait();
        match driver.set_implicit_wait(implicit).await {
            Ok(()) => info!(
                implicit_wait_ms = implicit.as_millis() as u64,
                "Configured implicit wait"
            ),
            Err(e) => warn!(error = %e, "Could not configure implicit wait"),
        }

        if let Err(e) = driver.maximize_window().await {
            warn!(error = %e, "Could not maximize browser window");
        }

        match driver.user_agent().await {
            Ok(agent) => info!(user_agent = %agent, "Browser ready"),
            Err(_) => info!("Browser ready"),
        }

        Ok(Self {
            driver,
            test_name: test_name.to_string(),
            screenshot_dir: config.execution.screenshot_dir.clone(),
            close_settle: config.timeouts.short_sleep(),
        })
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn driver(&mut self) -> &mut dyn Driver {
        self.driver.as_mut()
    }

    /// Screenshot labelled with this session's test name.
    pub async fn capture(&mut self, tag: &str) -> Option<PathBuf> {
        capture_diagnostic(
            self.driver.as_mut(),
            &self.screenshot_dir,
            &self.test_name,
            tag,
        )
        .await
    }

    /// Signs in as the standard account and confirms the inventory page loads.
    pub async fn log_in_standard_user(
        &mut self,
        config: &SuiteConfig,
    ) -> Result<(), FixtureError> {
        self.log_in(config, standard_user()).await
    }

    /// Opens the login page and signs in as `account`.
    ///
    /// On failure an `AUTH_FAIL` screenshot is captured and the page state is
    /// logged before `LoginFailed` is returned.
    pub async fn log_in(
        &mut self,
        config: &SuiteConfig,
        account: &UserAccount,
    ) -> Result<(), FixtureError> {
        let driver = self.driver.as_mut();
        driver
            .navigate(&config.urls.login)
            .await
            .map_err(FixtureError::Navigation)?;
        info!(url = %config.urls.login, "Navigated to login page");

        info!(
            username = account.username,
            password = %mask_password(account.password),
            "Logging in"
        );
        if let Err(e) = login(driver, account.username, account.password).await {
            warn!(error = %e, "Login form could not be submitted");
        }

        if is_logged_in(driver, config.timeouts.long_wait()).await {
            let url = driver.current_url().await.unwrap_or_default();
            info!(url = %url, "Logged-in session ready");
            return Ok(());
        }

        warn!(username = account.username, "Authentication failed");
        capture_diagnostic(driver, &self.screenshot_dir, "login_fixture_failure", "AUTH_FAIL")
            .await;

        let current_url = driver.current_url().await.unwrap_or_default();
        let title = driver.title().await.unwrap_or_default();
        let banner = match driver.find(&selectors::login::error_message()).await {
            Ok(element) => driver.text(element).await.ok().filter(|t| !t.is_empty()),
            Err(_) => None,
        };
        warn!(
            url = %current_url,
            title = %title,
            error_message = banner.as_deref().unwrap_or("none"),
            "Login failure diagnostics"
        );

        Err(FixtureError::LoginFailed {
            username: account.username.to_string(),
            current_url,
        })
    }

    /// Tears the session down.
    ///
    /// When the test body failed, captures a `FAIL` screenshot and logs the
    /// final page state first. Returns that screenshot's path, if any.
    pub async fn finish(mut self, call_failed: bool) -> Result<Option<PathBuf>, FixtureError> {
        info!(test = %self.test_name, "Cleaning up browser session");

        let mut screenshot = None;
        if call_failed {
            warn!(test = %self.test_name, "Test execution failed");
            screenshot = self.capture("FAIL").await;
            self.log_final_state().await;
        }

        if let Err(source) = self.driver.close().await {
            warn!(test = %self.test_name, error = %source, "Teardown failed");
            let teardown_shot = self.capture("TEARDOWN_FAIL").await;
            return Err(FixtureError::Teardown {
                source,
                screenshot: teardown_shot,
            });
        }
        sleep(self.close_settle).await;
        info!(test = %self.test_name, "Browser closed");
        Ok(screenshot)
    }

    async fn log_final_state(&mut self) {
        let driver = self.driver.as_mut();
        let url = driver.current_url().await.unwrap_or_default();
        let title = driver.title().await.unwrap_or_default();
        match driver.page_source().await {
            Ok(source) => info!(
                url = %url,
                title = %title,
                page_source_chars = source.chars().count(),
                "Final page state"
            ),
            Err(_) => info!(url = %url, title = %title, "Final page state (no page source)"),
        }
    }
}

/// Keeps the first and last character of a password.
pub fn mask_password(password: &str) -> String {
    let chars: Vec<char> = password.chars().collect();
    match chars.as_slice() {
        [first, middle @ .., last] => {
            format!("{}{}{}", first, "*".repeat(middle.len()), last)
        }
        _ => "***".to_string(),
    }
}
