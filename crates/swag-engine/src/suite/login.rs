use super::assertions::{ErrorExpectation, SoftAssertions};
use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::pages::{close_error_message, error_message, is_logged_in, login};
use crate::runner::{CaseFailure, TestCase};
use async_trait::async_trait;
use swag_common::data::{LOGIN_ERRORS, USERS, error_patterns, patterns};
use tokio::time::sleep;
use tracing::info;

/// One parametrized run of the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginScenario {
    pub case: String,
    pub username: String,
    pub password: String,
    /// Checked in order against the banner text. Ignored when the login
    /// should succeed.
    pub expectations: Vec<ErrorExpectation>,
    pub should_succeed: bool,
}

/// The error table followed by one case per known account.
pub fn login_scenarios() -> Vec<LoginScenario> {
    let table = LOGIN_ERRORS.iter().map(|row| {
        let mut expectations = Vec::new();
        if let Some(full) = row.expected_error {
            expectations.push(ErrorExpectation::Exact(full.to_string()));
        }
        if let Some(fragment) = row.error_contains {
            expectations.push(ErrorExpectation::Contains(fragment.to_string()));
        }
        LoginScenario {
            case: row.case.to_string(),
            username: row.username.to_string(),
            password: row.password.to_string(),
            expectations,
            should_succeed: row.should_succeed,
        }
    });

    let accounts = USERS.iter().map(|user| {
        let locked = user.kind == "locked";
        let expectations = if locked {
            vec![ErrorExpectation::Contains(
                error_patterns::LOCKED_OUT.to_string(),
            )]
        } else {
            Vec::new()
        };
        LoginScenario {
            case: format!("user_{}", user.kind),
            username: user.username.to_string(),
            password: user.password.to_string(),
            expectations,
            should_succeed: !(user.should_fail || locked),
        }
    });

    table.chain(accounts).collect()
}

#[async_trait]
impl TestCase for LoginScenario {
    fn name(&self) -> String {
        format!("test_login_modular[{}]", self.case)
    }

    async fn run(&self, driver: &mut dyn Driver, config: &SuiteConfig) -> Result<(), CaseFailure> {
        let timeouts = &config.timeouts;

        driver.navigate(&config.urls.login).await?;
        close_error_message(driver, timeouts.short_sleep()).await;
        login(driver, &self.username, &self.password).await?;
        sleep(timeouts.medium_sleep()).await;

        let error_text = error_message(driver, timeouts.short_wait()).await;
        let logged_in = is_logged_in(driver, timeouts.short_wait()).await;
        let current_url = driver.current_url().await?;

        let mut checks = SoftAssertions::new();
        if self.should_succeed {
            if let Some(text) = &error_text {
                checks.fail(format!("Unexpected error for valid user: '{}'", text));
            }
            checks.check(logged_in, || {
                format!("User should be logged in, but URL is: {}", current_url)
            });
            checks.check(current_url.contains(patterns::INVENTORY_PAGE), || {
                format!("Should redirect to inventory page, got: {}", current_url)
            });
            if checks.is_empty() {
                info!(case = %self.case, url = %current_url, "User logged in correctly");
            }
        } else {
            match &error_text {
                None => checks.fail(format!(
                    "Error message expected but not shown for {}",
                    self.case
                )),
                Some(text) => {
                    for expectation in &self.expectations {
                        checks.check_result(expectation.check(text));
                    }
                }
            }
            checks.check(!logged_in, || {
                format!("User should not be logged in, but URL is: {}", current_url)
            });

            if checks.is_empty() {
                info!(case = %self.case, error = ?error_text, "Error handled correctly");
                self.dismiss_banner(driver, config).await;
            }
        }

        checks.into_result(&self.case)
    }
}

impl LoginScenario {
    async fn dismiss_banner(&self, driver: &mut dyn Driver, config: &SuiteConfig) {
        let timeouts = &config.timeouts;
        if close_error_message(driver, timeouts.short_sleep()).await {
            sleep(timeouts.short_sleep()).await;
            if error_message(driver, timeouts.short_wait()).await.is_none() {
                info!(case = %self.case, "Error message closed successfully");
            }
        }
    }
}
