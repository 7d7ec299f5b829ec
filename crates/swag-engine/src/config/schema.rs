use crate::wait::WaitConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use swag_common::data;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub urls: UrlsConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// All durations are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Applied to the WebDriver session. Zero leaves all waiting to the
    /// polling helpers, so negative lookups return immediately.
    #[serde(default)]
    pub implicit_wait_ms: u64,
    #[serde(default = "default_explicit_wait_short_ms")]
    pub explicit_wait_short_ms: u64,
    #[serde(default = "default_explicit_wait_long_ms")]
    pub explicit_wait_long_ms: u64,
    #[serde(default = "default_short_sleep_ms")]
    pub short_sleep_ms: u64,
    #[serde(default = "default_medium_sleep_ms")]
    pub medium_sleep_ms: u64,
    #[serde(default = "default_long_sleep_ms")]
    pub long_sleep_ms: u64,
    #[serde(default = "default_page_load_ms")]
    pub page_load_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            implicit_wait_ms: 0,
            explicit_wait_short_ms: default_explicit_wait_short_ms(),
            explicit_wait_long_ms: default_explicit_wait_long_ms(),
            short_sleep_ms: default_short_sleep_ms(),
            medium_sleep_ms: default_medium_sleep_ms(),
            long_sleep_ms: default_long_sleep_ms(),
            page_load_ms: default_page_load_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TimeoutsConfig {
    pub fn wait(&self, timeout: Duration) -> WaitConfig {
        WaitConfig::new(timeout, self.poll_interval())
    }

    pub fn short_wait(&self) -> WaitConfig {
        self.wait(Duration::from_millis(self.explicit_wait_short_ms))
    }

    pub fn long_wait(&self) -> WaitConfig {
        self.wait(Duration::from_millis(self.explicit_wait_long_ms))
    }

    pub fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_wait_ms)
    }

    pub fn short_sleep(&self) -> Duration {
        Duration::from_millis(self.short_sleep_ms)
    }

    pub fn medium_sleep(&self) -> Duration {
        Duration::from_millis(self.medium_sleep_ms)
    }

    pub fn long_sleep(&self) -> Duration {
        Duration::from_millis(self.long_sleep_ms)
    }

    pub fn page_load(&self) -> Duration {
        Duration::from_millis(self.page_load_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_explicit_wait_short_ms() -> u64 {
    5000
}

fn default_explicit_wait_long_ms() -> u64 {
    10000
}

fn default_short_sleep_ms() -> u64 {
    500
}

fn default_medium_sleep_ms() -> u64 {
    1000
}

fn default_long_sleep_ms() -> u64 {
    2000
}

fn default_page_load_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_product_count")]
    pub product_count: usize,
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            product_count: default_product_count(),
            screenshot_dir: default_screenshot_dir(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl ExecutionConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_product_count() -> usize {
    data::DEFAULT_PRODUCT_COUNT
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlsConfig {
    #[serde(default = "default_login_url")]
    pub login: String,
    #[serde(default = "default_inventory_url")]
    pub inventory: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            login: default_login_url(),
            inventory: default_inventory_url(),
            base_url: default_base_url(),
        }
    }
}

fn default_login_url() -> String {
    data::urls::LOGIN.to_string()
}

fn default_inventory_url() -> String {
    data::urls::INVENTORY.to_string()
}

fn default_base_url() -> String {
    data::urls::BASE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// `WIDTH,HEIGHT`, passed to Chrome as `--window-size`.
    #[serde(default = "default_window_size")]
    pub window_size: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_common_args")]
    pub common_args: Vec<String>,
    /// Browser binary; ignored when the path does not exist.
    #[serde(default = "default_binary_location")]
    pub binary_location: Option<PathBuf>,
    /// External WebDriver server. When unset, chromedriver is launched locally.
    #[serde(default)]
    pub webdriver_url: Option<String>,
    #[serde(default = "default_driver_port")]
    pub driver_port: u16,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            headless: default_headless(),
            common_args: default_common_args(),
            binary_location: default_binary_location(),
            webdriver_url: None,
            driver_port: default_driver_port(),
        }
    }
}

fn default_window_size() -> String {
    "1920,1080".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_common_args() -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
    ]
}

fn default_binary_location() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        Some(PathBuf::from("/usr/bin/chromium-browser"))
    } else {
        None
    }
}

fn default_driver_port() -> u16 {
    9515
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults() {
        let timeouts = TimeoutsConfig::default();
        assert_eq!(timeouts.short_wait().timeout, Duration::from_secs(5));
        assert_eq!(timeouts.long_wait().timeout, Duration::from_secs(10));
        assert_eq!(timeouts.page_load(), Duration::from_secs(3));
        assert_eq!(timeouts.medium_sleep(), Duration::from_secs(1));
        assert_eq!(timeouts.long_wait().poll_interval, Duration::from_millis(250));
        assert!(timeouts.implicit_wait().is_zero());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config: SuiteConfig = serde_yaml::from_str(
            r#"
timeouts:
  explicit_wait_short_ms: 1500
browser:
  headless: false
"#,
        )
        .unwrap();
        assert_eq!(config.timeouts.explicit_wait_short_ms, 1500);
        assert_eq!(config.timeouts.explicit_wait_long_ms, 10000);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.window_size, "1920,1080");
        assert_eq!(config.execution.product_count, 6);
        assert_eq!(config.urls.login, "https://www.saucedemo.com/");
    }
}
