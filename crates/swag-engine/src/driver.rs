use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
pub use swag_common::error::DriverError;
use swag_common::locator::Locator;

/// Opaque handle to an element located by a driver.
///
/// Handles stay valid until the page they came from is replaced; using one
/// afterwards yields `DriverError::ElementStale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}

/// The browser-automation interface every session implementation provides.
///
/// One driver owns one browser session. Operations that not every backend
/// supports default to `NotSupported`.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Start the browser and open a session.
    async fn launch(&mut self) -> Result<(), DriverError>;

    /// End the session and release the browser process.
    async fn close(&mut self) -> Result<(), DriverError>;

    async fn is_ready(&self) -> bool;

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError>;

    async fn current_url(&mut self) -> Result<String, DriverError>;

    async fn title(&mut self) -> Result<String, DriverError>;

    /// Locate the first element matching `locator`.
    async fn find(&mut self, locator: &Locator) -> Result<ElementId, DriverError>;

    /// Locate every element matching `locator`. An empty page yields an empty list.
    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementId>, DriverError>;

    /// Locate the first descendant of `parent` matching `locator`.
    async fn find_within(
        &mut self,
        parent: ElementId,
        locator: &Locator,
    ) -> Result<ElementId, DriverError>;

    /// Simulated user click.
    async fn click(&mut self, element: ElementId) -> Result<(), DriverError>;

    /// Dispatch a click event from page script, bypassing hit-testing.
    async fn click_via_script(&mut self, _element: ElementId) -> Result<(), DriverError> {
        Err(DriverError::NotSupported("click_via_script".into()))
    }

    async fn clear(&mut self, element: ElementId) -> Result<(), DriverError>;

    async fn send_keys(&mut self, element: ElementId, text: &str) -> Result<(), DriverError>;

    async fn text(&mut self, element: ElementId) -> Result<String, DriverError>;

    async fn attribute(
        &mut self,
        element: ElementId,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    async fn is_displayed(&mut self, element: ElementId) -> Result<bool, DriverError>;

    async fn is_enabled(&mut self, element: ElementId) -> Result<bool, DriverError>;

    /// Capture the current viewport as PNG bytes.
    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError>;

    async fn execute_script(&mut self, _script: &str) -> Result<serde_json::Value, DriverError> {
        Err(DriverError::NotSupported("execute_script".into()))
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        Err(DriverError::NotSupported("page_source".into()))
    }

    async fn refresh(&mut self) -> Result<NavigationResult, DriverError> {
        Err(DriverError::NotSupported("refresh".into()))
    }

    async fn go_back(&mut self) -> Result<NavigationResult, DriverError> {
        Err(DriverError::NotSupported("go_back".into()))
    }

    async fn maximize_window(&mut self) -> Result<(), DriverError> {
        Err(DriverError::NotSupported("maximize_window".into()))
    }

    /// How long element lookups block before reporting no match.
    async fn set_implicit_wait(&mut self, _timeout: Duration) -> Result<(), DriverError> {
        Err(DriverError::NotSupported("set_implicit_wait".into()))
    }

    async fn window_count(&mut self) -> Result<usize, DriverError> {
        Err(DriverError::NotSupported("window_count".into()))
    }

    /// Switch to a window by its position in open order (0 is the main window).
    async fn switch_to_window(&mut self, _index: usize) -> Result<(), DriverError> {
        Err(DriverError::NotSupported("switch_to_window".into()))
    }

    async fn close_window(&mut self) -> Result<(), DriverError> {
        Err(DriverError::NotSupported("close_window".into()))
    }

    async fn user_agent(&mut self) -> Result<String, DriverError> {
        let value = self.execute_script("return navigator.userAgent").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}
