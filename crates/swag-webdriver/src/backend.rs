use crate::chromedriver::{self, ChromeDriverProcess};
use crate::webdriver::WebDriverClient;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::TimeoutConfiguration;
use std::collections::HashMap;
use std::time::Duration;
use swag_common::error_mapping::{ErrorContext, map_webdriver_error};
use swag_common::locator::Locator;
use swag_engine::config::{BrowserConfig, SuiteConfig};
use swag_engine::driver::{Driver, DriverError, ElementId, NavigationResult};
use swag_engine::runner::DriverFactory;
use tracing::{debug, info};

/// Element handles issued for the current page.
#[derive(Default)]
struct ElementRegistry {
    next_id: u32,
    elements: HashMap<u32, Element>,
}

impl ElementRegistry {
    fn register(&mut self, element: Element) -> ElementId {
        self.next_id += 1;
        self.elements.insert(self.next_id, element);
        ElementId(self.next_id)
    }

    fn get(&self, id: ElementId) -> Result<&Element, DriverError> {
        self.elements
            .get(&id.0)
            .ok_or(DriverError::UnknownElement { id: id.0 })
    }

    fn clear(&mut self) {
        self.elements.clear();
    }
}

/// Chrome driven over WebDriver, either through an external server or a
/// chromedriver process started on launch.
pub struct WebDriverBackend {
    client: Option<WebDriverClient>,
    webdriver_url: Option<String>,
    chromedriver: Option<ChromeDriverProcess>,
    browser: BrowserConfig,
    force_headless: bool,
    elements: ElementRegistry,
}

impl WebDriverBackend {
    /// Uses `browser.webdriver_url` when set, otherwise launches chromedriver
    /// on `browser.driver_port`.
    pub fn new(browser: BrowserConfig) -> Self {
        Self {
            client: None,
            webdriver_url: browser.webdriver_url.clone(),
            chromedriver: None,
            force_headless: browser.headless,
            browser,
            elements: ElementRegistry::default(),
        }
    }

    /// Connects to an already running WebDriver server.
    pub fn with_url(webdriver_url: String, browser: BrowserConfig) -> Self {
        Self {
            webdriver_url: Some(webdriver_url),
            ..Self::new(browser)
        }
    }

    fn client(&self) -> Result<&WebDriverClient, DriverError> {
        self.client.as_ref().ok_or(DriverError::NotReady)
    }

    fn element(&self, id: ElementId) -> Result<&Element, DriverError> {
        self.elements.get(id)
    }

    async fn navigation_result(&self) -> Result<NavigationResult, DriverError> {
        let client = &self.client()?.client;
        let title = client.title().await.unwrap_or_default();
        let url = client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(NavigationResult { url, title })
    }
}

fn op_error(operation: &str) -> impl FnOnce(CmdError) -> DriverError + '_ {
    move |e| map_webdriver_error(&e.to_string(), ErrorContext::operation(operation))
}

fn element_error(operation: &str, id: ElementId) -> impl FnOnce(CmdError) -> DriverError + '_ {
    move |e| map_webdriver_error(&e.to_string(), ErrorContext::element(operation, id.0))
}

fn locator_error<'a>(
    operation: &'a str,
    locator: &'a str,
) -> impl FnOnce(CmdError) -> DriverError + 'a {
    move |e| map_webdriver_error(&e.to_string(), ErrorContext::locator(operation, locator))
}

/// Closes the session held in `slot`, emptying it only once the close
/// succeeded. A session whose close failed stays in place so teardown can
/// still capture it.
async fn close_session<S, F, Fut>(slot: &mut Option<S>, close: F) -> Result<(), DriverError>
where
    F: FnOnce(&S) -> Fut,
    Fut: Future<Output = Result<(), DriverError>>,
{
    let Some(session) = slot.as_ref() else {
        return Ok(());
    };
    close(session).await?;
    *slot = None;
    Ok(())
}

/// The fantoccini locator for `locator`. Partial link text becomes XPath;
/// the other strategies WebDriver lacks are expressed as CSS.
fn query_for(locator: &Locator) -> (QueryKind, String) {
    match locator {
        Locator::Id(v) => (QueryKind::Id, v.clone()),
        Locator::XPath(v) => (QueryKind::XPath, v.clone()),
        Locator::LinkText(v) => (QueryKind::LinkText, v.clone()),
        Locator::PartialLinkText(v) => (
            QueryKind::XPath,
            locator.xpath_equivalent().unwrap_or_else(|| v.clone()),
        ),
        other => (
            QueryKind::Css,
            other.css_equivalent().unwrap_or_else(|| other.value().to_string()),
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Id,
    Css,
    XPath,
    LinkText,
}

fn fantoccini_locator(kind: QueryKind, value: &str) -> fantoccini::Locator<'_> {
    match kind {
        QueryKind::Id => fantoccini::Locator::Id(value),
        QueryKind::Css => fantoccini::Locator::Css(value),
        QueryKind::XPath => fantoccini::Locator::XPath(value),
        QueryKind::LinkText => fantoccini::Locator::LinkText(value),
    }
}

#[async_trait]
impl Driver for WebDriverBackend {
    async fn launch(&mut self) -> Result<(), DriverError> {
        let headless = self.force_headless || chromedriver::is_headless_environment();
        let webdriver_url = if let Some(url) = &self.webdriver_url {
            info!("Connecting to external WebDriver at {}...", url);
            url.clone()
        } else {
            info!(
                "Launching chromedriver on port {}...",
                self.browser.driver_port
            );
            let process = chromedriver::launch_chromedriver(self.browser.driver_port)
                .await
                .map_err(DriverError::Launch)?;
            let url = process.webdriver_url();
            self.chromedriver = Some(process);
            url
        };

        let capabilities = chromedriver::chrome_capabilities(&self.browser, headless);
        let client = WebDriverClient::connect(&webdriver_url, Some(capabilities)).await?;
        self.client = Some(client);
        info!(headless, "WebDriver session created");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.elements.clear();
        close_session(&mut self.client, |client| {
            let client = client.clone();
            async move { client.close().await }
        })
        .await?;
        // Dropping the process handle stops chromedriver.
        self.chromedriver = None;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError> {
        info!("Navigating to: {}", url);
        self.client()?
            .client
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        self.elements.clear();
        self.navigation_result().await
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        let url = self
            .client()?
            .client
            .current_url()
            .await
            .map_err(op_error("current_url"))?;
        Ok(url.to_string())
    }

    async fn title(&mut self) -> Result<String, DriverError> {
        self.client()?
            .client
            .title()
            .await
            .map_err(op_error("title"))
    }

    async fn find(&mut self, locator: &Locator) -> Result<ElementId, DriverError> {
        let (kind, value) = query_for(locator);
        let description = locator.to_string();
        let element = self
            .client()?
            .client
            .find(fantoccini_locator(kind, &value))
            .await
            .map_err(locator_error("find", &description))?;
        Ok(self.elements.register(element))
    }

    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementId>, DriverError> {
        let (kind, value) = query_for(locator);
        let description = locator.to_string();
        let found = self
            .client()?
            .client
            .find_all(fantoccini_locator(kind, &value))
            .await
            .map_err(locator_error("find_all", &description))?;
        debug!(locator = %description, count = found.len(), "Found elements");
        Ok(found
            .into_iter()
            .map(|element| self.elements.register(element))
            .collect())
    }

    async fn find_within(
        &mut self,
        parent: ElementId,
        locator: &Locator,
    ) -> Result<ElementId, DriverError> {
        let (kind, value) = query_for(locator);
        let description = locator.to_string();
        let element = self
            .element(parent)?
            .find(fantoccini_locator(kind, &value))
            .await
            .map_err(locator_error("find_within", &description))?;
        Ok(self.elements.register(element))
    }

    async fn click(&mut self, element: ElementId) -> Result<(), DriverError> {
        self.element(element)?
            .click()
            .await
            .map_err(element_error("click", element))
    }

    async fn click_via_script(&mut self, element: ElementId) -> Result<(), DriverError> {
        let target = serde_json::to_value(self.element(element)?)?;
        self.client()?
            .client
            .execute("arguments[0].click();", vec![target])
            .await
            .map_err(element_error("click_via_script", element))?;
        Ok(())
    }

    async fn clear(&mut self, element: ElementId) -> Result<(), DriverError> {
        self.element(element)?
            .clear()
            .await
            .map_err(element_error("clear", element))
    }

    async fn send_keys(&mut self, element: ElementId, text: &str) -> Result<(), DriverError> {
        self.element(element)?
            .send_keys(text)
            .await
            .map_err(element_error("send_keys", element))
    }

    async fn text(&mut self, element: ElementId) -> Result<String, DriverError> {
        self.element(element)?
            .text()
            .await
            .map_err(element_error("text", element))
    }

    async fn attribute(
        &mut self,
        element: ElementId,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        self.element(element)?
            .attr(name)
            .await
            .map_err(element_error("attribute", element))
    }

    async fn is_displayed(&mut self, element: ElementId) -> Result<bool, DriverError> {
        self.element(element)?
            .is_displayed()
            .await
            .map_err(element_error("is_displayed", element))
    }

    async fn is_enabled(&mut self, element: ElementId) -> Result<bool, DriverError> {
        self.element(element)?
            .is_enabled()
            .await
            .map_err(element_error("is_enabled", element))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError> {
        self.client()?
            .client
            .screenshot()
            .await
            .map_err(op_error("screenshot"))
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, DriverError> {
        self.client()?
            .client
            .execute(script, vec![])
            .await
            .map_err(op_error("execute_script"))
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        self.client()?
            .client
            .source()
            .await
            .map_err(op_error("page_source"))
    }

    async fn refresh(&mut self) -> Result<NavigationResult, DriverError> {
        self.client()?
            .client
            .refresh()
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        self.elements.clear();
        self.navigation_result().await
    }

    async fn go_back(&mut self) -> Result<NavigationResult, DriverError> {
        self.client()?
            .client
            .back()
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        self.elements.clear();
        self.navigation_result().await
    }

    async fn maximize_window(&mut self) -> Result<(), DriverError> {
        self.client()?
            .client
            .maximize_window()
            .await
            .map_err(op_error("maximize_window"))
    }

    async fn set_implicit_wait(&mut self, timeout: Duration) -> Result<(), DriverError> {
        let timeouts = TimeoutConfiguration::new(None, None, Some(timeout));
        self.client()?
            .client
            .update_timeouts(timeouts)
            .await
            .map_err(op_error("set_implicit_wait"))
    }

    async fn window_count(&mut self) -> Result<usize, DriverError> {
        let handles = self
            .client()?
            .client
            .windows()
            .await
            .map_err(op_error("window_count"))?;
        Ok(handles.len())
    }

    async fn switch_to_window(&mut self, index: usize) -> Result<(), DriverError> {
        let client = &self.client()?.client;
        let mut handles = client
            .windows()
            .await
            .map_err(op_error("switch_to_window"))?;
        if index >= handles.len() {
            return Err(DriverError::NoSuchWindow);
        }
        client
            .switch_to_window(handles.swap_remove(index))
            .await
            .map_err(op_error("switch_to_window"))?;
        self.elements.clear();
        Ok(())
    }

    async fn close_window(&mut self) -> Result<(), DriverError> {
        self.client()?
            .client
            .close_window()
            .await
            .map_err(op_error("close_window"))?;
        self.elements.clear();
        Ok(())
    }
}

/// Creates a fresh `WebDriverBackend` for every test case.
pub struct WebDriverFactory;

impl DriverFactory for WebDriverFactory {
    fn create(&self, config: &SuiteConfig) -> Box<dyn Driver> {
        Box::new(WebDriverBackend::new(config.browser.clone()))
    }
}
