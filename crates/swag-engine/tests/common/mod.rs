#![allow(dead_code)]

//! In-memory Swag Labs shop implementing `Driver`, for exercising the
//! engine without a browser.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use swag_engine::config::SuiteConfig;
use swag_engine::data::{PRODUCTS, selectors, urls};
use swag_engine::driver::{Driver, DriverError, ElementId, NavigationResult};
use swag_engine::runner::DriverFactory;
use swag_engine::Locator;
use tokio::time::Instant;

pub const VALID_PASSWORD: &str = "secret_sauce";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Blank,
    Login,
    Inventory,
    Detail(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    UsernameField,
    PasswordField,
    LoginButton,
    ErrorBanner,
    ErrorClose,
    Item(usize),
    ItemName(usize),
    ItemPrice(usize),
    ItemImage(usize),
    ItemButton(usize),
    DetailName,
    DetailPrice,
    BackButton,
}

/// Knobs for injecting failures and delays.
#[derive(Debug, Clone, Default)]
pub struct ShopOptions {
    /// Delay between a valid login click and the inventory redirect.
    pub login_delay: Duration,
    /// Number of upcoming direct clicks that fail as intercepted.
    pub direct_click_failures: u32,
    /// Number of upcoming script clicks that fail.
    pub script_click_failures: u32,
    pub screenshot_fails: bool,
    pub close_fails: bool,
    pub launch_fails: bool,
    /// Product indices left out of the inventory listing.
    pub missing_products: Vec<usize>,
    /// Shown on detail pages instead of the listed price.
    pub detail_price_override: Option<String>,
    /// Document title instead of "Swag Labs".
    pub title_override: Option<String>,
    pub implicit_wait_fails: bool,
}

#[derive(Debug, Default)]
pub struct ShopState {
    pub options: ShopOptions,
    pub launched: bool,
    pub closed: bool,
    pub page: Option<Page>,
    pub logged_in: bool,
    pub error: Option<String>,
    pub username: String,
    pub password: String,
    pub windows: usize,
    pub current_window: usize,
    pub implicit_wait: Option<Duration>,
    pub calls: HashMap<&'static str, u32>,
    generation: u32,
    next_id: u32,
    elements: HashMap<u32, (u32, Node)>,
    redirect_at: Option<(Instant, Page)>,
    window_opens_at: Option<Instant>,
}

impl ShopState {
    fn page(&self) -> Page {
        self.page.unwrap_or(Page::Blank)
    }

    fn count(&mut self, call: &'static str) {
        *self.calls.entry(call).or_insert(0) += 1;
    }

    fn tick(&mut self) {
        let now = Instant::now();
        if let Some((at, page)) = self.redirect_at
            && now >= at
        {
            self.redirect_at = None;
            self.go(page);
        }
        if let Some(at) = self.window_opens_at
            && now >= at
        {
            self.window_opens_at = None;
            self.windows += 1;
        }
    }

    fn go(&mut self, page: Page) {
        self.page = Some(page);
        self.generation += 1;
        self.error = None;
    }

    fn alive(&mut self) -> Result<(), DriverError> {
        if !self.launched || self.closed {
            return Err(DriverError::SessionClosed);
        }
        self.tick();
        Ok(())
    }

    fn url(&self) -> String {
        match self.page() {
            Page::Blank => "about:blank".to_string(),
            Page::Login => urls::LOGIN.to_string(),
            Page::Inventory => urls::INVENTORY.to_string(),
            Page::Detail(i) => format!("{}/inventory-item.html?id={}", urls::BASE_URL, i),
        }
    }

    fn listed(&self) -> Vec<usize> {
        (0..PRODUCTS.len())
            .filter(|i| !self.options.missing_products.contains(i))
            .collect()
    }

    fn issue(&mut self, node: Node) -> ElementId {
        self.next_id += 1;
        self.elements.insert(self.next_id, (self.generation, node));
        ElementId(self.next_id)
    }

    fn resolve(&self, element: ElementId) -> Result<Node, DriverError> {
        let (generation, node) = self
            .elements
            .get(&element.0)
            .copied()
            .ok_or(DriverError::UnknownElement { id: element.0 })?;
        let gone = matches!(node, Node::ErrorBanner | Node::ErrorClose) && self.error.is_none();
        if generation != self.generation || gone {
            return Err(DriverError::ElementStale { id: element.0 });
        }
        Ok(node)
    }

    fn lookup(&self, locator: &Locator) -> Vec<Node> {
        let page = self.page();
        let on_login = page == Page::Login;
        let has_error = on_login && self.error.is_some();

        if on_login && *locator == selectors::login::username_field() {
            vec![Node::UsernameField]
        } else if on_login && *locator == selectors::login::password_field() {
            vec![Node::PasswordField]
        } else if on_login && *locator == selectors::login::login_button() {
            vec![Node::LoginButton]
        } else if has_error && *locator == selectors::login::error_message() {
            vec![Node::ErrorBanner]
        } else if has_error && *locator == selectors::login::error_close_button() {
            vec![Node::ErrorClose]
        } else if page == Page::Inventory && *locator == selectors::inventory::product_items() {
            self.listed().into_iter().map(Node::Item).collect()
        } else if matches!(page, Page::Detail(_)) {
            if *locator == selectors::detail::product_name() {
                vec![Node::DetailName]
            } else if *locator == selectors::detail::product_price() {
                vec![Node::DetailPrice]
            } else if *locator == selectors::detail::back_button() {
                vec![Node::BackButton]
            } else {
                Vec::new()
            }
        } else {
            Vec::new()
        }
    }

    fn lookup_within(&self, parent: Node, locator: &Locator) -> Option<Node> {
        let Node::Item(i) = parent else {
            return None;
        };
        if *locator == selectors::inventory::product_name() {
            Some(Node::ItemName(i))
        } else if *locator == selectors::inventory::product_price() {
            Some(Node::ItemPrice(i))
        } else if *locator == selectors::inventory::product_image() {
            Some(Node::ItemImage(i))
        } else if *locator == selectors::inventory::add_to_cart_button() {
            Some(Node::ItemButton(i))
        } else {
            None
        }
    }

    fn submit_login(&mut self) {
        let ok_users = [
            "standard_user",
            "problem_user",
            "performance_glitch_user",
            "error_user",
            "visual_user",
        ];
        let message = if self.username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if self.password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if self.username == "locked_out_user" && self.password == VALID_PASSWORD {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else if ok_users.contains(&self.username.as_str()) && self.password == VALID_PASSWORD {
            None
        } else {
            Some("Epic sadface: Username and password do not match any user in this service")
        };

        match message {
            Some(text) => self.error = Some(text.to_string()),
            None => {
                self.logged_in = true;
                if self.options.login_delay.is_zero() {
                    self.go(Page::Inventory);
                } else {
                    let at = Instant::now() + self.options.login_delay;
                    self.redirect_at = Some((at, Page::Inventory));
                }
            }
        }
    }

    fn activate(&mut self, node: Node) {
        match node {
            Node::LoginButton => self.submit_login(),
            Node::ErrorClose => self.error = None,
            Node::ItemName(i) | Node::ItemImage(i) => self.go(Page::Detail(i)),
            Node::BackButton => self.go(Page::Inventory),
            _ => {}
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeShop {
    state: Arc<Mutex<ShopState>>,
}

impl FakeShop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ShopOptions) -> Self {
        let shop = Self::default();
        shop.state().options = options;
        shop
    }

    pub fn state(&self) -> MutexGuard<'_, ShopState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self, call: &str) -> u32 {
        self.state().calls.get(call).copied().unwrap_or(0)
    }

    /// Opens a second window after `after`.
    pub fn open_window_after(&self, after: Duration) {
        self.state().window_opens_at = Some(Instant::now() + after);
    }

    /// Navigates to `page` once `after` has elapsed.
    pub fn redirect_after(&self, after: Duration, page: Page) {
        self.state().redirect_at = Some((Instant::now() + after, page));
    }

    /// A launched shop already showing `page`.
    pub async fn launched_on(page: Page) -> Self {
        let mut shop = Self::new();
        shop.launch().await.unwrap();
        {
            let mut state = shop.state();
            if matches!(page, Page::Inventory | Page::Detail(_)) {
                state.logged_in = true;
            }
            state.go(page);
        }
        shop
    }
}

#[async_trait]
impl Driver for FakeShop {
    async fn launch(&mut self) -> Result<(), DriverError> {
        let mut state = self.state();
        state.count("launch");
        if state.options.launch_fails {
            return Err(DriverError::Launch("chromedriver not found".into()));
        }
        state.launched = true;
        state.windows = 1;
        state.go(Page::Blank);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        let mut state = self.state();
        state.count("close");
        if state.options.close_fails {
            return Err(DriverError::Other("quit: connection reset".into()));
        }
        state.closed = true;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        let state = self.state();
        state.launched && !state.closed
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("navigate");
        let page = if url.contains("inventory-item.html") {
            let id = url
                .rsplit("id=")
                .next()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            Page::Detail(id)
        } else if url.contains("inventory.html") {
            Page::Inventory
        } else {
            Page::Login
        };
        let page = if page != Page::Login && !state.logged_in {
            Page::Login
        } else {
            page
        };
        state.go(page);
        Ok(NavigationResult {
            url: state.url(),
            title: "Swag Labs".into(),
        })
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("current_url");
        Ok(state.url())
    }

    async fn title(&mut self) -> Result<String, DriverError> {
        let mut state = self.state();
        state.alive()?;
        Ok(state
            .options
            .title_override
            .clone()
            .unwrap_or_else(|| "Swag Labs".into()))
    }

    async fn find(&mut self, locator: &Locator) -> Result<ElementId, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("find");
        match state.lookup(locator).first() {
            Some(node) => Ok(state.issue(*node)),
            None => Err(DriverError::ElementNotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementId>, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("find_all");
        let nodes = state.lookup(locator);
        Ok(nodes.into_iter().map(|n| state.issue(n)).collect())
    }

    async fn find_within(
        &mut self,
        parent: ElementId,
        locator: &Locator,
    ) -> Result<ElementId, DriverError> {
        let mut state = self.state();
        state.alive()?;
        let parent = state.resolve(parent)?;
        match state.lookup_within(parent, locator) {
            Some(node) => Ok(state.issue(node)),
            None => Err(DriverError::ElementNotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn click(&mut self, element: ElementId) -> Result<(), DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("click");
        let node = state.resolve(element)?;
        if state.options.direct_click_failures > 0 {
            state.options.direct_click_failures -= 1;
            return Err(DriverError::ClickIntercepted {
                id: element.0,
                reason: "other element would receive the click".into(),
            });
        }
        state.activate(node);
        Ok(())
    }

    async fn click_via_script(&mut self, element: ElementId) -> Result<(), DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("click_via_script");
        let node = state.resolve(element)?;
        if state.options.script_click_failures > 0 {
            state.options.script_click_failures -= 1;
            return Err(DriverError::ScriptError("click handler threw".into()));
        }
        state.activate(node);
        Ok(())
    }

    async fn clear(&mut self, element: ElementId) -> Result<(), DriverError> {
        let mut state = self.state();
        state.alive()?;
        match state.resolve(element)? {
            Node::UsernameField => state.username.clear(),
            Node::PasswordField => state.password.clear(),
            _ => {}
        }
        Ok(())
    }

    async fn send_keys(&mut self, element: ElementId, text: &str) -> Result<(), DriverError> {
        let mut state = self.state();
        state.alive()?;
        match state.resolve(element)? {
            Node::UsernameField => state.username.push_str(text),
            Node::PasswordField => state.password.push_str(text),
            _ => {}
        }
        Ok(())
    }

    async fn text(&mut self, element: ElementId) -> Result<String, DriverError> {
        let mut state = self.state();
        state.alive()?;
        let detail_index = match state.page() {
            Page::Detail(i) => i,
            _ => 0,
        };
        let text = match state.resolve(element)? {
            Node::ErrorBanner => state.error.clone().unwrap_or_default(),
            Node::ItemName(i) => PRODUCTS[i].name.to_string(),
            Node::ItemPrice(i) => PRODUCTS[i].price.to_string(),
            Node::DetailName => PRODUCTS[detail_index].name.to_string(),
            Node::DetailPrice => state
                .options
                .detail_price_override
                .clone()
                .unwrap_or_else(|| PRODUCTS[detail_index].price.to_string()),
            Node::LoginButton => "Login".into(),
            Node::ItemButton(_) => "Add to cart".into(),
            Node::BackButton => "Back to products".into(),
            _ => String::new(),
        };
        Ok(text)
    }

    async fn attribute(
        &mut self,
        element: ElementId,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let mut state = self.state();
        state.alive()?;
        Ok(match (state.resolve(element)?, name) {
            (Node::ItemImage(i), "src") => {
                Some(format!("/static/media/{}.jpg", PRODUCTS[i].key))
            }
            _ => None,
        })
    }

    async fn is_displayed(&mut self, element: ElementId) -> Result<bool, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.resolve(element).map(|_| true)
    }

    async fn is_enabled(&mut self, element: ElementId) -> Result<bool, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.resolve(element).map(|_| true)
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("screenshot");
        if state.options.screenshot_fails {
            return Err(DriverError::Other("screenshot: renderer crashed".into()));
        }
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    async fn execute_script(&mut self, script: &str) -> Result<Value, DriverError> {
        self.state().alive()?;
        Ok(match script {
            "return document.readyState" => json!("complete"),
            "return navigator.userAgent" => json!("FakeShop/1.0"),
            _ => Value::Null,
        })
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        let mut state = self.state();
        state.alive()?;
        Ok(format!("<html><body data-url=\"{}\"></body></html>", state.url()))
    }

    async fn maximize_window(&mut self) -> Result<(), DriverError> {
        self.state().alive()
    }

    async fn set_implicit_wait(&mut self, timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.state();
        state.alive()?;
        if state.options.implicit_wait_fails {
            return Err(DriverError::Other("timeouts: invalid argument".into()));
        }
        state.implicit_wait = Some(timeout);
        Ok(())
    }

    async fn window_count(&mut self) -> Result<usize, DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.count("window_count");
        Ok(state.windows)
    }

    async fn switch_to_window(&mut self, index: usize) -> Result<(), DriverError> {
        let mut state = self.state();
        state.alive()?;
        if index >= state.windows {
            return Err(DriverError::NoSuchWindow);
        }
        state.current_window = index;
        Ok(())
    }

    async fn close_window(&mut self) -> Result<(), DriverError> {
        let mut state = self.state();
        state.alive()?;
        state.windows = state.windows.saturating_sub(1);
        state.current_window = 0;
        Ok(())
    }
}

/// Hands out `FakeShop`s built from one set of options and keeps a handle
/// to each so tests can inspect them afterwards.
#[derive(Clone, Default)]
pub struct FakeFactory {
    pub options: ShopOptions,
    pub created: Arc<Mutex<Vec<FakeShop>>>,
}

impl FakeFactory {
    pub fn new(options: ShopOptions) -> Self {
        Self {
            options,
            created: Arc::default(),
        }
    }

    pub fn shops(&self) -> Vec<FakeShop> {
        self.created.lock().unwrap().clone()
    }
}

impl DriverFactory for FakeFactory {
    fn create(&self, _config: &SuiteConfig) -> Box<dyn Driver> {
        let shop = FakeShop::with_options(self.options.clone());
        self.created.lock().unwrap().push(shop.clone());
        Box::new(shop)
    }
}

/// Defaults with screenshots going to `dir` and short settle pauses.
pub fn test_config(dir: &std::path::Path) -> SuiteConfig {
    let mut config = SuiteConfig::default();
    config.execution.screenshot_dir = dir.to_path_buf();
    config
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
