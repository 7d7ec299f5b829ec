use serde_json::{Map, Value, json};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use swag_engine::config::BrowserConfig;
use tokio::time::sleep;
use tracing::{info, warn};

/// Common paths where chromedriver might be installed
const CHROMEDRIVER_PATHS: &[&str] = &[
    "/usr/bin/chromedriver",
    "/usr/local/bin/chromedriver",
    "/usr/lib/chromium/chromedriver",
    "/usr/lib/chromium-browser/chromedriver",
    "/snap/bin/chromium.chromedriver",
];

/// Detect if we're in a headless environment (no display server)
pub fn is_headless_environment() -> bool {
    std::env::var("DISPLAY").is_err() && std::env::var("WAYLAND_DISPLAY").is_err()
}

/// Find chromedriver on PATH, then in the usual install locations
pub fn find_chromedriver_binary() -> Option<String> {
    if let Ok(output) = Command::new("which").arg("chromedriver").output()
        && output.status.success()
        && let Ok(path) = String::from_utf8(output.stdout)
    {
        let path = path.trim();
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }

    CHROMEDRIVER_PATHS
        .iter()
        .find(|path| Path::new(path).exists())
        .map(|path| path.to_string())
}

/// Handle to a running chromedriver process; killed on drop.
pub struct ChromeDriverProcess {
    child: Child,
    port: u16,
}

impl ChromeDriverProcess {
    pub fn webdriver_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

impl Drop for ChromeDriverProcess {
    fn drop(&mut self) {
        info!("Shutting down chromedriver process...");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start chromedriver on `port` and wait until its `/status` endpoint answers.
pub async fn launch_chromedriver(port: u16) -> Result<ChromeDriverProcess, String> {
    let driver_path = find_chromedriver_binary().ok_or_else(|| {
        "chromedriver not found. Install chromium-driver (Debian/Ubuntu) or chromedriver \
         and make sure it is on PATH"
            .to_string()
    })?;

    info!("Launching chromedriver from: {}", driver_path);
    let child = Command::new(&driver_path)
        .arg(format!("--port={}", port))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("Failed to launch chromedriver: {}", e))?;
    info!("chromedriver launched with PID: {}", child.id());

    // Killed on drop if it never becomes ready.
    let process = ChromeDriverProcess { child, port };

    let url = format!("http://localhost:{}/status", port);
    let client = reqwest::Client::new();

    for attempt in 1..=30 {
        sleep(Duration::from_millis(200)).await;

        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("chromedriver ready after {} attempts", attempt);
                return Ok(process);
            }
            Ok(_) => {
                warn!(
                    "chromedriver responded but not ready yet (attempt {})",
                    attempt
                );
            }
            Err(_) => {
                if attempt % 5 == 0 {
                    info!("Waiting for chromedriver... (attempt {})", attempt);
                }
            }
        }
    }

    Err("chromedriver did not become ready within timeout".to_string())
}

/// Chrome capabilities built from the browser settings.
///
/// `headless` adds `--headless=new`. The binary location is only passed
/// when that path exists, so a missing Chromium falls back to the default
/// Chrome install.
pub fn chrome_capabilities(browser: &BrowserConfig, headless: bool) -> Map<String, Value> {
    let mut args: Vec<String> = browser.common_args.clone();
    if headless {
        args.push("--headless=new".to_string());
    }
    args.push(format!("--window-size={}", browser.window_size));

    let mut options = Map::new();
    options.insert("args".into(), json!(args));
    options.insert("excludeSwitches".into(), json!(["enable-logging"]));

    match &browser.binary_location {
        Some(binary) if binary.exists() => {
            info!("Binary location: {}", binary.display());
            options.insert("binary".into(), json!(binary.to_string_lossy()));
        }
        Some(binary) => {
            warn!(
                "Browser binary {} not found, using default install",
                binary.display()
            );
        }
        None => {}
    }

    let mut caps = Map::new();
    caps.insert("browserName".into(), json!("chrome"));
    caps.insert("goog:chromeOptions".into(), Value::Object(options));
    caps
}
