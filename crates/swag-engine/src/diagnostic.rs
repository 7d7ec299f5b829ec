//! Screenshot capture for failure reporting.
//!
//! Capture runs inside failure handling and teardown, so it never returns an
//! error: every failure is logged and turned into `None`.

use crate::driver::{Driver, DriverError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

static CAPTURE_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
enum DiagnosticError {
    #[error("could not create screenshot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("browser could not capture a screenshot: {0}")]
    Capture(#[from] DriverError),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("screenshot file not created: {0}")]
    Missing(PathBuf),
}

/// Makes a test name safe to use in a file name.
pub fn sanitize_label(label: &str) -> String {
    label.replace(['[', ']', '/', '\\'], "_")
}

/// `<label>_<tag>_<timestamp>_<pid>-<n>.png`, or without the tag segment
/// when `tag` is empty.
pub fn screenshot_file_name(label: &str, tag: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let unique = format!(
        "{}-{}",
        std::process::id(),
        CAPTURE_COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    let clean = sanitize_label(label);
    if tag.is_empty() {
        format!("{}_{}_{}.png", clean, timestamp, unique)
    } else {
        format!("{}_{}_{}_{}.png", clean, tag, timestamp, unique)
    }
}

/// Saves a screenshot of the current viewport under `dir`.
///
/// `tag` is the result category (`FAIL`, `SETUP_FAIL`, `PASS`, ...).
/// Returns the written path, or `None` if anything went wrong.
pub async fn capture_diagnostic(
    driver: &mut dyn Driver,
    dir: &Path,
    label: &str,
    tag: &str,
) -> Option<PathBuf> {
    match try_capture(driver, dir, label, tag).await {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(label, tag, error = %e, "Could not capture screenshot");
            None
        }
    }
}

async fn try_capture(
    driver: &mut dyn Driver,
    dir: &Path,
    label: &str,
    tag: &str,
) -> Result<PathBuf, DiagnosticError> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        fs::create_dir_all(dir)
            .await
            .map_err(|source| DiagnosticError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        info!(dir = %dir.display(), "Created screenshot directory");
    }

    let path = dir.join(screenshot_file_name(label, tag));
    let png = driver.screenshot().await?;
    fs::write(&path, &png)
        .await
        .map_err(|source| DiagnosticError::Write {
            path: path.clone(),
            source,
        })?;

    let size = fs::metadata(&path)
        .await
        .map(|m| m.len())
        .map_err(|_| DiagnosticError::Missing(path.clone()))?;
    info!(path = %path.display(), bytes = size, "Screenshot saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_parametrized_names() {
        assert_eq!(
            sanitize_label("test_login_modular[locked_out_user]"),
            "test_login_modular_locked_out_user_"
        );
        assert_eq!(sanitize_label("a/b\\c"), "a_b_c");
    }

    #[test]
    fn test_file_name_shape() {
        let name = screenshot_file_name("product_backpack", "PASS");
        assert!(name.starts_with("product_backpack_PASS_"));
        assert!(name.ends_with(".png"));

        let untagged = screenshot_file_name("debug", "");
        assert!(untagged.starts_with("debug_"));
        assert!(!untagged.contains("__"));
    }

    #[test]
    fn test_file_names_do_not_collide() {
        let first = screenshot_file_name("same", "FAIL");
        let second = screenshot_file_name("same", "FAIL");
        assert_ne!(first, second);
    }
}
