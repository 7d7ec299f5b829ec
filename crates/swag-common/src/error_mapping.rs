//! Error Mapping
//!
//! Maps raw WebDriver error text to typed `DriverError` variants. WebDriver
//! servers report errors as a W3C error name followed by a free-form message,
//! e.g. `no such element: Unable to locate element: {"method":"css selector"}`.

use crate::error::DriverError;

/// What the failing command was operating on, used to fill in error fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext<'a> {
    pub element: Option<u32>,
    pub locator: Option<&'a str>,
    pub operation: &'a str,
}

impl<'a> ErrorContext<'a> {
    pub fn operation(operation: &'a str) -> Self {
        Self {
            operation,
            ..Default::default()
        }
    }

    pub fn element(operation: &'a str, element: u32) -> Self {
        Self {
            operation,
            element: Some(element),
            locator: None,
        }
    }

    pub fn locator(operation: &'a str, locator: &'a str) -> Self {
        Self {
            operation,
            element: None,
            locator: Some(locator),
        }
    }
}

/// Maps a WebDriver error message to a DriverError.
pub fn map_webdriver_error(message: &str, context: ErrorContext<'_>) -> DriverError {
    let lower = message.to_lowercase();
    let id = context.element.unwrap_or(0);

    if lower.contains("no such element") || lower.contains("unable to locate element") {
        DriverError::ElementNotFound {
            locator: context.locator.unwrap_or("unknown locator").to_string(),
        }
    } else if lower.contains("stale element") {
        DriverError::ElementStale { id }
    } else if lower.contains("element click intercepted") {
        DriverError::ClickIntercepted {
            id,
            reason: message.to_string(),
        }
    } else if lower.contains("element not interactable") {
        DriverError::ElementNotInteractable {
            id,
            reason: message.to_string(),
        }
    } else if lower.contains("invalid selector") {
        DriverError::SelectorInvalid {
            selector: context.locator.unwrap_or_default().to_string(),
        }
    } else if lower.contains("no such window") {
        DriverError::NoSuchWindow
    } else if lower.contains("invalid session id")
        || lower.contains("session deleted")
        || lower.contains("no such session")
        || lower.contains("connection refused")
    {
        DriverError::SessionClosed
    } else if lower.contains("javascript error") {
        DriverError::ScriptError(message.to_string())
    } else if lower.contains("timeout") {
        DriverError::Timeout {
            operation: context.operation.to_string(),
        }
    } else {
        DriverError::Other(format!("{}: {}", context.operation, message))
    }
}

/// Returns a recovery hint for the given error code.
pub fn hint_for_code(code: &str) -> Option<&'static str> {
    match code {
        "NO_SUCH_ELEMENT" => Some("Check the locator or wait for the element to render"),
        "STALE_ELEMENT_REFERENCE" => Some("Re-locate the element after the page re-renders"),
        "ELEMENT_NOT_INTERACTABLE" => Some("Scroll element into view or wait until visible"),
        "ELEMENT_CLICK_INTERCEPTED" => Some("Element is covered; try a script click"),
        "INVALID_SESSION_ID" => Some("The browser session ended; open a new one"),
        "SESSION_NOT_CREATED" => Some("Check that Chrome/Chromium and chromedriver are installed"),
        "TIMEOUT" => Some("Increase timeout or verify condition"),
        "NAVIGATION_ERROR" => Some("Check URL is valid and accessible"),
        _ => None,
    }
}
