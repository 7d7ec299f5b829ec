/// Errors raised by a browser driver.
///
/// Codes follow the W3C WebDriver error names where one exists.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    // ============================================================
    // Navigation Errors
    // ============================================================
    #[error("Navigation failed: {0}")]
    Navigation(String),

    // ============================================================
    // Element Errors
    // ============================================================
    #[error("No element matches {locator}")]
    ElementNotFound { locator: String },

    #[error("Element {id} is stale (removed from DOM)")]
    ElementStale { id: u32 },

    #[error("Element {id} is not interactable: {reason}")]
    ElementNotInteractable { id: u32, reason: String },

    #[error("Click on element {id} was intercepted: {reason}")]
    ClickIntercepted { id: u32, reason: String },

    #[error("Unknown element handle {id}")]
    UnknownElement { id: u32 },

    #[error("Invalid selector: {selector}")]
    SelectorInvalid { selector: String },

    // ============================================================
    // Execution Errors
    // ============================================================
    #[error("Script execution error: {0}")]
    ScriptError(String),

    #[error("No such window")]
    NoSuchWindow,

    #[error("Timeout: {operation}")]
    Timeout { operation: String },

    // ============================================================
    // Session Errors
    // ============================================================
    #[error("Session closed")]
    SessionClosed,

    #[error("Not ready")]
    NotReady,

    #[error("Launch failed: {0}")]
    Launch(String),

    // ============================================================
    // System Errors
    // ============================================================
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl From<std::io::Error> for DriverError {
    fn from(err: std::io::Error) -> Self {
        DriverError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        DriverError::Serialization(err.to_string())
    }
}

impl DriverError {
    /// Stable error code, used in logs and reports.
    pub fn code(&self) -> &'static str {
        match self {
            DriverError::Navigation(_) => "NAVIGATION_ERROR",
            DriverError::ElementNotFound { .. } => "NO_SUCH_ELEMENT",
            DriverError::ElementStale { .. } => "STALE_ELEMENT_REFERENCE",
            DriverError::ElementNotInteractable { .. } => "ELEMENT_NOT_INTERACTABLE",
            DriverError::ClickIntercepted { .. } => "ELEMENT_CLICK_INTERCEPTED",
            DriverError::UnknownElement { .. } => "UNKNOWN_ELEMENT",
            DriverError::SelectorInvalid { .. } => "INVALID_SELECTOR",
            DriverError::ScriptError(_) => "JAVASCRIPT_ERROR",
            DriverError::NoSuchWindow => "NO_SUCH_WINDOW",
            DriverError::Timeout { .. } => "TIMEOUT",
            DriverError::SessionClosed => "INVALID_SESSION_ID",
            DriverError::NotReady => "NOT_READY",
            DriverError::Launch(_) => "SESSION_NOT_CREATED",
            DriverError::Io(_) => "IO_ERROR",
            DriverError::Serialization(_) => "SERIALIZATION_ERROR",
            DriverError::Other(_) => "UNKNOWN_ERROR",
            DriverError::NotSupported(_) => "UNSUPPORTED_OPERATION",
        }
    }

    /// True for errors caused by page timing (rendering, re-rendering,
    /// overlays) that may clear up on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DriverError::ElementNotFound { .. }
                | DriverError::ElementStale { .. }
                | DriverError::ElementNotInteractable { .. }
                | DriverError::ClickIntercepted { .. }
                | DriverError::Timeout { .. }
        )
    }
}
