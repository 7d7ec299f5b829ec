use crate::runner::CaseFailure;

/// How an observed login error is compared with what a case expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorExpectation {
    /// The banner text, trimmed, equals this string.
    Exact(String),
    /// The banner text contains this fragment.
    Contains(String),
}

impl ErrorExpectation {
    pub fn check(&self, actual: &str) -> Result<(), String> {
        match self {
            ErrorExpectation::Exact(expected) => assert_error_exact(actual, expected),
            ErrorExpectation::Contains(fragment) => assert_error_contains(actual, fragment),
        }
    }
}

pub fn assert_error_exact(actual: &str, expected: &str) -> Result<(), String> {
    if actual.trim() == expected {
        Ok(())
    } else {
        Err(format!("Expected error: '{}', got: '{}'", expected, actual))
    }
}

pub fn assert_error_contains(actual: &str, fragment: &str) -> Result<(), String> {
    if actual.contains(fragment) {
        Ok(())
    } else {
        Err(format!(
            "Expected error containing '{}', got: '{}'",
            fragment, actual
        ))
    }
}

/// Collects failed checks so a case can report all of them at once.
#[derive(Debug, Default)]
pub struct SoftAssertions {
    failures: Vec<String>,
}

impl SoftAssertions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }

    pub fn check(&mut self, condition: bool, message: impl FnOnce() -> String) {
        if !condition {
            self.failures.push(message());
        }
    }

    pub fn check_result(&mut self, result: Result<(), String>) {
        if let Err(message) = result {
            self.failures.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn into_result(self, case: &str) -> Result<(), CaseFailure> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(CaseFailure::new(format!(
                "Test case '{}' failed: {}",
                case,
                self.failures.join("; ")
            )))
        }
    }
}
