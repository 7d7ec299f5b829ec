//! The Swag Labs test suites.

pub mod assertions;
pub mod login;
pub mod products;

pub use assertions::{ErrorExpectation, SoftAssertions, assert_error_contains, assert_error_exact};
pub use login::{LoginScenario, login_scenarios};
pub use products::{ProductScenario, product_scenarios};

use crate::runner::TestCase;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    Login,
    Products,
    All,
}

impl FromStr for SuiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "login" => Ok(SuiteKind::Login),
            "products" | "product" => Ok(SuiteKind::Products),
            "all" => Ok(SuiteKind::All),
            other => Err(format!("unknown suite: {}", other)),
        }
    }
}

/// Cases for `kind`, keeping only those whose name contains `filter`.
pub fn select_cases(kind: SuiteKind, filter: Option<&str>) -> Vec<Box<dyn TestCase>> {
    let mut cases: Vec<Box<dyn TestCase>> = Vec::new();
    if matches!(kind, SuiteKind::Login | SuiteKind::All) {
        cases.extend(
            login_scenarios()
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn TestCase>),
        );
    }
    if matches!(kind, SuiteKind::Products | SuiteKind::All) {
        cases.extend(
            product_scenarios()
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn TestCase>),
        );
    }

    match filter {
        Some(f) => cases.into_iter().filter(|c| c.name().contains(f)).collect(),
        None => cases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swag_common::data::{LOGIN_ERRORS, PRODUCTS, USERS};

    #[test]
    fn test_select_all() {
        let cases = select_cases(SuiteKind::All, None);
        assert_eq!(cases.len(), LOGIN_ERRORS.len() + USERS.len() + PRODUCTS.len());
    }

    #[test]
    fn test_filter_by_name() {
        let cases = select_cases(SuiteKind::All, Some("locked"));
        let names: Vec<String> = cases.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "test_login_modular[locked_out_user]",
                "test_login_modular[user_locked]"
            ]
        );
    }

    #[test]
    fn test_parse_suite_kind() {
        assert_eq!("Login".parse::<SuiteKind>(), Ok(SuiteKind::Login));
        assert_eq!("products".parse::<SuiteKind>(), Ok(SuiteKind::Products));
        assert!("cart".parse::<SuiteKind>().is_err());
    }
}
