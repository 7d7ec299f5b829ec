use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A (strategy, value) pair identifying a DOM element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Id(String),
    Css(String),
    ClassName(String),
    Name(String),
    TagName(String),
    XPath(String),
    LinkText(String),
    /// Link whose visible text contains the value.
    PartialLinkText(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorParseError {
    #[error("Unknown locator strategy: {0}")]
    UnknownStrategy(String),
    #[error("Locator value is empty")]
    EmptyValue,
    #[error("Expected <strategy>=<value>, got: {0}")]
    Malformed(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn tag_name(value: impl Into<String>) -> Self {
        Locator::TagName(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        Locator::LinkText(value.into())
    }

    pub fn partial_link_text(value: impl Into<String>) -> Self {
        Locator::PartialLinkText(value.into())
    }

    /// Builds a locator from a strategy name as written in keyword scripts
    /// (`ID`, `css selector`, `CLASS_NAME`, ...). Matching is case-insensitive
    /// and treats spaces and underscores alike.
    pub fn from_parts(strategy: &str, value: &str) -> Result<Self, LocatorParseError> {
        if value.is_empty() {
            return Err(LocatorParseError::EmptyValue);
        }
        let normalized = strategy.trim().to_lowercase().replace([' ', '-'], "_");
        let value = value.to_string();
        match normalized.as_str() {
            "id" => Ok(Locator::Id(value)),
            "css" | "css_selector" => Ok(Locator::Css(value)),
            "class" | "class_name" => Ok(Locator::ClassName(value)),
            "name" => Ok(Locator::Name(value)),
            "tag" | "tag_name" => Ok(Locator::TagName(value)),
            "xpath" => Ok(Locator::XPath(value)),
            "link" | "link_text" => Ok(Locator::LinkText(value)),
            "partial_link" | "partial_link_text" => Ok(Locator::PartialLinkText(value)),
            _ => Err(LocatorParseError::UnknownStrategy(strategy.to_string())),
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Id(_) => "id",
            Locator::Css(_) => "css",
            Locator::ClassName(_) => "class",
            Locator::Name(_) => "name",
            Locator::TagName(_) => "tag",
            Locator::XPath(_) => "xpath",
            Locator::LinkText(_) => "link",
            Locator::PartialLinkText(_) => "partial_link",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Id(v)
            | Locator::Css(v)
            | Locator::ClassName(v)
            | Locator::Name(v)
            | Locator::TagName(v)
            | Locator::XPath(v)
            | Locator::LinkText(v)
            | Locator::PartialLinkText(v) => v,
        }
    }

    /// CSS selector equivalent for strategies WebDriver has no native
    /// locator for. `None` for id, xpath and the link text strategies.
    pub fn css_equivalent(&self) -> Option<String> {
        match self {
            Locator::Css(v) => Some(v.clone()),
            Locator::ClassName(v) => Some(format!(".{}", v)),
            Locator::Name(v) => Some(format!("[name=\"{}\"]", v.replace('"', "\\\""))),
            Locator::TagName(v) => Some(v.clone()),
            Locator::Id(_)
            | Locator::XPath(_)
            | Locator::LinkText(_)
            | Locator::PartialLinkText(_) => None,
        }
    }

    /// XPath equivalent for partial link text, which has no native
    /// WebDriver locator here.
    pub fn xpath_equivalent(&self) -> Option<String> {
        match self {
            Locator::XPath(v) => Some(v.clone()),
            Locator::PartialLinkText(v) => Some(format!(
                "//a[contains(normalize-space(.), {})]",
                xpath_literal(v)
            )),
            _ => None,
        }
    }
}

/// Quotes `value` as an XPath string literal. XPath 1.0 has no escapes, so
/// text holding both quote kinds is built with `concat()`.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Parses `strategy=value`, the same form `Display` produces.
impl FromStr for Locator {
    type Err = LocatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (strategy, value) = s
            .split_once('=')
            .ok_or_else(|| LocatorParseError::Malformed(s.to_string()))?;
        Locator::from_parts(strategy, value)
    }
}
