use std::fmt;

use serde::{Deserialize, Serialize};

use crate::browser::error::SessionError;

/// How the browser server finds an element on the live page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Locator {
    /// CSS selector, passed to `querySelectorAll` as-is
    Css { selector: String },

    /// Elements whose text content matches `pattern` (case-insensitive regex),
    /// optionally restricted to one tag
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        pattern: String,
    },
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css {
            selector: selector.to_string(),
        }
    }

    pub fn text(tag: Option<&str>, pattern: &str) -> Self {
        Locator::Text {
            tag: tag.map(|t| t.to_string()),
            pattern: pattern.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css { selector } => write!(f, "{}", selector),
            Locator::Text { tag: Some(tag), pattern } => write!(f, "{}:text(/{}/i)", tag, pattern),
            Locator::Text { tag: None, pattern } => write!(f, "text(/{}/i)", pattern),
        }
    }
}

/// Commands the harness needs from a browser automation backend.
///
/// Element commands address the `nth` (0-based) match of a locator. Every call
/// blocks until the backend has settled the command, so callers never observe
/// a half-applied action.
pub trait Driver {
    fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    fn current_url(&mut self) -> Result<String, SessionError>;

    /// Number of live elements matching the locator.
    fn count(&mut self, locator: &Locator) -> Result<usize, SessionError>;

    fn is_visible(&mut self, locator: &Locator, nth: usize) -> Result<bool, SessionError>;

    /// Text content, or `None` if there is no such element.
    fn text(&mut self, locator: &Locator, nth: usize) -> Result<Option<String>, SessionError>;

    /// Current value of a form control, or `None` if there is no such element.
    fn value(&mut self, locator: &Locator, nth: usize) -> Result<Option<String>, SessionError>;

    fn clear(&mut self, locator: &Locator, nth: usize) -> Result<(), SessionError>;

    /// Type into a field. Appends to whatever the field already holds.
    fn type_text(&mut self, locator: &Locator, nth: usize, text: &str) -> Result<(), SessionError>;

    /// Choose an `<option>` of a `<select>` by value.
    fn select(&mut self, locator: &Locator, nth: usize, value: &str) -> Result<(), SessionError>;

    fn click(&mut self, locator: &Locator, nth: usize) -> Result<(), SessionError>;

    /// Let the page run for a fixed time.
    fn pause(&mut self, ms: u64) -> Result<(), SessionError>;
}
