use std::fmt;

use tracing::debug;

use crate::browser::driver::{Driver, Locator};
use crate::browser::error::SessionError;
use crate::error::FlowError;
use crate::selector::candidate::ElementMap;
use crate::selector::resolver::first_match;
use crate::sync::wait::{WaitOptions, WaitOutcome, await_condition};

/// Observable page state a wait or verification can look for. Element
/// conditions name a semantic element of the page being checked; any of its
/// ranked candidates may satisfy them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    UrlContains(String),
    UrlNotContains(String),
    /// First matching element is visible
    Visible(String),
    /// At least one matching element exists
    Present(String),
    /// No candidate matches. Unknown element names never count as absent.
    Absent(String),
    /// First matching element has non-blank text
    TextNotEmpty(String),
    /// First matching form control holds exactly `expected`
    ValueEquals { element: String, expected: String },
}

impl Condition {
    pub fn url_contains(fragment: &str) -> Self {
        Condition::UrlContains(fragment.to_string())
    }

    pub fn url_not_contains(fragment: &str) -> Self {
        Condition::UrlNotContains(fragment.to_string())
    }

    pub fn visible(element: &str) -> Self {
        Condition::Visible(element.to_string())
    }

    pub fn present(element: &str) -> Self {
        Condition::Present(element.to_string())
    }

    pub fn absent(element: &str) -> Self {
        Condition::Absent(element.to_string())
    }

    pub fn text_not_empty(element: &str) -> Self {
        Condition::TextNotEmpty(element.to_string())
    }

    pub fn value_equals(element: &str, expected: &str) -> Self {
        Condition::ValueEquals {
            element: element.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Evaluate once against the live page.
    pub fn check(&self, driver: &mut dyn Driver, elements: &ElementMap) -> Result<bool, SessionError> {
        match self {
            Condition::UrlContains(fragment) => Ok(driver.current_url()?.contains(fragment.as_str())),
            Condition::UrlNotContains(fragment) => Ok(!driver.current_url()?.contains(fragment.as_str())),
            Condition::Visible(element) => match resolve_once(driver, elements, element)? {
                Some(locator) => driver.is_visible(&locator, 0),
                None => Ok(false),
            },
            Condition::Present(element) => Ok(resolve_once(driver, elements, element)?.is_some()),
            Condition::Absent(element) => match elements.candidates(element) {
                Some(candidates) => Ok(first_match(driver, candidates)?.is_none()),
                None => Ok(false),
            },
            Condition::TextNotEmpty(element) => match resolve_once(driver, elements, element)? {
                Some(locator) => Ok(driver
                    .text(&locator, 0)?
                    .is_some_and(|t| !t.trim().is_empty())),
                None => Ok(false),
            },
            Condition::ValueEquals { element, expected } => {
                match resolve_once(driver, elements, element)? {
                    Some(locator) => Ok(driver.value(&locator, 0)?.as_deref() == Some(expected.as_str())),
                    None => Ok(false),
                }
            }
        }
    }
}

fn resolve_once(
    driver: &mut dyn Driver,
    elements: &ElementMap,
    name: &str,
) -> Result<Option<Locator>, SessionError> {
    match elements.candidates(name) {
        Some(candidates) => Ok(first_match(driver, candidates)?.map(|(locator, _)| locator)),
        None => Ok(None),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::UrlContains(s) => write!(f, "URL containing '{}'", s),
            Condition::UrlNotContains(s) => write!(f, "URL not containing '{}'", s),
            Condition::Visible(e) => write!(f, "'{}' visible", e),
            Condition::Present(e) => write!(f, "'{}' present", e),
            Condition::Absent(e) => write!(f, "'{}' absent", e),
            Condition::TextNotEmpty(e) => write!(f, "'{}' with non-empty text", e),
            Condition::ValueEquals { element, expected } => {
                write!(f, "'{}' holding '{}'", element, expected)
            }
        }
    }
}

/// How a step lets the UI settle after its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settle {
    /// The action is synchronous from the page's point of view
    Immediate,
    /// Fixed delay. Fallback for actions with no observable signal.
    Delay { ms: u64 },
    /// Poll until the condition holds
    Until(Condition),
}

impl fmt::Display for Settle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Settle::Immediate => write!(f, "immediate"),
            Settle::Delay { ms } => write!(f, "delay {}ms", ms),
            Settle::Until(condition) => write!(f, "until {}", condition),
        }
    }
}

/// Decides how long and how to wait before the next assertion may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncPolicy {
    pub wait: WaitOptions,
}

impl SyncPolicy {
    pub fn new(wait: WaitOptions) -> Self {
        Self { wait }
    }

    /// Block until the UI is judged settled after an action.
    pub fn await_stability(
        &self,
        driver: &mut dyn Driver,
        settle: &Settle,
        elements: &ElementMap,
    ) -> Result<(), FlowError> {
        match settle {
            Settle::Immediate => Ok(()),
            Settle::Delay { ms } => {
                debug!(ms, "fixed settle delay");
                driver.pause(*ms)?;
                Ok(())
            }
            Settle::Until(condition) => {
                let outcome = self.poll(driver, condition, elements)?;
                if outcome.satisfied {
                    Ok(())
                } else {
                    Err(FlowError::TimeoutWaitingForCondition {
                        condition: condition.to_string(),
                        timeout_ms: self.wait.timeout_ms,
                    })
                }
            }
        }
    }

    /// Poll a condition within this policy's bounds.
    pub fn poll(
        &self,
        driver: &mut dyn Driver,
        condition: &Condition,
        elements: &ElementMap,
    ) -> Result<WaitOutcome, SessionError> {
        let outcome = await_condition(|| condition.check(driver, elements), &self.wait)?;
        debug!(
            page = %elements.page(),
            condition = %condition,
            satisfied = outcome.satisfied,
            attempts = outcome.attempts,
            "polled condition"
        );
        Ok(outcome)
    }

    /// Poll a condition and turn an unmet outcome into the caller's failure.
    pub fn require<E>(
        &self,
        driver: &mut dyn Driver,
        condition: &Condition,
        elements: &ElementMap,
        on_unmet: E,
    ) -> Result<(), FlowError>
    where
        E: FnOnce(String) -> FlowError,
    {
        if self.poll(driver, condition, elements)?.satisfied {
            Ok(())
        } else {
            Err(on_unmet(format!(
                "expected {} within {}ms",
                condition, self.wait.timeout_ms
            )))
        }
    }
}
