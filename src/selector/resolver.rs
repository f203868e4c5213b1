use tracing::debug;

use crate::browser::driver::{Driver, Locator};
use crate::browser::error::SessionError;
use crate::error::FlowError;
use crate::page::page_model::PageId;
use crate::selector::candidate::{Candidate, ElementMap};
use crate::sync::wait::{WaitOptions, await_condition};

/// A resolved element: the candidate locator that matched on the live page,
/// how many elements it matched, and which one commands address.
///
/// Holds no browser state; every command is re-issued through the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    page: PageId,
    element: String,
    locator: Locator,
    count: usize,
    index: usize,
}

impl ElementHandle {
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Number of elements the winning locator matched when resolved.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Address the `index`-th match instead of the first.
    pub fn nth(self, index: usize) -> Result<Self, FlowError> {
        if index >= self.count {
            return Err(FlowError::ElementNotFound {
                page: self.page,
                element: format!("{}[{}]", self.element, index),
                tried: format!("{} ({} matches)", self.locator, self.count),
            });
        }
        Ok(ElementHandle { index, ..self })
    }

    pub fn click(&self, driver: &mut dyn Driver) -> Result<(), FlowError> {
        driver.click(&self.locator, self.index)?;
        Ok(())
    }

    /// Clear the field, then type. Re-entering a field never appends.
    pub fn fill(&self, driver: &mut dyn Driver, text: &str) -> Result<(), FlowError> {
        driver.clear(&self.locator, self.index)?;
        driver.type_text(&self.locator, self.index, text)?;
        Ok(())
    }

    pub fn select(&self, driver: &mut dyn Driver, value: &str) -> Result<(), FlowError> {
        driver.select(&self.locator, self.index, value)?;
        Ok(())
    }

    pub fn text(&self, driver: &mut dyn Driver) -> Result<Option<String>, FlowError> {
        Ok(driver.text(&self.locator, self.index)?)
    }

    pub fn value(&self, driver: &mut dyn Driver) -> Result<Option<String>, FlowError> {
        Ok(driver.value(&self.locator, self.index)?)
    }

    pub fn is_visible(&self, driver: &mut dyn Driver) -> Result<bool, FlowError> {
        Ok(driver.is_visible(&self.locator, self.index)?)
    }
}

/// One pass over the ranked candidates: the first locator with at least one
/// live match, and its match count.
pub fn first_match(
    driver: &mut dyn Driver,
    candidates: &[Candidate],
) -> Result<Option<(Locator, usize)>, SessionError> {
    for candidate in candidates {
        let count = driver.count(&candidate.locator)?;
        if count > 0 {
            return Ok(Some((candidate.locator.clone(), count)));
        }
    }
    Ok(None)
}

/// Resolve a semantic element name of `elements` to a live element.
///
/// Candidates are tried in rank order on every poll attempt until one matches
/// or `wait` runs out.
pub fn locate(
    driver: &mut dyn Driver,
    elements: &ElementMap,
    name: &str,
    wait: &WaitOptions,
) -> Result<ElementHandle, FlowError> {
    let candidates = elements
        .candidates(name)
        .ok_or_else(|| FlowError::ElementNotFound {
            page: elements.page(),
            element: name.to_string(),
            tried: "no candidates registered".into(),
        })?;

    let mut found = None;
    let outcome = await_condition(
        || {
            found = first_match(driver, candidates)?;
            Ok(found.is_some())
        },
        wait,
    )?;

    match found {
        Some((locator, count)) => {
            debug!(
                page = %elements.page(),
                element = name,
                locator = %locator,
                count,
                attempts = outcome.attempts,
                "located element"
            );
            Ok(ElementHandle {
                page: elements.page(),
                element: name.to_string(),
                locator,
                count,
                index: 0,
            })
        }
        None => Err(FlowError::ElementNotFound {
            page: elements.page(),
            element: name.to_string(),
            tried: candidates
                .iter()
                .map(|c| c.locator.to_string())
                .collect::<Vec<_>>()
                .join(" | "),
        }),
    }
}
