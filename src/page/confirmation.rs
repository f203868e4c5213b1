use crate::browser::driver::Driver;
use crate::error::FlowError;
use crate::page::page_model::{PageId, PageObject};
use crate::selector::candidate::{Candidate, ElementMap};
use crate::selector::resolver::locate;
use crate::sync::policy::{Condition, SyncPolicy};

pub const SUCCESS_MESSAGE: &str = "success message";
pub const ORDER_ID: &str = "order id";

/// Text of an element, read only when [`DeferredText::resolve`] is called.
#[derive(Debug, Clone)]
pub struct DeferredText {
    elements: ElementMap,
    element: &'static str,
}

impl DeferredText {
    pub fn element(&self) -> &str {
        self.element
    }

    /// Locate the element now and return its trimmed text content.
    pub fn resolve(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<String, FlowError> {
        let handle = locate(driver, &self.elements, self.element, &sync.wait)?;
        Ok(handle
            .text(driver)?
            .map(|t| t.trim().to_string())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct OrderConfirmationPage {
    elements: ElementMap,
}

impl OrderConfirmationPage {
    pub fn new() -> Self {
        let elements = ElementMap::new(PageId::Confirmation)
            .with(
                SUCCESS_MESSAGE,
                vec![Candidate::text(None, "order.*confirmed|thank you|success")],
            )
            .with(
                ORDER_ID,
                vec![
                    Candidate::fuzzy("[class*=\"order-id\"]"),
                    Candidate::exact("#order-id"),
                    Candidate::exact("[data-testid=\"order-id\"]"),
                ],
            );
        OrderConfirmationPage { elements }
    }

    /// The generated order identifier, resolved lazily.
    pub fn order_id(&self) -> DeferredText {
        DeferredText {
            elements: self.elements.clone(),
            element: ORDER_ID,
        }
    }

    pub fn verify_order_id_exists(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        self.assert_that(driver, sync, &Condition::text_not_empty(ORDER_ID), "order id shown")
    }
}

impl Default for OrderConfirmationPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageObject for OrderConfirmationPage {
    fn id(&self) -> PageId {
        PageId::Confirmation
    }

    fn elements(&self) -> &ElementMap {
        &self.elements
    }

    fn defining_conditions(&self) -> Vec<Condition> {
        vec![
            Condition::url_contains("order-confirmation"),
            Condition::visible(SUCCESS_MESSAGE),
        ]
    }
}
