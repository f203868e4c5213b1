use crate::browser::driver::Driver;
use crate::error::FlowError;
use crate::page::page_model::{PageId, PageObject};
use crate::selector::candidate::{Candidate, ElementMap};
use crate::sync::policy::{Condition, SyncPolicy};

pub const CART_ITEM: &str = "cart item";
pub const CHECKOUT_BUTTON: &str = "checkout button";
pub const CART_TOTAL: &str = "cart total";

#[derive(Debug, Clone)]
pub struct CartPage {
    elements: ElementMap,
}

impl CartPage {
    pub fn new() -> Self {
        let elements = ElementMap::new(PageId::Cart)
            .with(
                CART_ITEM,
                vec![
                    Candidate::exact("[data-testid=\"cart-item\"]"),
                    Candidate::fuzzy(".cart-item"),
                    Candidate::fuzzy("[class*=\"cart-item\"]"),
                    // table layouts: body rows only, the header row is not an item
                    Candidate::fuzzy("tbody tr"),
                ],
            )
            .with(
                CHECKOUT_BUTTON,
                vec![
                    Candidate::exact("[data-testid=\"checkout\"]"),
                    Candidate::text(Some("button"), "proceed to checkout"),
                ],
            )
            .with(
                CART_TOTAL,
                vec![Candidate::fuzzy(".total"), Candidate::fuzzy("[class*=\"total\"]")],
            );
        CartPage { elements }
    }

    pub fn proceed_to_checkout(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        let button = self.locate(driver, CHECKOUT_BUTTON, sync)?;
        self.assert_that(driver, sync, &Condition::visible(CHECKOUT_BUTTON), "checkout button visible")?;
        button.click(driver)
    }

    pub fn verify_cart_has_items(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        self.assert_that(driver, sync, &Condition::present(CART_ITEM), "cart has at least one item")
    }
}

impl Default for CartPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageObject for CartPage {
    fn id(&self) -> PageId {
        PageId::Cart
    }

    fn elements(&self) -> &ElementMap {
        &self.elements
    }

    fn defining_conditions(&self) -> Vec<Condition> {
        vec![
            Condition::url_contains("cart"),
            Condition::visible(CHECKOUT_BUTTON),
        ]
    }
}
