use tracing::info;

use crate::browser::driver::Driver;
use crate::error::FlowError;
use crate::page::page_model::{PageId, PageObject};
use crate::selector::candidate::{Candidate, ElementMap};
use crate::sync::policy::{Condition, SyncPolicy};

pub const ADD_TO_CART_BUTTON: &str = "add to cart button";
pub const PRODUCT_CARD: &str = "product card";
pub const CART_LINK: &str = "cart link";
pub const PAGE_HEADING: &str = "page heading";

#[derive(Debug, Clone)]
pub struct ProductsPage {
    elements: ElementMap,
}

impl ProductsPage {
    pub fn new() -> Self {
        let elements = ElementMap::new(PageId::Products)
            .with(
                ADD_TO_CART_BUTTON,
                vec![
                    Candidate::exact("[data-testid=\"add-to-cart\"]"),
                    Candidate::text(Some("button"), "add to cart"),
                ],
            )
            .with(
                PRODUCT_CARD,
                vec![
                    Candidate::fuzzy(".product-card"),
                    Candidate::fuzzy("[class*=\"product\"]"),
                ],
            )
            .with(
                CART_LINK,
                vec![
                    Candidate::exact("a[href=\"/cart\"]"),
                    Candidate::fuzzy("a[href*=\"cart\"]"),
                ],
            )
            .with(PAGE_HEADING, vec![Candidate::fuzzy("h1"), Candidate::fuzzy("h2")]);
        ProductsPage { elements }
    }

    /// Click the add-to-cart button of the `index`-th product.
    pub fn add_product_to_cart(
        &self,
        driver: &mut dyn Driver,
        sync: &SyncPolicy,
        index: usize,
    ) -> Result<(), FlowError> {
        info!(index, "adding product to cart");
        self.locate(driver, ADD_TO_CART_BUTTON, sync)?
            .nth(index)?
            .click(driver)
    }

    pub fn go_to_cart(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        self.locate(driver, CART_LINK, sync)?.click(driver)
    }

    /// Only checks that the cart link is still on the listing, which already
    /// held before the click. This cannot tell whether the add took effect;
    /// the cart step's `verify_cart_has_items` is what catches a failed add.
    pub fn verify_product_added(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        self.assert_that(driver, sync, &Condition::present(CART_LINK), "cart link after add")
    }
}

impl Default for ProductsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageObject for ProductsPage {
    fn id(&self) -> PageId {
        PageId::Products
    }

    fn elements(&self) -> &ElementMap {
        &self.elements
    }

    fn defining_conditions(&self) -> Vec<Condition> {
        vec![
            Condition::url_not_contains("login"),
            Condition::present(ADD_TO_CART_BUTTON),
        ]
    }
}
