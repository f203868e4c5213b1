use tracing::{info, warn};

use crate::browser::driver::Driver;
use crate::error::FlowError;
use crate::fixture::fixture_model::{CheckoutData, PaymentMethod};
use crate::page::page_model::{PageId, PageObject};
use crate::selector::candidate::{Candidate, ElementMap};
use crate::sync::policy::{Condition, SyncPolicy};

pub const NAME_INPUT: &str = "name input";
pub const PINCODE_INPUT: &str = "pincode input";
pub const ADDRESS_INPUT: &str = "address input";
pub const CITY_INPUT: &str = "city input";
pub const PAYMENT_METHOD_SELECT: &str = "payment method select";
pub const PLACE_ORDER_BUTTON: &str = "place order button";

#[derive(Debug, Clone)]
pub struct CheckoutPage {
    elements: ElementMap,
}

impl CheckoutPage {
    pub fn new() -> Self {
        let elements = ElementMap::new(PageId::Checkout)
            .with(
                NAME_INPUT,
                vec![
                    Candidate::exact("input[name=\"name\"]"),
                    Candidate::fuzzy("input[placeholder*=\"name\" i]"),
                    Candidate::fuzzy("input[id*=\"name\"]"),
                ],
            )
            .with(
                PINCODE_INPUT,
                vec![
                    Candidate::exact("input[name=\"pincode\"]"),
                    Candidate::exact("input[name=\"zip\"]"),
                    Candidate::fuzzy("input[placeholder*=\"pincode\" i]"),
                    Candidate::fuzzy("input[id*=\"pincode\"]"),
                ],
            )
            .with(
                ADDRESS_INPUT,
                vec![
                    Candidate::exact("input[name=\"address\"]"),
                    Candidate::exact("textarea[name=\"address\"]"),
                    Candidate::fuzzy("input[placeholder*=\"address\" i]"),
                    Candidate::fuzzy("input[id*=\"address\"]"),
                ],
            )
            .with(
                CITY_INPUT,
                vec![
                    Candidate::exact("input[name=\"city\"]"),
                    Candidate::fuzzy("input[placeholder*=\"city\" i]"),
                    Candidate::fuzzy("input[id*=\"city\"]"),
                ],
            )
            .with(
                PAYMENT_METHOD_SELECT,
                vec![
                    Candidate::exact("select[name=\"paymentMethod\"]"),
                    Candidate::exact("select[name=\"payment\"]"),
                ],
            )
            .with(
                PLACE_ORDER_BUTTON,
                vec![
                    Candidate::exact("[data-testid=\"place-order\"]"),
                    Candidate::text(Some("button"), "place order"),
                ],
            );
        CheckoutPage { elements }
    }

    /// Text fields of the form, in the order they are filled.
    fn text_fields(form: &CheckoutData) -> [(&'static str, &str); 4] {
        [
            (NAME_INPUT, form.name.as_str()),
            (PINCODE_INPUT, form.pincode.as_str()),
            (ADDRESS_INPUT, form.address.as_str()),
            (CITY_INPUT, form.city.as_str()),
        ]
    }

    /// Fill every field, clearing prior content first, and choose the payment
    /// method. Safe to call again with different values.
    pub fn fill_checkout_form(
        &self,
        driver: &mut dyn Driver,
        sync: &SyncPolicy,
        form: &CheckoutData,
    ) -> Result<(), FlowError> {
        info!(name = %form.name, city = %form.city, "filling checkout form");
        for (element, value) in Self::text_fields(form) {
            self.locate(driver, element, sync)?.fill(driver, value)?;
        }
        if let PaymentMethod::Other(method) = &form.payment_method {
            warn!(method = %method, "payment method other than cod; confirmation checks are the cod ones");
        }
        self.locate(driver, PAYMENT_METHOD_SELECT, sync)?
            .select(driver, form.payment_method.as_value())
    }

    /// Every field holds exactly the given value, nothing appended.
    pub fn verify_form(
        &self,
        driver: &mut dyn Driver,
        sync: &SyncPolicy,
        form: &CheckoutData,
    ) -> Result<(), FlowError> {
        let payment = (PAYMENT_METHOD_SELECT, form.payment_method.as_value());
        for (element, value) in Self::text_fields(form).into_iter().chain([payment]) {
            self.assert_that(
                driver,
                sync,
                &Condition::value_equals(element, value),
                "checkout field value",
            )?;
        }
        Ok(())
    }

    pub fn place_order(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        let button = self.locate(driver, PLACE_ORDER_BUTTON, sync)?;
        self.assert_that(driver, sync, &Condition::visible(PLACE_ORDER_BUTTON), "place order button visible")?;
        info!("placing order");
        button.click(driver)
    }
}

impl Default for CheckoutPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageObject for CheckoutPage {
    fn id(&self) -> PageId {
        PageId::Checkout
    }

    fn elements(&self) -> &ElementMap {
        &self.elements
    }

    fn defining_conditions(&self) -> Vec<Condition> {
        vec![
            Condition::url_contains("checkout"),
            Condition::visible(NAME_INPUT),
            Condition::visible(PLACE_ORDER_BUTTON),
        ]
    }
}
