use std::fmt;

use serde::{Deserialize, Serialize};

use crate::browser::driver::Driver;
use crate::error::FlowError;
use crate::selector::candidate::ElementMap;
use crate::selector::resolver::{ElementHandle, locate};
use crate::sync::policy::{Condition, SyncPolicy};

/// The screens of the storefront journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageId {
    Login,
    Products,
    Cart,
    Checkout,
    Confirmation,
}

impl PageId {
    pub fn name(&self) -> &'static str {
        match self {
            PageId::Login => "Login",
            PageId::Products => "Products",
            PageId::Cart => "Cart",
            PageId::Checkout => "Checkout",
            PageId::Confirmation => "Order Confirmation",
        }
    }

    /// URL fragment that identifies the page, if it has one. The products
    /// listing is served from the site root and has none.
    pub fn url_fragment(&self) -> Option<&'static str> {
        match self {
            PageId::Login => Some("login"),
            PageId::Products => None,
            PageId::Cart => Some("cart"),
            PageId::Checkout => Some("checkout"),
            PageId::Confirmation => Some("order-confirmation"),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability shared by all page objects.
///
/// A page object is a stateless value: its element map is fixed at
/// construction and every operation acts on the browser through the driver
/// it is handed.
pub trait PageObject {
    fn id(&self) -> PageId;

    fn elements(&self) -> &ElementMap;

    /// URL and element conditions that must hold for the browser to be on
    /// this page.
    fn defining_conditions(&self) -> Vec<Condition>;

    /// `verify<Page>Page`: fails with `UnexpectedPageState` if any defining
    /// condition does not hold within the sync timeout.
    fn verify(&self, driver: &mut dyn Driver, sync: &SyncPolicy) -> Result<(), FlowError> {
        for condition in self.defining_conditions() {
            sync.require(driver, &condition, self.elements(), |reason| {
                FlowError::UnexpectedPageState {
                    page: self.id(),
                    reason,
                }
            })?;
        }
        Ok(())
    }

    fn locate(
        &self,
        driver: &mut dyn Driver,
        name: &str,
        sync: &SyncPolicy,
    ) -> Result<ElementHandle, FlowError> {
        locate(driver, self.elements(), name, &sync.wait)
    }

    /// Post-action invariant; fails with `AssertionFailure`.
    fn assert_that(
        &self,
        driver: &mut dyn Driver,
        sync: &SyncPolicy,
        condition: &Condition,
        what: &str,
    ) -> Result<(), FlowError> {
        sync.require(driver, condition, self.elements(), |reason| {
            FlowError::AssertionFailure(format!("{} on {} page: {}", what, self.id(), reason))
        })
    }
}
