use crate::page::cart::CartPage;
use crate::page::checkout::CheckoutPage;
use crate::page::confirmation::OrderConfirmationPage;
use crate::page::login::LoginPage;
use crate::page::page_model::{PageId, PageObject};
use crate::page::products::ProductsPage;

/// One fresh instance of every page object, built per run.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pub login: LoginPage,
    pub products: ProductsPage,
    pub cart: CartPage,
    pub checkout: CheckoutPage,
    pub confirmation: OrderConfirmationPage,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PageId) -> &dyn PageObject {
        match id {
            PageId::Login => &self.login,
            PageId::Products => &self.products,
            PageId::Cart => &self.cart,
            PageId::Checkout => &self.checkout,
            PageId::Confirmation => &self.confirmation,
        }
    }
}
