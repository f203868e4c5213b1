//! In-memory storefront that answers `Driver` commands the way the real site
//! would, so flows can run without a browser.

use std::collections::{HashMap, HashSet};

use checkout_flow::browser::driver::{Driver, Locator};
use checkout_flow::browser::error::SessionError;
use regex::Regex;

pub const BASE_URL: &str = "http://shop.test";
pub const LOGIN_URL: &str = "http://shop.test/login";
pub const VALID_EMAIL: &str = "john@example.com";
pub const VALID_PASSWORD: &str = "password123";
pub const ORDER_NUMBER: &str = "ORD-1001";
pub const PRODUCT_COUNT: usize = 2;

/// Every command the harness issued, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(String),
    Query(String),
    Clear(String),
    Type(String, String),
    Select(String, String),
    Click(String, usize),
    Pause(u64),
}

#[derive(Debug, Clone)]
struct Element {
    key: String,
    tag: &'static str,
    selectors: Vec<&'static str>,
    text: String,
    field: bool,
    hidden: bool,
    /// Key of the enclosing element, for text matching
    inside: Option<&'static str>,
}

impl Element {
    fn new(key: &str, tag: &'static str, selectors: &[&'static str]) -> Self {
        Element {
            key: key.to_string(),
            tag,
            selectors: selectors.to_vec(),
            text: String::new(),
            field: false,
            hidden: false,
            inside: None,
        }
    }

    fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    fn field(mut self) -> Self {
        self.field = true;
        self
    }

    fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    fn inside(mut self, parent: &'static str) -> Self {
        self.inside = Some(parent);
        self
    }
}

pub struct FakeStorefront {
    url: String,
    fields: HashMap<String, String>,
    cart: Vec<usize>,
    orders: usize,
    removed: HashSet<String>,
    pub log: Vec<Command>,
    /// Clicking add-to-cart does nothing
    pub add_to_cart_broken: bool,
    /// The confirmation page renders without an order number
    pub hide_order_id: bool,
    /// The confirmation banner is in the markup but not displayed
    pub hide_success_banner: bool,
    /// Count queries answered with zero before the products listing renders
    pub products_render_after: usize,
    product_queries: usize,
}

impl FakeStorefront {
    pub fn new() -> Self {
        FakeStorefront {
            url: "about:blank".to_string(),
            fields: HashMap::new(),
            cart: Vec::new(),
            orders: 0,
            removed: HashSet::new(),
            log: Vec::new(),
            add_to_cart_broken: false,
            hide_order_id: false,
            hide_success_banner: false,
            products_render_after: 0,
            product_queries: 0,
        }
    }

    /// Drop a selector from the markup, as if the site had been restyled.
    pub fn without_selector(mut self, selector: &str) -> Self {
        self.removed.insert(selector.to_string());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cart(&self) -> &[usize] {
        &self.cart
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn go_to(&mut self, path: &str) {
        self.url = format!("{}{}", BASE_URL, path);
        self.fields.clear();
    }

    pub fn clicks(&self) -> Vec<(String, usize)> {
        self.log
            .iter()
            .filter_map(|c| match c {
                Command::Click(key, nth) => Some((key.clone(), *nth)),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, command: &Command) -> Option<usize> {
        self.log.iter().position(|c| c == command)
    }

    fn path(&self) -> &str {
        self.url.strip_prefix(BASE_URL).unwrap_or("")
    }

    fn render(&mut self) -> Vec<Element> {
        let path = self.path().to_string();
        match path.as_str() {
            "/login" | "/signin" => vec![
                Element::new("login-form", "form", &["form"]),
                Element::new("email", "input", &["#email", "input[name=\"email\"]", "input[type=\"email\"]"])
                    .field(),
                Element::new(
                    "password",
                    "input",
                    &["#password", "input[name=\"password\"]", "input[type=\"password\"]"],
                )
                .field(),
                Element::new("sign-in", "button", &["button.btn-primary", "button[type=\"submit\"]"])
                    .text("Sign In"),
            ],
            "/" => {
                self.product_queries += 1;
                if self.product_queries <= self.products_render_after {
                    return vec![Element::new("heading", "h1", &["h1"]).text("Loading")];
                }
                let mut page = vec![
                    Element::new("heading", "h1", &["h1"]).text("Products"),
                    Element::new("cart-link", "a", &["a[href=\"/cart\"]", "a[href*=\"cart\"]"]).text("Cart"),
                ];
                for _ in 0..PRODUCT_COUNT {
                    page.push(Element::new("product", "div", &[".product-card", "[class*=\"product\"]"]));
                    page.push(
                        Element::new("add-to-cart", "button", &["[data-testid=\"add-to-cart\"]"])
                            .text("Add to Cart"),
                    );
                }
                page
            }
            "/cart" => {
                let mut page: Vec<Element> = self
                    .cart
                    .iter()
                    .map(|_| Element::new("cart-item", "tr", &[".cart-item", "[class*=\"cart-item\"]", "tbody tr"]))
                    .collect();
                page.push(Element::new("total", "span", &[".total"]).text("$10.00"));
                page.push(
                    Element::new("checkout", "button", &["[data-testid=\"checkout\"]"]).text("Proceed to Checkout"),
                );
                page
            }
            "/checkout" => vec![
                Element::new("name", "input", &["input[name=\"name\"]", "input[id*=\"name\"]"]).field(),
                Element::new("pincode", "input", &["input[name=\"pincode\"]", "input[id*=\"pincode\"]"]).field(),
                Element::new("address", "textarea", &["textarea[name=\"address\"]"]).field(),
                Element::new("city", "input", &["input[name=\"city\"]"]).field(),
                Element::new("payment", "select", &["select[name=\"paymentMethod\"]"]).field(),
                Element::new("place-order", "button", &["[data-testid=\"place-order\"]"]).text("Place Order"),
            ],
            "/order-confirmation" => {
                let banner_text = "Order Confirmed! Thank you for shopping.";
                let order_text = format!("  ORD-{}\n", 1000 + self.orders);
                let mut main = Element::new("main", "main", &["main"]).text(banner_text);
                let mut banner = Element::new("banner", "h2", &[]).text(banner_text).inside("main");
                if self.hide_success_banner {
                    banner = banner.hidden();
                }
                let mut page = vec![banner];
                if !self.hide_order_id {
                    main.text.push_str(&order_text);
                    page.push(
                        Element::new("order-id", "span", &["#order-id", "[class*=\"order-id\"]"])
                            .text(&order_text)
                            .inside("main"),
                    );
                }
                page.insert(0, main);
                page
            }
            _ => Vec::new(),
        }
    }

    fn matches(&self, element: &Element, locator: &Locator) -> bool {
        match locator {
            Locator::Css { selector } => {
                !self.removed.contains(selector) && element.selectors.iter().any(|s| s == selector)
            }
            Locator::Text { tag, pattern } => {
                let re = Regex::new(&format!("(?i){}", pattern)).unwrap();
                tag.as_deref().is_none_or(|t| t == element.tag) && re.is_match(&element.text)
            }
        }
    }

    /// Matches in document order. Text locators keep only the innermost
    /// match, the way the browser bridge resolves them.
    fn matching(&mut self, locator: &Locator) -> Vec<Element> {
        let page = self.render();
        let hits: Vec<Element> = page.into_iter().filter(|e| self.matches(e, locator)).collect();
        if !matches!(locator, Locator::Text { .. }) {
            return hits;
        }
        let parents: HashSet<&'static str> = hits.iter().filter_map(|e| e.inside).collect();
        hits.iter()
            .filter(|e| !parents.contains(e.key.as_str()))
            .cloned()
            .collect()
    }

    fn find(&mut self, locator: &Locator, nth: usize) -> Option<Element> {
        self.matching(locator).into_iter().nth(nth)
    }

    fn require(&mut self, command: &str, locator: &Locator, nth: usize) -> Result<Element, SessionError> {
        self.find(locator, nth).ok_or_else(|| SessionError::SessionProtocol {
            command: command.to_string(),
            error: format!("no element {} at index {}", locator, nth),
        })
    }

    fn activate(&mut self, key: &str, nth: usize) {
        match key {
            "sign-in" => {
                let email = self.field("email").unwrap_or_default();
                let password = self.field("password").unwrap_or_default();
                if email == VALID_EMAIL && password == VALID_PASSWORD {
                    self.go_to("/");
                }
            }
            "add-to-cart" if !self.add_to_cart_broken => self.cart.push(nth),
            "cart-link" => self.go_to("/cart"),
            "checkout" if !self.cart.is_empty() => self.go_to("/checkout"),
            "place-order" => {
                self.orders += 1;
                self.cart.clear();
                self.go_to("/order-confirmation");
            }
            _ => {}
        }
    }
}

impl Default for FakeStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for FakeStorefront {
    fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.log.push(Command::Navigate(url.to_string()));
        self.url = url.to_string();
        self.fields.clear();
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self.url.clone())
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, SessionError> {
        self.log.push(Command::Query(locator.to_string()));
        Ok(self.matching(locator).len())
    }

    fn is_visible(&mut self, locator: &Locator, nth: usize) -> Result<bool, SessionError> {
        Ok(self.find(locator, nth).is_some_and(|e| !e.hidden))
    }

    fn text(&mut self, locator: &Locator, nth: usize) -> Result<Option<String>, SessionError> {
        Ok(self.find(locator, nth).map(|e| e.text))
    }

    fn value(&mut self, locator: &Locator, nth: usize) -> Result<Option<String>, SessionError> {
        Ok(self
            .find(locator, nth)
            .filter(|e| e.field)
            .map(|e| self.fields.get(&e.key).cloned().unwrap_or_default()))
    }

    fn clear(&mut self, locator: &Locator, nth: usize) -> Result<(), SessionError> {
        let element = self.require("clear", locator, nth)?;
        self.log.push(Command::Clear(element.key.clone()));
        self.fields.insert(element.key, String::new());
        Ok(())
    }

    fn type_text(&mut self, locator: &Locator, nth: usize, text: &str) -> Result<(), SessionError> {
        let element = self.require("type", locator, nth)?;
        self.log.push(Command::Type(element.key.clone(), text.to_string()));
        self.fields.entry(element.key).or_default().push_str(text);
        Ok(())
    }

    fn select(&mut self, locator: &Locator, nth: usize, value: &str) -> Result<(), SessionError> {
        let element = self.require("select", locator, nth)?;
        self.log.push(Command::Select(element.key.clone(), value.to_string()));
        self.fields.insert(element.key, value.to_string());
        Ok(())
    }

    fn click(&mut self, locator: &Locator, nth: usize) -> Result<(), SessionError> {
        let element = self.require("click", locator, nth)?;
        self.log.push(Command::Click(element.key.clone(), nth));
        self.activate(&element.key, nth);
        Ok(())
    }

    fn pause(&mut self, ms: u64) -> Result<(), SessionError> {
        self.log.push(Command::Pause(ms));
        Ok(())
    }
}
