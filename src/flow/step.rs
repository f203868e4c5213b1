use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fixture::fixture_model::{CheckoutData, Fixture};
use crate::page::page_model::PageId;
use crate::page::confirmation::ORDER_ID;
use crate::page::login::PASSWORD_INPUT;
use crate::page::products::ADD_TO_CART_BUTTON;
use crate::sync::policy::{Condition, Settle};

/// Default fixed delay after add-to-cart, the one action with no observable
/// signal to poll for.
pub const DEFAULT_ADD_TO_CART_SETTLE_MS: u64 = 1_000;

/// Progress of one journey. `Confirmed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    Start,
    LoggedIn,
    ProductsViewed,
    ProductAdded,
    CartViewed,
    CheckoutOpened,
    CheckoutFilled,
    OrderPlaced,
    Confirmed,
    Failed,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Confirmed | FlowState::Failed)
    }
}

/// Page operation a step invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Login { email: String, password: String },
    /// No input; the step only waits and verifies
    Observe,
    AddProductToCart { index: usize },
    GoToCart,
    ProceedToCheckout,
    FillCheckoutForm(CheckoutData),
    PlaceOrder,
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Login { email, .. } => write!(f, "login as {}", email),
            StepAction::Observe => write!(f, "observe"),
            StepAction::AddProductToCart { index } => write!(f, "add product #{} to cart", index),
            StepAction::GoToCart => write!(f, "go to cart"),
            StepAction::ProceedToCheckout => write!(f, "proceed to checkout"),
            StepAction::FillCheckoutForm(form) => {
                write!(f, "fill checkout form for {} ({})", form.name, form.payment_method)
            }
            StepAction::PlaceOrder => write!(f, "place order"),
        }
    }
}

/// Page verification a step requires after its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    LoggedIn,
    ProductsPage,
    ProductAdded,
    CartPage,
    CartHasItems,
    CheckoutPage,
    CheckoutForm(CheckoutData),
    OrderConfirmation,
    OrderIdExists,
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::LoggedIn => write!(f, "verifyLoggedIn"),
            Verification::ProductsPage => write!(f, "verifyProductsPage"),
            Verification::ProductAdded => write!(f, "verifyProductAdded"),
            Verification::CartPage => write!(f, "verifyCartPage"),
            Verification::CartHasItems => write!(f, "verifyCartHasItems"),
            Verification::CheckoutPage => write!(f, "verifyCheckoutPage"),
            Verification::CheckoutForm(_) => write!(f, "verifyCheckoutForm"),
            Verification::OrderConfirmation => write!(f, "verifyOrderConfirmation"),
            Verification::OrderIdExists => write!(f, "verifyOrderIdExists"),
        }
    }
}

/// One transition of the journey, described as data so a flow can be
/// inspected and checked without a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStep {
    pub index: usize,
    pub name: String,
    pub source: PageId,
    pub target: PageId,
    pub from: FlowState,
    pub to: FlowState,
    pub action: StepAction,
    pub settle: Settle,
    pub post_conditions: Vec<Verification>,
}

/// Knobs of the standard checkout journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyOptions {
    pub start_url: String,
    pub product_index: usize,
    pub add_to_cart_settle_ms: u64,
}

impl JourneyOptions {
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            product_index: 0,
            add_to_cart_settle_ms: DEFAULT_ADD_TO_CART_SETTLE_MS,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("flow has no steps")]
    Empty,

    #[error("step {index} is numbered {found}")]
    BadIndex { index: usize, found: usize },

    #[error("step {index} starts from {found:?}, expected {expected:?}")]
    BrokenChain {
        index: usize,
        expected: FlowState,
        found: FlowState,
    },

    #[error("step {index} targets terminal state {state:?} before the last step")]
    EarlyTerminal { index: usize, state: FlowState },

    #[error("flow ends in {0:?} instead of Confirmed")]
    Unfinished(FlowState),
}

/// An ordered, strictly linear journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    pub name: String,
    pub start_url: String,
    pub steps: Vec<FlowStep>,
}

impl Flow {
    /// Login → Products → Cart → Checkout → Confirmation, driven by `fixture`.
    pub fn checkout(name: &str, fixture: &Fixture, options: &JourneyOptions) -> Self {
        use FlowState::*;

        let specs: Vec<(&str, PageId, PageId, FlowState, StepAction, Settle, Vec<Verification>)> = vec![
            (
                "login",
                PageId::Login,
                PageId::Products,
                LoggedIn,
                StepAction::Login {
                    email: fixture.login.email.clone(),
                    password: fixture.login.password.clone(),
                },
                Settle::Until(Condition::absent(PASSWORD_INPUT)),
                vec![Verification::LoggedIn],
            ),
            (
                "view products",
                PageId::Products,
                PageId::Products,
                ProductsViewed,
                StepAction::Observe,
                Settle::Until(Condition::present(ADD_TO_CART_BUTTON)),
                vec![Verification::ProductsPage],
            ),
            (
                "add product",
                PageId::Products,
                PageId::Products,
                ProductAdded,
                StepAction::AddProductToCart {
                    index: options.product_index,
                },
                Settle::Delay {
                    ms: options.add_to_cart_settle_ms,
                },
                vec![Verification::ProductAdded],
            ),
            (
                "view cart",
                PageId::Products,
                PageId::Cart,
                CartViewed,
                StepAction::GoToCart,
                Settle::Until(Condition::url_contains("cart")),
                vec![Verification::CartPage, Verification::CartHasItems],
            ),
            (
                "open checkout",
                PageId::Cart,
                PageId::Checkout,
                CheckoutOpened,
                StepAction::ProceedToCheckout,
                Settle::Until(Condition::url_contains("checkout")),
                vec![Verification::CheckoutPage],
            ),
            (
                "fill checkout",
                PageId::Checkout,
                PageId::Checkout,
                CheckoutFilled,
                StepAction::FillCheckoutForm(fixture.checkout.clone()),
                Settle::Immediate,
                vec![Verification::CheckoutForm(fixture.checkout.clone())],
            ),
            (
                "place order",
                PageId::Checkout,
                PageId::Confirmation,
                OrderPlaced,
                StepAction::PlaceOrder,
                Settle::Until(Condition::url_contains("order-confirmation")),
                vec![Verification::OrderConfirmation],
            ),
            (
                "confirm order",
                PageId::Confirmation,
                PageId::Confirmation,
                Confirmed,
                StepAction::Observe,
                Settle::Until(Condition::present(ORDER_ID)),
                vec![Verification::OrderIdExists],
            ),
        ];

        let mut from = Start;
        let steps = specs
            .into_iter()
            .enumerate()
            .map(|(index, (name, source, target, to, action, settle, post_conditions))| {
                let step = FlowStep {
                    index,
                    name: name.to_string(),
                    source,
                    target,
                    from,
                    to,
                    action,
                    settle,
                    post_conditions,
                };
                from = to;
                step
            })
            .collect();

        Flow {
            name: name.to_string(),
            start_url: options.start_url.clone(),
            steps,
        }
    }

    /// Check the steps form one unbroken chain from `Start` to `Confirmed`.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut state = FlowState::Start;
        for (i, step) in self.steps.iter().enumerate() {
            if step.index != i {
                return Err(PlanError::BadIndex {
                    index: i,
                    found: step.index,
                });
            }
            if step.from != state {
                return Err(PlanError::BrokenChain {
                    index: i,
                    expected: state,
                    found: step.from,
                });
            }
            if step.to.is_terminal() && i + 1 != self.steps.len() {
                return Err(PlanError::EarlyTerminal { index: i, state: step.to });
            }
            state = step.to;
        }
        match state {
            FlowState::Start => Err(PlanError::Empty),
            FlowState::Confirmed => Ok(()),
            other => Err(PlanError::Unfinished(other)),
        }
    }
}
