use std::time::Instant;

use tracing::{error, info, info_span};

use crate::browser::driver::Driver;
use crate::error::FlowError;
use crate::flow::context::FlowContext;
use crate::flow::result::{RunResult, StepRecord};
use crate::flow::step::{Flow, FlowState, FlowStep, StepAction, Verification};
use crate::page::page_model::PageObject;
use crate::page::pages::PageSet;
use crate::sync::policy::{Condition, Settle, SyncPolicy};

/// Drives one journey through a browser, one step at a time.
///
/// Holds the only mutable handle to the driver for the whole run. A step's
/// action never starts before the previous step's post-conditions held, and
/// the first error ends the run.
pub struct Orchestrator<'d> {
    driver: &'d mut dyn Driver,
    pages: PageSet,
    sync: SyncPolicy,
    ctx: FlowContext,
}

impl<'d> Orchestrator<'d> {
    pub fn new(driver: &'d mut dyn Driver, sync: SyncPolicy) -> Self {
        Orchestrator {
            driver,
            pages: PageSet::new(),
            sync,
            ctx: FlowContext::new(),
        }
    }

    pub fn state(&self) -> FlowState {
        self.ctx.state
    }

    pub fn context(&self) -> &FlowContext {
        &self.ctx
    }

    /// Open the flow's start URL and verify the first step's source page.
    pub fn enter(&mut self, flow: &Flow) -> Result<(), FlowError> {
        let Some(first) = flow.steps.first() else {
            return Ok(());
        };
        info!(url = %flow.start_url, page = %first.source, "opening start page");
        let result = self
            .driver
            .navigate(&flow.start_url)
            .map_err(FlowError::from)
            .and_then(|()| self.pages.get(first.source).verify(self.driver, &self.sync));
        if let Err(e) = &result {
            self.ctx.fail(first.index, &format!("open {} page", first.source), e);
        }
        result
    }

    /// Run one step: action, then stability wait, then post-conditions. On
    /// success the flow moves to `step.to`; on any error it moves to `Failed`.
    pub fn advance(&mut self, step: &FlowStep) -> Result<FlowState, FlowError> {
        if self.ctx.state.is_terminal() || step.from != self.ctx.state {
            return Err(FlowError::StepOutOfOrder {
                step: step.name.clone(),
                expected: step.from,
                actual: self.ctx.state,
            });
        }

        let _span = info_span!("step", index = step.index, name = %step.name).entered();
        info!(action = %step.action, settle = %step.settle, "running step");

        let started = Instant::now();
        self.ctx.begin();
        match self.execute(step) {
            Ok(()) => {
                self.ctx.confirm(StepRecord {
                    index: step.index,
                    name: step.name.clone(),
                    reached: step.to,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
                info!(state = ?step.to, "step confirmed");
                Ok(step.to)
            }
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "step failed");
                self.ctx.fail(step.index, &step.name, &e);
                Err(e)
            }
        }
    }

    fn execute(&mut self, step: &FlowStep) -> Result<(), FlowError> {
        self.perform(&step.action)?;
        // absence is judged against the page being left
        let settle_page = match &step.settle {
            Settle::Until(Condition::Absent(_)) => step.source,
            _ => step.target,
        };
        self.sync
            .await_stability(self.driver, &step.settle, self.pages.get(settle_page).elements())?;
        for verification in &step.post_conditions {
            self.check(verification)?;
        }
        Ok(())
    }

    fn perform(&mut self, action: &StepAction) -> Result<(), FlowError> {
        let driver = &mut *self.driver;
        let sync = &self.sync;
        let pages = &self.pages;
        match action {
            StepAction::Login { email, password } => pages.login.login(driver, sync, email, password),
            StepAction::Observe => Ok(()),
            StepAction::AddProductToCart { index } => {
                pages.products.add_product_to_cart(driver, sync, *index)
            }
            StepAction::GoToCart => pages.products.go_to_cart(driver, sync),
            StepAction::ProceedToCheckout => pages.cart.proceed_to_checkout(driver, sync),
            StepAction::FillCheckoutForm(form) => pages.checkout.fill_checkout_form(driver, sync, form),
            StepAction::PlaceOrder => pages.checkout.place_order(driver, sync),
        }
    }

    fn check(&mut self, verification: &Verification) -> Result<(), FlowError> {
        let driver = &mut *self.driver;
        let sync = &self.sync;
        let pages = &self.pages;
        match verification {
            Verification::LoggedIn => pages.login.verify_logged_in(driver, sync),
            Verification::ProductsPage => pages.products.verify(driver, sync),
            Verification::ProductAdded => pages.products.verify_product_added(driver, sync),
            Verification::CartPage => pages.cart.verify(driver, sync),
            Verification::CartHasItems => pages.cart.verify_cart_has_items(driver, sync),
            Verification::CheckoutPage => pages.checkout.verify(driver, sync),
            Verification::CheckoutForm(form) => pages.checkout.verify_form(driver, sync, form),
            Verification::OrderConfirmation => pages.confirmation.verify(driver, sync),
            Verification::OrderIdExists => pages.confirmation.verify_order_id_exists(driver, sync),
        }
    }

    /// Execute the whole flow and produce its result. Stops at the first
    /// failing step; nothing after it runs.
    pub fn run(mut self, flow: &Flow) -> RunResult {
        let _span = info_span!("flow", name = %flow.name).entered();
        let started = Instant::now();

        if self.enter(flow).is_err() {
            return self.finish(flow, None, started);
        }

        for step in &flow.steps {
            if self.advance(step).is_err() {
                return self.finish(flow, None, started);
            }
        }

        if self.ctx.state != FlowState::Confirmed {
            let last = flow.steps.len();
            let e = FlowError::AssertionFailure(format!(
                "flow ended in {:?} without reaching Confirmed",
                self.ctx.state
            ));
            self.ctx.fail(last, "end of flow", &e);
            return self.finish(flow, None, started);
        }

        let order_id = match self.pages.confirmation.order_id().resolve(self.driver, &self.sync) {
            Ok(id) if !id.is_empty() => Some(id),
            Ok(_) => {
                let e = FlowError::AssertionFailure("order id is empty".into());
                self.fail_last(flow, &e);
                None
            }
            Err(e) => {
                self.fail_last(flow, &e);
                None
            }
        };

        if let Some(id) = &order_id {
            info!(order_id = %id, "order placed successfully");
        }
        self.finish(flow, order_id, started)
    }

    fn fail_last(&mut self, flow: &Flow, e: &FlowError) {
        let (index, name) = flow
            .steps
            .last()
            .map(|s| (s.index, s.name.as_str()))
            .unwrap_or((0, "order id"));
        error!(error = %e, "could not read order id");
        self.ctx.fail(index, name, e);
    }

    fn finish(self, flow: &Flow, order_id: Option<String>, started: Instant) -> RunResult {
        let ctx = self.ctx;
        let passed = ctx.state == FlowState::Confirmed && order_id.is_some();
        RunResult {
            flow_name: flow.name.clone(),
            passed,
            final_state: ctx.state,
            reached: ctx.reached,
            steps_run: ctx.steps_run,
            order_id,
            failure: ctx.failure,
            steps: ctx.history,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}
