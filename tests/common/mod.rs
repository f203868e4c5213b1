#![allow(dead_code)]

pub mod storefront;

use checkout_flow::fixture::fixture_model::Fixture;
use checkout_flow::flow::step::{Flow, JourneyOptions};
use checkout_flow::sync::policy::SyncPolicy;
use checkout_flow::sync::wait::WaitOptions;

use self::storefront::LOGIN_URL;

/// Settle delay used by test journeys; the fake driver never sleeps on it.
pub const TEST_SETTLE_MS: u64 = 5;

/// Short bounds so failing waits finish quickly.
pub fn fast_sync() -> SyncPolicy {
    SyncPolicy::new(WaitOptions::new(50, 1))
}

pub fn journey() -> JourneyOptions {
    JourneyOptions {
        start_url: LOGIN_URL.to_string(),
        product_index: 0,
        add_to_cart_settle_ms: TEST_SETTLE_MS,
    }
}

pub fn sample_flow(fixture: &Fixture) -> Flow {
    Flow::checkout("checkout", fixture, &journey())
}
