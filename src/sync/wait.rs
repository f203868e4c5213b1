use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::browser::error::SessionError;

/// Default bound for every polling wait.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 4_000;

/// Default pause between two polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Bounds of a condition-polling wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    pub fn new(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// What a polling wait observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    pub satisfied: bool,
    pub elapsed: Duration,
    pub attempts: u32,
}

/// Poll `predicate` until it holds or `options.timeout_ms` elapses.
///
/// The predicate is always evaluated at least once, so a zero timeout still
/// gives a single check. Driver errors abort the wait immediately; an
/// unsatisfied outcome is returned as `Ok` and the caller decides which
/// failure it is.
pub fn await_condition<F>(mut predicate: F, options: &WaitOptions) -> Result<WaitOutcome, SessionError>
where
    F: FnMut() -> Result<bool, SessionError>,
{
    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;
        if predicate()? {
            return Ok(WaitOutcome {
                satisfied: true,
                elapsed: start.elapsed(),
                attempts,
            });
        }

        let elapsed = start.elapsed();
        if elapsed >= options.timeout() {
            return Ok(WaitOutcome {
                satisfied: false,
                elapsed,
                attempts,
            });
        }

        trace!(attempts, elapsed_ms = elapsed.as_millis() as u64, "condition not met, polling again");
        std::thread::sleep(options.poll_interval().min(options.timeout() - elapsed));
    }
}
