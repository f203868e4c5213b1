use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::flow::step::FlowState;

/// A step that completed, with its post-conditions confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub name: String,
    pub reached: FlowState,
    pub elapsed_ms: u64,
}

/// Where and why a journey stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub step_index: usize,
    pub step_name: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Terminal artifact of one flow execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Name of the flow, usually the fixture it was built from
    pub flow_name: String,

    /// Reached `Confirmed` with a non-empty order id
    pub passed: bool,

    /// `Confirmed` or `Failed`
    pub final_state: FlowState,

    /// Last state whose post-conditions held
    pub reached: FlowState,

    /// Number of steps whose action was started
    pub steps_run: usize,

    pub order_id: Option<String>,

    pub failure: Option<StepFailure>,

    pub steps: Vec<StepRecord>,

    pub duration_ms: u64,
}

impl RunResult {
    /// One-line summary, e.g. "reached CartViewed, failed at step 4 (open checkout)".
    pub fn progress(&self) -> String {
        match &self.failure {
            Some(f) => format!(
                "reached {:?}, failed at step {} ({})",
                self.reached, f.step_index, f.step_name
            ),
            None => format!("reached {:?}", self.reached),
        }
    }
}
