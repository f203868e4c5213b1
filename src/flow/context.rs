use crate::error::FlowError;
use crate::flow::result::{StepFailure, StepRecord};
use crate::flow::step::FlowState;

/// Tracks the execution state of a running flow.
#[derive(Debug, Clone)]
pub struct FlowContext {
    /// Current state; `Failed` once any step fails
    pub state: FlowState,

    /// Last state reached through a confirmed post-condition
    pub reached: FlowState,

    /// Steps whose action was started
    pub steps_run: usize,

    pub history: Vec<StepRecord>,

    pub failure: Option<StepFailure>,
}

impl FlowContext {
    pub fn new() -> Self {
        FlowContext {
            state: FlowState::Start,
            reached: FlowState::Start,
            steps_run: 0,
            history: Vec::new(),
            failure: None,
        }
    }

    /// Mark a step's action as started.
    pub fn begin(&mut self) {
        self.steps_run += 1;
    }

    /// Move to the step's target state.
    pub fn confirm(&mut self, record: StepRecord) {
        self.state = record.reached;
        self.reached = record.reached;
        self.history.push(record);
    }

    /// Enter `Failed`. The first failure wins; later calls are ignored.
    pub fn fail(&mut self, step_index: usize, step_name: &str, error: &FlowError) {
        self.state = FlowState::Failed;
        if self.failure.is_none() {
            self.failure = Some(StepFailure {
                step_index,
                step_name: step_name.to_string(),
                kind: error.kind(),
                message: error.to_string(),
            });
        }
    }
}

impl Default for FlowContext {
    fn default() -> Self {
        Self::new()
    }
}
