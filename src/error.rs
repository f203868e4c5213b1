use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::browser::error::SessionError;
use crate::flow::step::FlowState;
use crate::page::page_model::PageId;

/// Everything that can stop a journey. Any of these raised during a step
/// aborts the whole flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// No ranked candidate resolved to a live element
    #[error("element '{element}' not found on {page} page (tried: {tried})")]
    ElementNotFound {
        page: PageId,
        element: String,
        tried: String,
    },

    /// A polling wait ran out of time
    #[error("timed out after {timeout_ms}ms waiting for {condition}")]
    TimeoutWaitingForCondition { condition: String, timeout_ms: u64 },

    /// Wrong URL or a defining element is missing
    #[error("unexpected state on {page} page: {reason}")]
    UnexpectedPageState { page: PageId, reason: String },

    /// A verification predicate evaluated false
    #[error("assertion failed: {0}")]
    AssertionFailure(String),

    /// A step was handed to the orchestrator in the wrong state
    #[error("step '{step}' expects state {expected:?} but flow is {actual:?}")]
    StepOutOfOrder {
        step: String,
        expected: FlowState,
        actual: FlowState,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Serializable classification of a [`FlowError`], recorded in run results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ElementNotFound,
    TimeoutWaitingForCondition,
    UnexpectedPageState,
    AssertionFailure,
    StepOutOfOrder,
    Driver,
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::ElementNotFound { .. } => ErrorKind::ElementNotFound,
            FlowError::TimeoutWaitingForCondition { .. } => ErrorKind::TimeoutWaitingForCondition,
            FlowError::UnexpectedPageState { .. } => ErrorKind::UnexpectedPageState,
            FlowError::AssertionFailure(_) => ErrorKind::AssertionFailure,
            FlowError::StepOutOfOrder { .. } => ErrorKind::StepOutOfOrder,
            FlowError::Session(_) => ErrorKind::Driver,
        }
    }
}
