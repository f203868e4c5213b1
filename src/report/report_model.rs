use serde::{Deserialize, Serialize};

use crate::flow::result::RunResult;

// ============================================================================
// Suite report: aggregates the RunResult of every fixture in a run
// ============================================================================

/// Aggregated report for a batch of journeys.
///
/// Built from a `Vec<RunResult>` via `from_results()`. Consumed by the
/// console and JUnit reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Name of the suite
    pub suite_name: String,

    /// Total number of flows
    pub total: usize,

    /// Number of flows that reached Confirmed
    pub passed: usize,

    /// Number of failed flows
    pub failed: usize,

    /// Total execution duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Individual flow results
    pub results: Vec<RunResult>,
}

impl SuiteReport {
    /// Build a suite report from a list of flow results.
    pub fn from_results(suite_name: &str, results: Vec<RunResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            suite_name: suite_name.to_string(),
            total,
            passed,
            failed,
            duration_ms: None,
            results,
        }
    }

    /// Set the total execution duration.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether every flow in the suite passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
