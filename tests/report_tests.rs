use checkout_flow::error::ErrorKind;
use checkout_flow::flow::result::{RunResult, StepFailure, StepRecord};
use checkout_flow::flow::step::FlowState;
use checkout_flow::report::console::format_console_report;
use checkout_flow::report::junit::{escape_xml, generate_junit_xml};
use checkout_flow::report::report_model::SuiteReport;

// ============================================================================
// Helper builders
// ============================================================================

fn passing_result(name: &str) -> RunResult {
    RunResult {
        flow_name: name.to_string(),
        passed: true,
        final_state: FlowState::Confirmed,
        reached: FlowState::Confirmed,
        steps_run: 8,
        order_id: Some("ORD-1001".into()),
        failure: None,
        steps: vec![StepRecord {
            index: 0,
            name: "login".into(),
            reached: FlowState::LoggedIn,
            elapsed_ms: 120,
        }],
        duration_ms: 2_400,
    }
}

fn failing_result(name: &str) -> RunResult {
    RunResult {
        flow_name: name.to_string(),
        passed: false,
        final_state: FlowState::Failed,
        reached: FlowState::ProductAdded,
        steps_run: 4,
        order_id: None,
        failure: Some(StepFailure {
            step_index: 3,
            step_name: "view cart".into(),
            kind: ErrorKind::AssertionFailure,
            message: "assertion failed: cart has at least one item on Cart page".into(),
        }),
        steps: Vec::new(),
        duration_ms: 1_500,
    }
}

fn mixed_suite_report() -> SuiteReport {
    SuiteReport::from_results(
        "fixtures/*.json",
        vec![passing_result("testData"), failing_result("emptyCart")],
    )
}

// ============================================================================
// Suite report counts
// ============================================================================

#[test]
fn suite_report_from_results_counts() {
    let report = mixed_suite_report();
    assert_eq!(report.total, 2);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert!(!report.all_passed());
    assert!(report.duration_ms.is_none());
}

#[test]
fn empty_suite_passes() {
    let report = SuiteReport::from_results("none", Vec::new());
    assert!(report.all_passed());
}

#[test]
fn progress_names_reached_state_and_failing_step() {
    assert_eq!(
        failing_result("x").progress(),
        "reached ProductAdded, failed at step 3 (view cart)"
    );
    assert_eq!(passing_result("x").progress(), "reached Confirmed");
}

// ============================================================================
// Console
// ============================================================================

#[test]
fn console_report_lists_each_flow() {
    let out = format_console_report(&mixed_suite_report().with_duration(3_900));
    assert!(out.starts_with("=== Checkout Suite: fixtures/*.json ==="));
    assert!(out.contains("PASS  testData (8 steps) order ORD-1001"));
    assert!(out.contains("FAIL  emptyCart (4 steps)"));
    assert!(out.contains("[FAIL] Step 3 (view cart): AssertionFailure - assertion failed"));
    assert!(out.contains("reached ProductAdded, failed at step 3 (view cart)"));
    assert!(out.contains("=== Results: 1 passed, 1 failed (2 total) in 3.9s ==="));
}

// ============================================================================
// JUnit
// ============================================================================

#[test]
fn junit_report_marks_failures_with_their_kind() {
    let xml = generate_junit_xml(&mixed_suite_report().with_duration(3_900));
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<testsuite name=\"fixtures/*.json\" tests=\"2\" failures=\"1\" time=\"3.900\">"));
    assert!(xml.contains("<testcase name=\"testData\" classname=\"checkout-flow\" time=\"2.400\" />"));
    assert!(xml.contains("<failure message=\"step 3 (view cart) failed\" type=\"AssertionFailure\">"));
    assert!(xml.contains("reached ProductAdded, failed at step 3 (view cart)</failure>"));
}

#[test]
fn junit_escapes_names() {
    let report = SuiteReport::from_results("a<b>", vec![passing_result("\"quoted\" & co")]);
    let xml = generate_junit_xml(&report);
    assert!(xml.contains("name=\"a&lt;b&gt;\""));
    assert!(xml.contains("name=\"&quot;quoted&quot; &amp; co\""));
    assert_eq!(escape_xml("it's"), "it&apos;s");
}

#[test]
fn run_result_serializes_to_json() {
    let value = serde_json::to_value(failing_result("emptyCart")).unwrap();
    assert_eq!(value["final_state"], "Failed");
    assert_eq!(value["failure"]["kind"], "AssertionFailure");
    assert_eq!(value["failure"]["step_index"], 3);
}
