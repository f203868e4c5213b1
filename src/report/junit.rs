use crate::report::report_model::SuiteReport;

// ============================================================================
// JUnit XML reporter for CI integration format
// ============================================================================

/// Generate a JUnit XML report for CI systems.
///
/// Each flow becomes one test case; a failed flow carries the error kind as
/// the failure type and the partial progress in its body:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="2" failures="1" time="1.234">
///   <testcase name="testData" classname="checkout-flow" />
///   <testcase name="emptyCart" classname="checkout-flow">
///     <failure message="step 3 (view cart) failed" type="AssertionFailure">...</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &SuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.results {
        let case_time = format!("{:.3}", result.duration_ms as f64 / 1000.0);
        match (&result.failure, result.passed) {
            (None, true) => {
                cases.push_str(&format!(
                    "  <testcase name=\"{}\" classname=\"checkout-flow\" time=\"{}\" />\n",
                    escape_xml(&result.flow_name),
                    case_time
                ));
            }
            (failure, _) => {
                let (message, kind, detail) = match failure {
                    Some(f) => (
                        format!("step {} ({}) failed", f.step_index, f.step_name),
                        format!("{:?}", f.kind),
                        f.message.clone(),
                    ),
                    None => (
                        "flow did not pass".to_string(),
                        "AssertionFailure".to_string(),
                        String::new(),
                    ),
                };
                let body = format!("{}\n{}", detail, result.progress());

                cases.push_str(&format!(
                    "  <testcase name=\"{name}\" classname=\"checkout-flow\" time=\"{time}\">\n    <failure message=\"{message}\" type=\"{kind}\">{body}</failure>\n  </testcase>\n",
                    name = escape_xml(&result.flow_name),
                    time = case_time,
                    message = escape_xml(&message),
                    kind = kind,
                    body = escape_xml(&body),
                ));
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        time = time_attr,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
