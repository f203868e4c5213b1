use crate::report::report_model::SuiteReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Checkout Suite: fixtures/*.json ===
///
/// ✓ PASS  testData (8 steps) order ORD-1001
/// ✗ FAIL  badLogin (1 steps)
///     [FAIL] Step 0 (login): TimeoutWaitingForCondition - timed out after 4000ms ...
///     reached Start, failed at step 0 (login)
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Checkout Suite: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps)",
            marker, result.flow_name, result.steps_run
        ));
        if let Some(ref order_id) = result.order_id {
            out.push_str(&format!(" order {}", order_id));
        }
        out.push('\n');

        if let Some(ref failure) = result.failure {
            out.push_str(&format!(
                "    [FAIL] Step {} ({}): {:?} - {}\n",
                failure.step_index, failure.step_name, failure.kind, failure.message
            ));
            out.push_str(&format!("    {}\n", result.progress()));
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
