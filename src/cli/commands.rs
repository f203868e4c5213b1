use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use tracing::{info, warn};

use crate::browser::driver::Driver;
use crate::browser::session::BrowserSession;
use crate::cli::config::RunSettings;
use crate::fixture::fixture_model::Fixture;
use crate::fixture::loader::{find_fixtures, load_fixture};
use crate::flow::orchestrator::Orchestrator;
use crate::flow::step::{Flow, JourneyOptions};
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::SuiteReport;
use crate::sync::policy::SyncPolicy;

// ============================================================================
// run subcommand
// ============================================================================

/// Run the journey for every matching fixture and return whether all passed.
pub fn cmd_run(settings: &RunSettings) -> anyhow::Result<bool> {
    let fixtures = load_named_fixtures(&settings.fixture)?;

    if fixtures.is_empty() {
        warn!(pattern = %settings.fixture, "no fixture files matched");
        return Ok(false);
    }

    info!(count = fixtures.len(), base_url = %settings.base_url, "running checkout flows");

    let mut session = BrowserSession::launch(&settings.server_script)
        .with_context(|| format!("launching browser via {}", settings.server_script))?;
    let report = run_suite(&mut session, &fixtures, settings);
    session.quit()?;

    let all_passed = report.all_passed();

    let output_content = match settings.format.as_str() {
        "junit" => generate_junit_xml(&report),
        _ => format_console_report(&report),
    };

    match &settings.output {
        Some(path) => std::fs::write(path, &output_content)
            .with_context(|| format!("writing report to {}", path))?,
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

/// Run one fresh flow per fixture, in order, over a single driver.
pub fn run_suite(
    driver: &mut dyn Driver,
    fixtures: &[(String, Fixture)],
    settings: &RunSettings,
) -> SuiteReport {
    let start = Instant::now();
    let options = JourneyOptions {
        start_url: settings.base_url.clone(),
        product_index: settings.product_index,
        add_to_cart_settle_ms: settings.settle_ms,
    };
    let sync = SyncPolicy::new(settings.wait);

    let mut results = Vec::new();
    for (name, fixture) in fixtures {
        let flow = Flow::checkout(name, fixture, &options);
        let result = Orchestrator::new(driver, sync).run(&flow);
        match &result.order_id {
            Some(order_id) => info!(flow = %name, order_id = %order_id, "flow confirmed"),
            None => warn!(flow = %name, progress = %result.progress(), "flow failed"),
        }
        results.push(result);
    }

    SuiteReport::from_results(&settings.fixture, results)
        .with_duration(start.elapsed().as_millis() as u64)
}

/// Resolve a fixture pattern and load every match, named by file stem.
pub fn load_named_fixtures(pattern: &str) -> anyhow::Result<Vec<(String, Fixture)>> {
    find_fixtures(pattern)?
        .into_iter()
        .map(|path| {
            let fixture = load_fixture(&path)?;
            Ok::<_, anyhow::Error>((fixture_name(&path), fixture))
        })
        .collect()
}

fn fixture_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// plan subcommand
// ============================================================================

pub fn cmd_plan(fixture: Option<&str>, base_url: &str) -> anyhow::Result<()> {
    let (name, fixture) = match fixture {
        Some(path) => {
            let path = Path::new(path);
            (fixture_name(path), load_fixture(path)?)
        }
        None => ("sample".to_string(), Fixture::sample()),
    };
    let flow = Flow::checkout(&name, &fixture, &JourneyOptions::new(base_url));
    flow.validate()?;
    print!("{}", format_plan(&flow));
    Ok(())
}

/// Render a flow's steps as a table, one step per block.
pub fn format_plan(flow: &Flow) -> String {
    let mut out = format!("Flow '{}' from {}\n", flow.name, flow.start_url);
    for step in &flow.steps {
        out.push_str(&format!(
            "{:>2}. {:<14} {} -> {}  [{:?} -> {:?}]\n",
            step.index, step.name, step.source, step.target, step.from, step.to
        ));
        out.push_str(&format!("      action: {}\n", step.action));
        out.push_str(&format!("      settle: {}\n", step.settle));
        let checks: Vec<String> = step.post_conditions.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("      verify: {}\n", checks.join(", ")));
    }
    out
}
