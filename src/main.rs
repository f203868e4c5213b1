use clap::Parser;
use tracing_subscriber::EnvFilter;

use checkout_flow::cli::commands::{cmd_plan, cmd_run};
use checkout_flow::cli::config::{Cli, Commands, build_run_settings, load_config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            fixture,
            base_url,
            format,
            output,
            product_index,
        } => {
            let settings = build_run_settings(
                &config,
                &fixture,
                base_url.as_deref(),
                format.as_deref(),
                output.as_deref(),
                product_index,
            );
            let all_passed = cmd_run(&settings)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Plan { fixture } => {
            cmd_plan(fixture.as_deref(), &config.browser.base_url)?;
        }
    }

    Ok(())
}

/// RUST_LOG wins when set; otherwise -v raises the level step by step.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
