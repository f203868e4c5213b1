use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::browser::session::DEFAULT_SERVER_SCRIPT;
use crate::flow::step::DEFAULT_ADD_TO_CART_SETTLE_MS;
use crate::sync::wait::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS, WaitOptions};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "checkout-flow.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "checkout-flow",
    version,
    about = "Browser acceptance test for the storefront checkout journey"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: checkout-flow.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the checkout journey once per matching fixture file
    Run {
        /// Fixture file or glob pattern, e.g. "fixtures/*.json"
        #[arg(long)]
        fixture: String,

        /// Storefront URL the journey starts from
        #[arg(long)]
        base_url: Option<String>,

        /// Output format: console, junit
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Which product's add-to-cart button to click (0-based)
        #[arg(long)]
        product_index: Option<usize>,
    },

    /// Print the journey's steps without launching a browser
    Plan {
        /// Fixture to build the journey from (default: built-in sample data)
        #[arg(long)]
        fixture: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `checkout-flow.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_server_script")]
    pub server_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            server_script: default_server_script(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Fixed delay after add-to-cart
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_ms: DEFAULT_ADD_TO_CART_SETTLE_MS,
        }
    }
}

impl SyncConfig {
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new(self.timeout_ms, self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,

    #[serde(default)]
    pub product_index: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: default_console(),
            output: None,
            product_index: 0,
        }
    }
}

// Serde default helpers
fn default_base_url() -> String { "http://localhost:3000".to_string() }
fn default_server_script() -> String { DEFAULT_SERVER_SCRIPT.to_string() }
fn default_timeout_ms() -> u64 { DEFAULT_WAIT_TIMEOUT_MS }
fn default_poll_interval_ms() -> u64 { DEFAULT_POLL_INTERVAL_MS }
fn default_settle_ms() -> u64 { DEFAULT_ADD_TO_CART_SETTLE_MS }
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing or
/// malformed; a malformed file is reported as a warning.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Run Settings (merge CLI args with config file)
// ============================================================================

/// Fully resolved settings for the `run` subcommand: CLI > config > defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub fixture: String,
    pub base_url: String,
    pub server_script: String,
    pub format: String,
    pub output: Option<String>,
    pub product_index: usize,
    pub wait: WaitOptions,
    pub settle_ms: u64,
}

pub fn build_run_settings(
    config: &AppConfig,
    fixture: &str,
    base_url: Option<&str>,
    format: Option<&str>,
    output: Option<&str>,
    product_index: Option<usize>,
) -> RunSettings {
    RunSettings {
        fixture: fixture.to_string(),
        base_url: base_url.unwrap_or(&config.browser.base_url).to_string(),
        server_script: config.browser.server_script.clone(),
        format: format.unwrap_or(&config.run.format).to_string(),
        output: output.map(str::to_string).or_else(|| config.run.output.clone()),
        product_index: product_index.unwrap_or(config.run.product_index),
        wait: config.sync.wait_options(),
        settle_ms: config.sync.settle_ms,
    }
}
