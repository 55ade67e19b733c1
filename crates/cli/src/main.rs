//! Sensu serverspec events handler
//!
//! Reads a Sensu event from stdin whose check output is a serverspec JSON
//! report and upserts one Sensu event per example through the events API.

mod config;
mod output;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serverspec_lib::{
    init_tracing, pipeline, ApiDispatcher, ConfigOverrides, DispatchReceipt, Event, EventSink,
    HandlerConfig,
};
use tracing::debug;

/// A serverspec JSON handler to use with Sensu
#[derive(Parser)]
#[command(name = "sensu-serverspec-events")]
#[command(author, version, long_about = None)]
#[command(about = "A serverspec JSON handler to use with Sensu")]
pub struct Cli {
    /// Sensu handlers that the new serverspec events will be handled by (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub handlers: Vec<String>,

    /// Sensu namespace that the new serverspec events will be created in [default: default]
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Sensu API token
    #[arg(long, short, env = "SENSU_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Sensu API URL [default: http://127.0.0.1:8080]
    #[arg(long, short)]
    pub url: Option<String>,

    /// Path to a config file (JSON, TOML or YAML)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            handlers: (!self.handlers.is_empty()).then(|| self.handlers.clone()),
            namespace: self.namespace.clone(),
            token: self.token.clone(),
            url: self.url.clone(),
        }
    }
}

/// Prints a confirmation line for every event the API accepted
struct ConfirmingSink<S> {
    inner: S,
}

impl<S: EventSink> EventSink for ConfirmingSink<S> {
    fn send(&mut self, event: &Event) -> serverspec_lib::Result<DispatchReceipt> {
        let receipt = self.inner.send(event)?;
        output::print_success(&format!("sent sensu event to api {}", receipt.url));
        Ok(receipt)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    output::configure_colors();
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<Vec<DispatchReceipt>> {
    let config_path = config::resolve_config_path(cli.config.as_deref());
    if let Some(path) = &config_path {
        debug!(path = %path.display(), "Loading config file");
    }

    let config = HandlerConfig::load(config_path.as_deref())?.with_overrides(cli.overrides());
    if let Err(e) = config.validate() {
        output::print_warning("see --help for configuration options");
        return Err(e.into());
    }
    debug!(config = ?config, "Handler configured");

    let event = Event::from_reader(io::stdin().lock())?;

    let dispatcher = ApiDispatcher::new(&config)?;
    let mut sink = ConfirmingSink { inner: dispatcher };

    let receipts = pipeline::run(&event, &config, &mut sink)?;
    debug!(sent = receipts.len(), "Handler finished");

    Ok(receipts)
}
