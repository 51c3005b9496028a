//! Command implementations

mod analyze;
mod config;
mod imagery;
mod index;
mod providers;
mod synthesize;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use canopy_core::config::LayeredConfig;
use canopy_monitor::MonitoringOrchestrator;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), cli.config_overrides())?;

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &config, &output).await,
        Commands::Imagery(args) => imagery::execute(args, &config, &output).await,
        Commands::Index(args) => index::execute(args, &config, &output).await,
        Commands::Synthesize(args) => synthesize::execute(args, &config, &output),
        Commands::Providers => providers::execute(&config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

fn orchestrator(config: &LayeredConfig) -> Result<MonitoringOrchestrator> {
    MonitoringOrchestrator::from_config(config).context("Failed to set up imagery providers")
}
