//! Providers command implementation

use crate::output::OutputWriter;
use crate::output_types::ProviderRow;
use anyhow::{Context, Result};
use canopy_core::config::LayeredConfig;
use canopy_providers::ProviderRegistry;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let registry = ProviderRegistry::from_config(config).context("Failed to set up imagery providers")?;

    let rows: Vec<ProviderRow> = registry.summaries().into_iter().map(ProviderRow::from).collect();
    if !output.is_json() {
        output.section("Imagery Providers");
    }
    output.table(&rows)?;

    if !output.is_json() {
        output.kv("Default order", registry.default_priority().join(" → "));
    }
    Ok(())
}
