//! Imagery command implementation

use super::orchestrator;
use crate::cli::ImageryArgs;
use crate::output::OutputWriter;
use crate::output_types::SceneRow;
use anyhow::{Context, Result};
use canopy_core::config::LayeredConfig;

pub async fn execute(args: ImageryArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let orchestrator = orchestrator(config)?;

    let listing = orchestrator
        .get_imagery(&args.area.bounds, args.start, args.end, args.provider.as_deref())
        .await
        .context("Imagery search failed")?;

    if output.is_json() {
        return output.result(&listing);
    }

    output.section("Imagery");
    output.kv("Provider", &listing.provider);
    output.kv("Bounds", listing.bounds);
    output.kv("Date range", listing.date_range);
    output.kv("Scenes", listing.imagery_count);
    println!();

    let rows: Vec<SceneRow> = listing.scenes.iter().map(SceneRow::from).collect();
    output.table(&rows)
}
