//! Index command implementation

use super::orchestrator;
use crate::cli::IndexArgs;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use canopy_core::config::LayeredConfig;
use canopy_core::models::DateWindow;

pub async fn execute(args: IndexArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let window = DateWindow::new(args.start, args.end).context("Invalid date range")?;
    let orchestrator = orchestrator(config)?;

    let report = orchestrator
        .get_vegetation_index(&args.area.bounds, &window, args.index, args.provider.as_deref())
        .await
        .with_context(|| format!("Failed to compute {}", args.index))?;

    if output.is_json() {
        return output.result(&report);
    }

    let result = &report.result;
    let stats = &result.statistics;
    output.section(format!("{} over {}", result.index_type, result.date_range));
    output.kv("Provider", &report.provider);
    output.kv("Area", format!("{:.2} ha", result.area_hectares));
    output.kv("Mean", format!("{:.4}", stats.mean));
    output.kv("Median", format!("{:.4}", stats.median));
    output.kv("Range", format!("{:.4} to {:.4}", stats.min, stats.max));
    output.kv("Std dev", format!("{:.4}", stats.std));
    output.kv("Valid pixels", format!("{}/{}", stats.valid_pixel_count, stats.pixel_count));

    output.section("Interpretation");
    let interpretation = &result.interpretation;
    output.kv("Health", &interpretation.vegetation_health);
    output.kv("Biomass", format!("{:.1} t/ha", interpretation.estimated_biomass_tons_ha));
    output.kv("Forest cover", format!("{:.1}%", interpretation.forest_coverage_percent));
    output.kv("Confidence", format!("{:?}", interpretation.confidence_level));

    output.section("Sensor");
    output.kv("Platform", &result.sensor.platform);
    output.kv("Scenes used", result.sensor.imagery_count);
    output.kv("Compositing", &result.sensor.temporal_compositing);
    if result.processing.quality_flags.cloud_filter_relaxed {
        output.warning("No scene met the cloud-cover ceiling; all scenes were used");
    }
    Ok(())
}
