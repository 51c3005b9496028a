//! Analyze command implementation

use super::orchestrator;
use crate::cli::AnalyzeArgs;
use crate::output::OutputWriter;
use crate::output_types::OutcomeRow;
use anyhow::{bail, Context, Result};
use canopy_core::config::LayeredConfig;
use canopy_core::models::{ProjectAnalysisReport, SynthesizedProjectAnalysis};

pub async fn execute(args: AnalyzeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let orchestrator = orchestrator(config)?;

    let report = orchestrator
        .analyze(&args.area.bounds, args.start, args.analysis_date, args.providers.as_deref())
        .await
        .context("Project analysis rejected")?;

    if output.is_json() {
        output.result(&report)?;
    } else {
        print_report(&report, output)?;
    }

    if let Some(error) = &report.error {
        bail!("{}", error);
    }
    Ok(())
}

fn print_report(report: &ProjectAnalysisReport, output: &OutputWriter) -> Result<()> {
    output.section("Project Analysis");
    output.kv("Analysis ID", &report.processing_info.analysis_id);
    output.kv("Bounds", report.project_bounds);
    output.kv(
        "Period",
        format!(
            "{} to {} ({} days)",
            report.analysis_period.project_start,
            report.analysis_period.analysis_date,
            report.analysis_period.monitoring_duration_days
        ),
    );
    output.kv("Quality", report.processing_info.analysis_quality);

    if let Some(analysis) = &report.satellite_analysis {
        print_analysis(analysis, output);
    }

    output.section("Providers");
    let rows: Vec<OutcomeRow> = report.processing_info.outcomes.iter().map(OutcomeRow::from).collect();
    output.table(&rows)?;
    for warning in report.processing_info.outcomes.iter().flat_map(|o| &o.warnings) {
        output.warning(format!("{} {}: {}", warning.provider, warning.operation, warning.message));
    }
    Ok(())
}

fn print_analysis(analysis: &SynthesizedProjectAnalysis, output: &OutputWriter) {
    output.kv("Data source", &analysis.data_source);

    output.section("Area");
    output.kv("Total", format!("{:.2} ha", analysis.area_analysis.total_area_hectares));
    if let Some(changed) = analysis.area_analysis.changed_area_hectares {
        output.kv("Changed", format!("{:.2} ha", changed));
    }

    output.section("Vegetation");
    let vegetation = &analysis.vegetation_monitoring;
    if vegetation.monitoring_available {
        if let Some(baseline) = vegetation.baseline_ndvi {
            output.kv("Baseline NDVI", format!("{:.3}", baseline));
        }
        if let Some(current) = vegetation.current_ndvi {
            output.kv("Current NDVI", format!("{:.3}", current));
        }
        if let Some(trend) = vegetation.vegetation_trend {
            output.kv("Trend", trend);
        }
        if let Some(health) = &vegetation.current_health {
            output.kv("Health", health);
        }
    } else {
        output.info("Vegetation monitoring unavailable");
    }

    output.section("Change Detection");
    let change = &analysis.change_detection;
    match (change.primary_change_type, change.confidence_score) {
        (Some(change_type), Some(confidence)) if change.change_detection_available => {
            output.kv("Change", change_type);
            output.kv("Confidence", format!("{:.2}", confidence));
        }
        _ => output.info("Change detection unavailable"),
    }

    output.section("Carbon");
    let carbon = &analysis.carbon_impact_assessment;
    if let Some(biomass) = carbon.estimated_biomass_tons_ha {
        output.kv("Biomass", format!("{:.1} t/ha", biomass));
    }
    if let Some(potential) = carbon.carbon_sequestration_potential {
        output.kv("Sequestration potential", format!("{:?}", potential));
    }
    if let Some(impact) = carbon.carbon_impact_tons {
        output.kv("Carbon impact", format!("{:.1} t", impact));
    }

    output.section("Recommendations");
    for recommendation in &analysis.monitoring_recommendations {
        output.bullet(recommendation);
    }
}
