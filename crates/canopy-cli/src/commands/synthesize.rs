//! Synthesize command implementation

use crate::cli::SynthesizeArgs;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use canopy_core::config::LayeredConfig;
use canopy_indices::{ClimateZone, DerivedIndex, VegetationIndexSynthesizer};
use canopy_monitor::MonitorSettings;

pub fn execute(args: SynthesizeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let settings = MonitorSettings::from_config(config).context("Invalid climate zone")?;
    let zone = settings
        .climate_zone
        .unwrap_or_else(|| ClimateZone::from_latitude(args.latitude.unwrap_or(0.0)));

    let synthesis = VegetationIndexSynthesizer::new()
        .synthesize(args.ndvi, args.evi, zone)
        .context("Index synthesis failed")?;

    if output.is_json() {
        return output.result(&synthesis);
    }

    output.section("Index Synthesis");
    output.kv("Climate zone", zone);
    output.kv("NDVI", format!("{:.3}", synthesis.ndvi));
    let evi_note = if synthesis.evi_estimated { " (estimated)" } else { "" };
    output.kv("EVI", format!("{:.3}{}", synthesis.evi, evi_note));

    output.section("Derived Indices");
    for (name, index) in [
        ("SAVI", &synthesis.savi),
        ("MSAVI", &synthesis.msavi),
        ("GNDVI", &synthesis.gndvi),
        ("NBR", &synthesis.nbr),
        ("LAI", &synthesis.lai),
        ("fPAR", &synthesis.fpar),
        ("VCI", &synthesis.vci),
    ] {
        print_index(output, name, index);
    }

    output.section("Carbon");
    output.kv("GPP", format!("{:.2} tCO2/ha/yr", synthesis.gpp.tons_co2_ha_year));
    output.kv("Biomass", format!("{:.1} t/ha", synthesis.carbon.above_ground_biomass_tons_ha));
    output.kv("Carbon stock", format!("{:.1} tC/ha", synthesis.carbon.carbon_stock_tons_c_ha));
    output.kv(
        "Sequestration",
        format!("{:.2} tCO2/ha/yr", synthesis.carbon.sequestration_rate_tons_co2_ha_year),
    );

    output.section("Quality");
    output.kv("Score", format!("{:.0} ({})", synthesis.quality.score, synthesis.quality.level));
    for issue in &synthesis.quality.issues {
        output.warning(issue);
    }

    output.section("Recommendations");
    for recommendation in &synthesis.recommendations {
        output.bullet(recommendation);
    }
    Ok(())
}

fn print_index(output: &OutputWriter, name: &str, index: &DerivedIndex) {
    output.kv(name, format!("{:.3} ({})", index.value, index.interpretation));
}
