use canopy_core::config::CliConfigOverrides;
use canopy_core::models::{GeoBounds, IndexType};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Canopy - Satellite vegetation monitoring for carbon-offset projects
#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(about = "Satellite vegetation monitoring for carbon-offset projects", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./canopy.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for synthetic imagery
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Provider used when none or an unknown one is named
    #[arg(long, global = true, value_name = "NAME")]
    pub default_provider: Option<String>,

    /// Per sub-query timeout in seconds (0 disables it)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Climate zone for carbon estimates, or "auto"
    #[arg(long, global = true, value_name = "ZONE")]
    pub climate_zone: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            default_provider: self.default_provider.clone(),
            seed: self.seed,
            subquery_timeout_secs: self.timeout_secs,
            climate_zone: self.climate_zone.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a project from its start date to the analysis date
    Analyze(AnalyzeArgs),

    /// List satellite scenes over a project area
    Imagery(ImageryArgs),

    /// Compute one vegetation index over a date range
    Index(IndexArgs),

    /// Derive indices and carbon metrics from an NDVI reading
    Synthesize(SynthesizeArgs),

    /// List registered imagery providers
    Providers,

    /// Show resolved configuration and where each value came from
    Config,
}

/// Project area shared by the imagery commands
#[derive(Args, Debug)]
pub struct AreaArgs {
    /// Bounding box as "min_lon,min_lat,max_lon,max_lat"
    #[arg(long, allow_hyphen_values = true, value_name = "BBOX")]
    pub bounds: GeoBounds,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Project start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Analysis date (defaults to today)
    #[arg(long)]
    pub analysis_date: Option<NaiveDate>,

    /// Providers to try, in order (e.g. "highres,simulated")
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub providers: Option<Vec<String>>,
}

#[derive(Parser, Debug)]
pub struct ImageryArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Provider to query
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Parser, Debug)]
pub struct IndexArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Index to compute (ndvi, evi, savi, msavi, ndwi, nbr, ndmi, gndvi)
    #[arg(long, default_value = "ndvi")]
    pub index: IndexType,

    /// Provider to query
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SynthesizeArgs {
    /// Mean NDVI reading
    #[arg(long, allow_hyphen_values = true)]
    pub ndvi: f64,

    /// Mean EVI reading; estimated from NDVI when omitted
    #[arg(long, allow_hyphen_values = true)]
    pub evi: Option<f64>,

    /// Latitude used to infer the climate zone when none is configured
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,
}
