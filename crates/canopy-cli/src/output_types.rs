use canopy_core::config::ConfigSource;
use canopy_core::models::{ProviderOutcome, SceneMetadata};
use canopy_core::ports::ProviderSummary;
use serde::Serialize;
use tabled::Tabled;

/// Row of the `providers` table
#[derive(Debug, Serialize, Tabled)]
pub struct ProviderRow {
    #[tabled(rename = "Provider")]
    pub name: String,
    #[tabled(rename = "Platform")]
    pub platform: String,
    #[tabled(rename = "Resolution (m)")]
    pub resolution_m: f64,
    #[tabled(rename = "Revisit (days)")]
    pub revisit: String,
    #[tabled(rename = "Indices")]
    pub indices: String,
    #[tabled(rename = "Live")]
    pub live_capable: bool,
}

impl From<ProviderSummary> for ProviderRow {
    fn from(summary: ProviderSummary) -> Self {
        let (min, max) = summary.revisit_days;
        Self {
            name: summary.name,
            platform: summary.platform,
            resolution_m: summary.resolution_m,
            revisit: format!("{}-{}", min, max),
            indices: summary
                .supported_indices
                .iter()
                .map(|index| index.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            live_capable: summary.live_capable,
        }
    }
}

/// Row of the `imagery` table
#[derive(Debug, Serialize, Tabled)]
pub struct SceneRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Scene")]
    pub id: String,
    #[tabled(rename = "Platform")]
    pub platform: String,
    #[tabled(rename = "Cloud %")]
    pub cloud_cover_pct: f64,
    #[tabled(rename = "Level")]
    pub processing_level: String,
}

impl From<&SceneMetadata> for SceneRow {
    fn from(scene: &SceneMetadata) -> Self {
        Self {
            date: scene.acquisition_date.to_string(),
            id: scene.id.clone(),
            platform: scene.platform.clone(),
            cloud_cover_pct: scene.cloud_cover_pct,
            processing_level: scene.processing_level.clone(),
        }
    }
}

/// Row of the per-provider outcome table in `analyze`
#[derive(Debug, Serialize, Tabled)]
pub struct OutcomeRow {
    #[tabled(rename = "Provider")]
    pub provider: String,
    #[tabled(rename = "Success")]
    pub success: bool,
    #[tabled(rename = "Fields")]
    pub fields: String,
    #[tabled(rename = "Warnings")]
    pub warnings: usize,
}

impl From<&ProviderOutcome> for OutcomeRow {
    fn from(outcome: &ProviderOutcome) -> Self {
        Self {
            provider: outcome.provider.clone(),
            success: outcome.success,
            fields: format!("{}/4", outcome.fields_populated),
            warnings: outcome.warnings.len(),
        }
    }
}

/// Row of the `config` table
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl ConfigRow {
    pub fn new(key: String, value: String, source: ConfigSource) -> Self {
        Self { key, value, source: format!("{:?}", source) }
    }
}
