use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DateWindow, GeoBounds, IndexType, SceneMetadata};

/// Confidence attached to an interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Summary statistics of an index over the queried area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub pixel_count: u64,
    pub valid_pixel_count: u64,
}

/// Human-facing reading of the index statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    /// Health label (`excellent`, `good`, `moderate`, `poor`, `very_poor`, or a
    /// burn-severity label for NBR)
    pub vegetation_health: String,
    pub estimated_biomass_tons_ha: f64,
    pub forest_coverage_percent: f64,
    pub change_trend: String,
    pub confidence_level: ConfidenceLevel,
}

/// Quality flags recorded while computing the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFlags {
    pub cloud_contamination_pct: f64,
    pub shadow_contamination_pct: f64,
    pub atmospheric_correction: String,
    pub data_quality_score: f64,
    /// Set when no scene passed the cloud filter and all imagery was used
    pub cloud_filter_relaxed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub processed_at: DateTime<Utc>,
    pub algorithm: String,
    pub quality_flags: QualityFlags,
}

/// Sensor context for an index result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSummary {
    pub platform: String,
    pub spatial_resolution_m: f64,
    pub bands_used: Vec<String>,
    pub imagery_count: usize,
    pub cloud_filter_pct: f64,
    /// `median` for multi-scene composites, `single_image` otherwise
    pub temporal_compositing: String,
}

/// Result of a vegetation-index query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationIndexResult {
    pub index_type: IndexType,
    pub bounds: GeoBounds,
    pub date_range: DateWindow,
    pub area_hectares: f64,
    pub statistics: IndexStatistics,
    pub interpretation: Interpretation,
    pub scenes_used: Vec<SceneMetadata>,
    pub processing: ProcessingMetadata,
    pub sensor: SensorSummary,
}

impl VegetationIndexResult {
    pub fn mean(&self) -> f64 {
        self.statistics.mean
    }
}
