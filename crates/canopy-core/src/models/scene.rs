use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata for one satellite acquisition covering the queried area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMetadata {
    /// Provider scene identifier
    pub id: String,

    /// Acquisition date
    pub acquisition_date: NaiveDate,

    /// Platform (e.g. a specific spacecraft of a constellation)
    pub platform: String,

    /// Sensor / instrument name
    pub sensor: String,

    /// Spatial resolution in meters
    pub resolution_m: f64,

    /// Cloud cover percentage in [0, 100]
    pub cloud_cover_pct: f64,

    /// Spectral bands available in the product
    pub bands: Vec<String>,

    /// Processing level of the product
    pub processing_level: String,

    /// Reference to the data product
    pub url: String,

    /// Provider-specific metadata (tile id, orbit, path/row, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl SceneMetadata {
    /// Whether the scene passes a cloud-cover ceiling
    pub fn is_clear(&self, max_cloud_cover_pct: f64) -> bool {
        self.cloud_cover_pct <= max_cloud_cover_pct
    }
}

/// Sort scenes by acquisition date ascending, keeping provider order for ties
pub fn sort_by_acquisition(scenes: &mut [SceneMetadata]) {
    scenes.sort_by_key(|scene| scene.acquisition_date);
}
