use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    ChangeDetectionResult, DateWindow, GeoBounds, IndexType, SceneMetadata,
    VegetationIndexResult,
};

/// Per-call overrides for a provider query
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Cloud-cover ceiling in percent; the provider profile's ceiling when unset
    pub max_cloud_cover_pct: Option<f64>,

    /// Maximum number of scenes returned by a metadata query
    pub limit: Option<usize>,
}

impl QueryOptions {
    pub fn with_max_cloud_cover(mut self, pct: f64) -> Self {
        self.max_cloud_cover_pct = Some(pct);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Static description of a provider, used for selection and listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub name: String,
    pub platform: String,
    pub resolution_m: f64,
    pub revisit_days: (u32, u32),
    pub supported_indices: Vec<IndexType>,
    pub secondary_index: Option<IndexType>,
    /// Whether the provider attempts a live catalog before synthetic data
    pub live_capable: bool,
}

/// Port for satellite imagery providers
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Registry name of the provider
    fn name(&self) -> &str;

    fn summary(&self) -> ProviderSummary;

    /// Scenes covering `bounds` within `window`, ordered by acquisition date.
    ///
    /// An empty list is a valid answer.
    async fn get_imagery_metadata(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        options: &QueryOptions,
    ) -> Result<Vec<SceneMetadata>>;

    /// Index statistics over `bounds` composited from scenes within `window`
    async fn get_vegetation_index(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        index: IndexType,
        options: &QueryOptions,
    ) -> Result<VegetationIndexResult>;

    /// Compare the area around two dates and classify the change
    async fn detect_land_cover_change(
        &self,
        bounds: &GeoBounds,
        before: NaiveDate,
        after: NaiveDate,
        options: &QueryOptions,
    ) -> Result<ChangeDetectionResult>;
}
