//! The imagery provider shared by every sensor profile.

use async_trait::async_trait;
use canopy_core::models::{
    ChangeAreaMetrics, ChangeDetectionResult, ChangeQualityAssessment, ConfidenceLevel, DateWindow,
    EnvironmentalImpact, GeoBounds, IndexDeltas, IndexType, Interpretation, ProcessingMetadata,
    QualityFlags, SceneMetadata, SensorSummary, VegetationIndexResult,
};
use canopy_core::ports::{ImageryProvider, ProviderSummary, QueryOptions};
use canopy_core::{CanopyError, Result};
use chrono::{NaiveDate, Utc};
use std::time::Duration;

use crate::catalog::{CatalogClient, LiveCatalog};
use crate::classify::{changed_area, classify, disturbance_severity};
use crate::fallback::{LiveWithSyntheticFallback, SceneSource, SyntheticScenes};
use crate::profile::{vegetation_health, SensorProfile};
use crate::random::SeedSource;
use crate::registry::{HIGHRES, MODERATE, SIMULATED};
use crate::round_to;
use crate::synthetic::SyntheticStrategy;

/// Imagery provider over a scene source
pub struct CatalogProvider<S> {
    name: String,
    source: S,
}

/// Synthetic-only provider that always answers
pub type SimulatedProvider = CatalogProvider<SyntheticScenes>;

/// Provider that queries a live catalog and falls back to synthetic scenes
pub type LiveProvider<L> = CatalogProvider<LiveWithSyntheticFallback<L>>;

/// Live provider backed by the JSON scene-search client
pub type CatalogBackedProvider = LiveProvider<CatalogClient>;

impl SimulatedProvider {
    pub fn new(seed: SeedSource) -> Self {
        let strategy = SyntheticStrategy::new(SIMULATED, SensorProfile::simulated(), seed);
        Self::with_source(SIMULATED, SyntheticScenes::new(strategy))
    }
}

impl<L: LiveCatalog> LiveProvider<L> {
    /// 10 m provider with NDMI as its secondary index
    pub fn high_resolution(live: L, seed: SeedSource) -> Self {
        let strategy = SyntheticStrategy::new(HIGHRES, SensorProfile::high_resolution(), seed);
        Self::with_source(HIGHRES, LiveWithSyntheticFallback::new(live, strategy))
    }

    /// 30 m provider with NBR as its secondary index
    pub fn moderate_resolution(live: L, seed: SeedSource) -> Self {
        let strategy = SyntheticStrategy::new(MODERATE, SensorProfile::moderate_resolution(), seed);
        Self::with_source(MODERATE, LiveWithSyntheticFallback::new(live, strategy))
    }

    /// Bound each live search, retries included, before falling back
    pub fn with_live_deadline(self, deadline: Duration) -> Self {
        Self { name: self.name, source: self.source.with_live_deadline(deadline) }
    }
}

impl<S: SceneSource> CatalogProvider<S> {
    pub fn with_source(name: impl Into<String>, source: S) -> Self {
        Self { name: name.into(), source }
    }

    pub fn profile(&self) -> &SensorProfile {
        self.source.profile()
    }

    fn ensure_supported(&self, index: IndexType) -> Result<()> {
        if self.profile().supports(index) {
            Ok(())
        } else {
            Err(CanopyError::UnsupportedIndex {
                provider: self.name.clone(),
                index: index.to_string(),
            })
        }
    }

    /// Composite one index over the window
    async fn composite(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        index: IndexType,
        options: &QueryOptions,
    ) -> Result<VegetationIndexResult> {
        self.ensure_supported(index)?;
        let available = self.source.scenes(bounds, window, None, None).await?;
        self.composite_scenes(bounds, window, index, options, available)
    }

    /// Composite one index from an already fetched scene list.
    ///
    /// Scenes above the cloud ceiling are dropped; when none remain, every
    /// scene is used and the result is marked low confidence.
    fn composite_scenes(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        index: IndexType,
        options: &QueryOptions,
        available: Vec<SceneMetadata>,
    ) -> Result<VegetationIndexResult> {
        let profile = self.profile();
        if available.is_empty() {
            return Err(CanopyError::NoImageryAvailable {
                provider: self.name.clone(),
                start: window.start(),
                end: window.end(),
            });
        }

        let ceiling = options.max_cloud_cover_pct.unwrap_or(profile.default_max_cloud_pct);
        let clear: Vec<SceneMetadata> =
            available.iter().filter(|scene| scene.is_clear(ceiling)).cloned().collect();
        let (scenes, relaxed) = if clear.is_empty() {
            tracing::warn!(
                provider = %self.name,
                window = %window,
                ceiling,
                "No scenes under the cloud ceiling, using all imagery"
            );
            (available, true)
        } else {
            (clear, false)
        };

        let measurement = self.source.strategy().measure(bounds, window, index, &scenes);
        let mean = measurement.statistics.mean;

        let confidence_level = if relaxed {
            ConfidenceLevel::Low
        } else if scenes.len() >= profile.high_confidence_scenes {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        };

        let cloud_contamination_pct = round_to(
            scenes.iter().map(|scene| scene.cloud_cover_pct).sum::<f64>() / scenes.len() as f64,
            2,
        );
        let processing_level = scenes.first().map(|scene| scene.processing_level.as_str());

        tracing::debug!(
            provider = %self.name,
            index = %index,
            scenes = scenes.len(),
            mean,
            "Composited vegetation index"
        );

        Ok(VegetationIndexResult {
            index_type: index,
            bounds: *bounds,
            date_range: *window,
            area_hectares: round_to(bounds.area_hectares(), 2),
            interpretation: Interpretation {
                vegetation_health: vegetation_health(index, mean).to_string(),
                estimated_biomass_tons_ha: round_to(mean * profile.biomass_factor, 2),
                forest_coverage_percent: round_to((mean * profile.coverage_factor).min(100.0), 1),
                change_trend: "stable".to_string(),
                confidence_level,
            },
            processing: ProcessingMetadata {
                processed_at: Utc::now(),
                algorithm: profile.index_algorithm.to_string(),
                quality_flags: QualityFlags {
                    cloud_contamination_pct,
                    shadow_contamination_pct: measurement.shadow_contamination_pct,
                    atmospheric_correction: profile
                        .atmospheric_correction(processing_level)
                        .to_string(),
                    data_quality_score: measurement.data_quality_score,
                    cloud_filter_relaxed: relaxed,
                },
            },
            sensor: SensorSummary {
                platform: profile.platform.to_string(),
                spatial_resolution_m: profile.resolution_m,
                bands_used: profile.bands_for(index),
                imagery_count: scenes.len(),
                cloud_filter_pct: ceiling,
                temporal_compositing: if scenes.len() > 1 { "median" } else { "single_image" }
                    .to_string(),
            },
            statistics: measurement.statistics,
            scenes_used: scenes,
        })
    }

    /// Mean of `index` over each window's scenes
    fn index_pair(
        &self,
        bounds: &GeoBounds,
        (before, after): (&DateWindow, &DateWindow),
        (before_scenes, after_scenes): (&[SceneMetadata], &[SceneMetadata]),
        index: IndexType,
        options: &QueryOptions,
    ) -> Result<(f64, f64)> {
        let before = self.composite_scenes(bounds, before, index, options, before_scenes.to_vec())?;
        let after = self.composite_scenes(bounds, after, index, options, after_scenes.to_vec())?;
        Ok((before.mean(), after.mean()))
    }
}

#[async_trait]
impl<S: SceneSource> ImageryProvider for CatalogProvider<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> ProviderSummary {
        let profile = self.profile();
        ProviderSummary {
            name: self.name.clone(),
            platform: profile.platform.to_string(),
            resolution_m: profile.resolution_m,
            revisit_days: profile.revisit_days,
            supported_indices: profile.supported_indices(),
            secondary_index: profile.secondary_index,
            live_capable: self.source.live_capable(),
        }
    }

    async fn get_imagery_metadata(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        options: &QueryOptions,
    ) -> Result<Vec<SceneMetadata>> {
        let mut scenes = self
            .source
            .scenes(bounds, window, options.max_cloud_cover_pct, options.limit)
            .await?;

        if let Some(ceiling) = options.max_cloud_cover_pct {
            scenes.retain(|scene| scene.is_clear(ceiling));
        }
        if let Some(limit) = options.limit {
            scenes.truncate(limit);
        }

        tracing::info!(provider = %self.name, window = %window, count = scenes.len(), "Found scenes");
        Ok(scenes)
    }

    async fn get_vegetation_index(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        index: IndexType,
        options: &QueryOptions,
    ) -> Result<VegetationIndexResult> {
        self.composite(bounds, window, index, options).await
    }

    async fn detect_land_cover_change(
        &self,
        bounds: &GeoBounds,
        before: NaiveDate,
        after: NaiveDate,
        options: &QueryOptions,
    ) -> Result<ChangeDetectionResult> {
        let period = DateWindow::new(before, after)?;
        let profile = self.profile();
        let curve = &profile.change;

        let cycle = i64::from(profile.revisit_days.1);
        let before_window = DateWindow::starting_at(before, cycle);
        let after_window = DateWindow::ending_at(after, cycle);

        self.ensure_supported(IndexType::Ndvi)?;
        if let Some(index) = profile.secondary_index {
            self.ensure_supported(index)?;
        }

        // One scene search per window, shared by every index below
        let (before_scenes, after_scenes) = tokio::join!(
            self.source.scenes(bounds, &before_window, None, None),
            self.source.scenes(bounds, &after_window, None, None)
        );
        let (before_scenes, after_scenes) = (before_scenes?, after_scenes?);
        let windows = (&before_window, &after_window);
        let scenes = (before_scenes.as_slice(), after_scenes.as_slice());

        let (before_ndvi, after_ndvi) =
            self.index_pair(bounds, windows, scenes, IndexType::Ndvi, options)?;

        let secondary_change = match profile.secondary_index {
            Some(index) => {
                let (before_value, after_value) =
                    self.index_pair(bounds, windows, scenes, index, options)?;
                Some(after_value - before_value)
            }
            None => None,
        };

        let ndvi_change = after_ndvi - before_ndvi;
        let relative_change_percent =
            if before_ndvi > 0.0 { ndvi_change / before_ndvi * 100.0 } else { 0.0 };
        let days_between = period.days();

        let classification = classify(curve, ndvi_change, secondary_change, days_between);

        let total = bounds.area_hectares();
        let changed = changed_area(curve, total, classification.magnitude).min(total);
        let stable = total - changed;

        let (threshold, above, below) = curve.temporal_consistency;
        let confidence = round_to(classification.confidence, 3);

        tracing::info!(
            provider = %self.name,
            change = %classification.change_type,
            ndvi_change,
            confidence,
            "Classified land-cover change"
        );

        Ok(ChangeDetectionResult {
            bounds: *bounds,
            before_date: before,
            after_date: after,
            days_between,
            area: ChangeAreaMetrics {
                total_area_hectares: round_to(total, 2),
                changed_area_hectares: round_to(changed, 2),
                stable_area_hectares: round_to(stable, 2),
                change_percentage: round_to(changed / total * 100.0, 2),
            },
            primary_change_type: classification.change_type,
            confidence_score: confidence,
            change_significance: if ndvi_change.abs() > curve.significance {
                "significant"
            } else {
                "minor"
            }
            .to_string(),
            deltas: IndexDeltas {
                before_ndvi: round_to(before_ndvi, 4),
                after_ndvi: round_to(after_ndvi, 4),
                ndvi_change: round_to(ndvi_change, 4),
                relative_change_percent: round_to(relative_change_percent, 2),
                secondary_index: profile.secondary_index,
                secondary_change: secondary_change.map(|delta| round_to(delta, 4)),
            },
            environmental_impact: EnvironmentalImpact {
                biomass_change_tons: round_to(changed * ndvi_change * curve.biomass_factor, 2),
                carbon_impact_tons: round_to(changed * ndvi_change * curve.carbon_factor, 2),
                disturbance_severity: disturbance_severity(secondary_change.unwrap_or(ndvi_change))
                    .to_string(),
                ecosystem_health_change: round_to(ndvi_change * 100.0, 1),
            },
            quality: ChangeQualityAssessment {
                temporal_consistency: if days_between > threshold { above } else { below },
                spatial_accuracy: curve.spatial_accuracy,
                overall_confidence: confidence,
                detection_threshold: curve.significance,
            },
            algorithm: profile.change_algorithm.to_string(),
            processed_at: Utc::now(),
        })
    }
}
