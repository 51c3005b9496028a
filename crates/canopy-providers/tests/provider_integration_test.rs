//! Integration tests for imagery providers and the registry

use std::sync::Arc;

use async_trait::async_trait;
use canopy_core::models::{
    ChangeDetectionResult, ChangeType, DateWindow, GeoBounds, IndexType, SceneMetadata,
    VegetationIndexResult,
};
use canopy_core::ports::{ImageryProvider, ProviderSummary, QueryOptions};
use canopy_core::{CanopyError, Result};
use canopy_providers::{
    CatalogProvider, CatalogRecord, LiveCatalog, ProviderRegistry, SceneQuery, SeedSource,
    SimulatedProvider, HIGHRES, SIMULATED,
};
use chrono::NaiveDate;
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bogota() -> GeoBounds {
    GeoBounds::new(-74.0, 4.6, -73.9, 4.7).unwrap()
}

#[tokio::test]
async fn test_simulated_ndvi_for_one_month() {
    let provider = SimulatedProvider::new(SeedSource::Entropy);
    let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

    let result = provider
        .get_vegetation_index(&bogota(), &window, IndexType::Ndvi, &QueryOptions::default())
        .await
        .unwrap();
    assert!((0.0..=1.0).contains(&result.statistics.mean));
    assert!(result.area_hectares > 0.0);
    assert_eq!(result.index_type, IndexType::Ndvi);

    let scenes = provider
        .get_imagery_metadata(&bogota(), &window, &QueryOptions::default())
        .await
        .unwrap();
    assert!(!scenes.is_empty());
    assert!(scenes.windows(2).all(|w| w[0].acquisition_date <= w[1].acquisition_date));
}

#[tokio::test]
async fn test_every_index_on_simulated() {
    let provider = SimulatedProvider::new(SeedSource::Seeded(42));
    let window = DateWindow::new(date(2024, 3, 1), date(2024, 5, 31)).unwrap();

    for index in IndexType::ALL {
        let result = provider
            .get_vegetation_index(&bogota(), &window, index, &QueryOptions::default())
            .await
            .unwrap();
        let stats = &result.statistics;
        assert!(stats.min <= stats.mean && stats.mean <= stats.max, "{index}");
        assert!(stats.std >= 0.0);
        assert!(stats.valid_pixel_count <= stats.pixel_count);
        assert_eq!(result.sensor.imagery_count, result.scenes_used.len());
    }
}

#[tokio::test]
async fn test_fallback_provider_without_credentials() {
    let registry = ProviderRegistry::from_config(&canopy_core::config::LayeredConfig::with_defaults())
        .unwrap();
    let provider = registry.require(HIGHRES).unwrap();
    let window = DateWindow::new(date(2024, 1, 1), date(2024, 2, 29)).unwrap();

    let scenes = provider
        .get_imagery_metadata(&bogota(), &window, &QueryOptions::default())
        .await
        .unwrap();
    assert!(!scenes.is_empty());
    assert!(scenes.iter().all(|scene| scene.resolution_m == 10.0));
    assert!(provider.summary().live_capable);
}

#[tokio::test]
async fn test_change_detection_on_simulated() {
    let provider = SimulatedProvider::new(SeedSource::Seeded(7));
    let result = provider
        .detect_land_cover_change(
            &bogota(),
            date(2023, 6, 1),
            date(2024, 6, 1),
            &QueryOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.deltas.secondary_index, None);
    assert_eq!(result.deltas.secondary_change, None);
    let expected_change = result.deltas.after_ndvi - result.deltas.before_ndvi;
    assert!((result.deltas.ndvi_change - expected_change).abs() < 1e-3);
    if result.deltas.ndvi_change.abs() < 0.05 {
        assert_eq!(result.primary_change_type, ChangeType::Stable);
    }
}

struct FixedCatalog {
    cloud_cover_pct: f64,
}

#[async_trait]
impl LiveCatalog for FixedCatalog {
    async fn search(&self, query: SceneQuery<'_>) -> Result<Vec<CatalogRecord>> {
        Ok(vec![CatalogRecord {
            id: format!("LIVE_{}", query.window.start()),
            acquisition_date: query.window.midpoint(),
            cloud_cover_pct: self.cloud_cover_pct,
            href: "https://catalog.example/scene".to_string(),
            platform: None,
            processing_level: Some("Level-2A".to_string()),
            extra: Default::default(),
        }])
    }
}

#[tokio::test]
async fn test_live_scenes_flow_into_index_results() {
    let provider = CatalogProvider::high_resolution(
        FixedCatalog { cloud_cover_pct: 3.0 },
        SeedSource::Seeded(1),
    );
    let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

    let result = provider
        .get_vegetation_index(&bogota(), &window, IndexType::Ndvi, &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(result.scenes_used.len(), 1);
    assert_eq!(result.scenes_used[0].id, "LIVE_2024-01-01");
    assert_eq!(result.processing.quality_flags.atmospheric_correction, "applied");
    assert!(!result.processing.quality_flags.cloud_filter_relaxed);
}

/// Provider that always fails, used to exercise registration
struct BrokenProvider;

#[async_trait]
impl ImageryProvider for BrokenProvider {
    fn name(&self) -> &str {
        "broken"
    }

    fn summary(&self) -> ProviderSummary {
        ProviderSummary {
            name: "broken".to_string(),
            platform: "None".to_string(),
            resolution_m: 3.0,
            revisit_days: (1, 1),
            supported_indices: vec![IndexType::Ndvi],
            secondary_index: None,
            live_capable: false,
        }
    }

    async fn get_imagery_metadata(
        &self,
        _bounds: &GeoBounds,
        _window: &DateWindow,
        _options: &QueryOptions,
    ) -> Result<Vec<SceneMetadata>> {
        Err(CanopyError::ProviderUnavailable {
            provider: "broken".to_string(),
            reason: "always fails".to_string(),
        })
    }

    async fn get_vegetation_index(
        &self,
        _bounds: &GeoBounds,
        _window: &DateWindow,
        _index: IndexType,
        _options: &QueryOptions,
    ) -> Result<VegetationIndexResult> {
        Err(CanopyError::ProviderUnavailable {
            provider: "broken".to_string(),
            reason: "always fails".to_string(),
        })
    }

    async fn detect_land_cover_change(
        &self,
        _bounds: &GeoBounds,
        _before: NaiveDate,
        _after: NaiveDate,
        _options: &QueryOptions,
    ) -> Result<ChangeDetectionResult> {
        Err(CanopyError::ProviderUnavailable {
            provider: "broken".to_string(),
            reason: "always fails".to_string(),
        })
    }
}

#[test]
fn test_registered_provider_joins_priority() {
    let mut registry =
        ProviderRegistry::from_config(&canopy_core::config::LayeredConfig::with_defaults()).unwrap();
    assert!(registry.register(Arc::new(BrokenProvider)).is_none());

    // Live-capable first, then other providers, simulated last
    assert_eq!(registry.default_priority(), vec!["highres", "moderate", "broken", SIMULATED]);
    assert!(registry.remove("broken").unwrap().is_some());
    assert!(matches!(registry.require("broken"), Err(CanopyError::UnknownProvider { .. })));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_seeded_index_is_idempotent(
        seed in any::<u64>(),
        start_offset in 0i64..700,
        length in 1i64..120,
        index_pos in 0usize..8,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let provider = SimulatedProvider::new(SeedSource::Seeded(seed));
        let window = DateWindow::starting_at(date(2023, 1, 1) + chrono::Duration::days(start_offset), length);
        let index = IndexType::ALL[index_pos];

        let first = runtime.block_on(provider.get_vegetation_index(&bogota(), &window, index, &QueryOptions::default()));
        let second = runtime.block_on(provider.get_vegetation_index(&bogota(), &window, index, &QueryOptions::default()));

        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(&a.statistics, &b.statistics);
                prop_assert_eq!(a.scenes_used, b.scenes_used);
                prop_assert!((-1.0..=1.0).contains(&a.statistics.mean));
            }
            (Err(CanopyError::NoImageryAvailable { .. }), Err(CanopyError::NoImageryAvailable { .. })) => {}
            (a, b) => prop_assert!(false, "diverging results: {:?} / {:?}", a.is_ok(), b.is_ok()),
        }
    }
}
