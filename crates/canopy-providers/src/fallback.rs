//! Scene sources: synthetic, and live with synthetic fallback.

use std::time::Duration;

use async_trait::async_trait;
use canopy_core::models::{sort_by_acquisition, DateWindow, GeoBounds, SceneMetadata};
use canopy_core::{CanopyError, Result};
use serde_json::json;

use crate::catalog::{CatalogRecord, LiveCatalog, SceneQuery};
use crate::profile::SensorProfile;
use crate::synthetic::SyntheticStrategy;

/// Where a provider's scene calendar comes from.
///
/// Statistics always come from the synthetic strategy; only the scene list
/// differs between sources.
#[async_trait]
pub trait SceneSource: Send + Sync {
    fn strategy(&self) -> &SyntheticStrategy;

    /// Whether a live catalog is consulted before synthetic data
    fn live_capable(&self) -> bool;

    /// Scenes for the window, ascending by date. The cloud ceiling and limit
    /// are hints; callers filter again.
    async fn scenes(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        max_cloud_cover_pct: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<SceneMetadata>>;

    fn profile(&self) -> &SensorProfile {
        self.strategy().profile()
    }
}

/// Purely synthetic scenes
pub struct SyntheticScenes {
    strategy: SyntheticStrategy,
}

impl SyntheticScenes {
    pub fn new(strategy: SyntheticStrategy) -> Self {
        Self { strategy }
    }
}

#[async_trait]
impl SceneSource for SyntheticScenes {
    fn strategy(&self) -> &SyntheticStrategy {
        &self.strategy
    }

    fn live_capable(&self) -> bool {
        false
    }

    async fn scenes(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        _max_cloud_cover_pct: Option<f64>,
        _limit: Option<usize>,
    ) -> Result<Vec<SceneMetadata>> {
        Ok(self.strategy.scenes(bounds, window))
    }
}

/// Live catalog first; synthetic scenes from the same profile when the
/// catalog is unavailable.
///
/// Only errors that [`canopy_core::CanopyError::is_recoverable_by_fallback`]
/// accepts trigger the fallback. A search still running at the live deadline
/// counts as a timeout. An empty live answer is returned as is.
pub struct LiveWithSyntheticFallback<L> {
    live: L,
    synthetic: SyntheticStrategy,
    live_deadline: Duration,
}

impl<L: LiveCatalog> LiveWithSyntheticFallback<L> {
    /// Total time a live search may take, retries included
    pub const DEFAULT_LIVE_DEADLINE: Duration = Duration::from_secs(20);

    pub fn new(live: L, synthetic: SyntheticStrategy) -> Self {
        Self { live, synthetic, live_deadline: Self::DEFAULT_LIVE_DEADLINE }
    }

    pub fn with_live_deadline(mut self, deadline: Duration) -> Self {
        self.live_deadline = deadline;
        self
    }

    async fn search_live(&self, query: SceneQuery<'_>) -> Result<Vec<CatalogRecord>> {
        match tokio::time::timeout(self.live_deadline, self.live.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(CanopyError::Timeout {
                provider: self.synthetic.name().to_string(),
                operation: "scene_search".to_string(),
            }),
        }
    }

    fn to_scene(&self, record: CatalogRecord) -> SceneMetadata {
        let profile = self.synthetic.profile();
        let mut metadata = record.extra;
        metadata.insert("source".to_string(), json!("live"));

        SceneMetadata {
            id: record.id,
            acquisition_date: record.acquisition_date,
            platform: record.platform.unwrap_or_else(|| profile.platform.to_string()),
            sensor: profile.sensor.to_string(),
            resolution_m: profile.resolution_m,
            cloud_cover_pct: record.cloud_cover_pct.clamp(0.0, 100.0),
            bands: profile.bands.iter().map(|band| band.to_string()).collect(),
            processing_level: record
                .processing_level
                .unwrap_or_else(|| profile.processing_level.to_string()),
            url: record.href,
            metadata,
        }
    }
}

#[async_trait]
impl<L: LiveCatalog> SceneSource for LiveWithSyntheticFallback<L> {
    fn strategy(&self) -> &SyntheticStrategy {
        &self.synthetic
    }

    fn live_capable(&self) -> bool {
        true
    }

    async fn scenes(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        max_cloud_cover_pct: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<SceneMetadata>> {
        let query = SceneQuery { bounds, window, max_cloud_cover_pct, limit };

        match self.search_live(query).await {
            Ok(records) => {
                let mut scenes: Vec<SceneMetadata> =
                    records.into_iter().map(|record| self.to_scene(record)).collect();
                sort_by_acquisition(&mut scenes);
                Ok(scenes)
            }
            Err(e) if e.is_recoverable_by_fallback() => {
                tracing::warn!(
                    platform = self.synthetic.profile().platform,
                    error = %e,
                    "Live catalog unavailable, using synthetic scenes"
                );
                Ok(self.synthetic.scenes(bounds, window))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeedSource;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    enum StubCatalog {
        Records(Vec<CatalogRecord>),
        Unavailable,
        BadInput,
        Hung,
    }

    #[async_trait]
    impl LiveCatalog for StubCatalog {
        async fn search(&self, _query: SceneQuery<'_>) -> Result<Vec<CatalogRecord>> {
            match self {
                StubCatalog::Records(records) => Ok(records.clone()),
                StubCatalog::Unavailable => Err(CanopyError::ProviderUnavailable {
                    provider: "stub".to_string(),
                    reason: "missing credentials".to_string(),
                }),
                StubCatalog::BadInput => Err(CanopyError::InvalidBounds {
                    reason: "rejected by catalog".to_string(),
                }),
                StubCatalog::Hung => std::future::pending().await,
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, day: u32) -> CatalogRecord {
        CatalogRecord {
            id: id.to_string(),
            acquisition_date: date(2024, 1, day),
            cloud_cover_pct: 4.0,
            href: format!("https://catalog.example/{id}"),
            platform: None,
            processing_level: None,
            extra: BTreeMap::new(),
        }
    }

    fn source(live: StubCatalog) -> LiveWithSyntheticFallback<StubCatalog> {
        let strategy = SyntheticStrategy::new(
            "highres",
            SensorProfile::high_resolution(),
            SeedSource::Seeded(5),
        );
        LiveWithSyntheticFallback::new(live, strategy)
    }

    fn inputs() -> (GeoBounds, DateWindow) {
        (
            GeoBounds::new(-74.0, 4.6, -73.9, 4.7).unwrap(),
            DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_live_success_passes_through_sorted() {
        let (bounds, window) = inputs();
        let source = source(StubCatalog::Records(vec![record("B", 20), record("A", 3)]));

        let scenes = source.scenes(&bounds, &window, None, None).await.unwrap();
        assert_eq!(scenes.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(scenes[0].platform, "Sentinel-2");
        assert_eq!(scenes[0].metadata.get("source"), Some(&json!("live")));
    }

    #[tokio::test]
    async fn test_live_empty_list_is_not_replaced() {
        let (bounds, window) = inputs();
        let source = source(StubCatalog::Records(Vec::new()));
        assert!(source.scenes(&bounds, &window, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_catalog_falls_back_to_synthetic() {
        let (bounds, window) = inputs();
        let source = source(StubCatalog::Unavailable);

        let scenes = source.scenes(&bounds, &window, None, None).await.unwrap();
        assert!(!scenes.is_empty());
        assert_eq!(scenes, source.strategy().scenes(&bounds, &window));
        assert!(scenes.iter().all(|s| s.metadata.get("source") == Some(&json!("synthetic"))));
    }

    #[tokio::test]
    async fn test_input_errors_are_not_masked() {
        let (bounds, window) = inputs();
        let source = source(StubCatalog::BadInput);
        let err = source.scenes(&bounds, &window, None, None).await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_catalog_falls_back_at_deadline() {
        let (bounds, window) = inputs();
        let source = source(StubCatalog::Hung).with_live_deadline(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        let scenes = source.scenes(&bounds, &window, None, None).await.unwrap();

        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(5) && waited < Duration::from_secs(6));
        assert_eq!(scenes, source.strategy().scenes(&bounds, &window));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_catalog_timeout_is_recoverable() {
        let (bounds, window) = inputs();
        let source = source(StubCatalog::Hung);
        let query = SceneQuery {
            bounds: &bounds,
            window: &window,
            max_cloud_cover_pct: None,
            limit: None,
        };

        let err = source.search_live(query).await.unwrap_err();
        assert!(matches!(err, CanopyError::Timeout { ref provider, .. } if provider == "highres"));
        assert!(err.is_recoverable_by_fallback());
    }
}
