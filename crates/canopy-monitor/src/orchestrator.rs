use std::future::Future;
use std::sync::Arc;

use canopy_core::config::LayeredConfig;
use canopy_core::models::{
    AnalysisPeriod, AnalysisQuality, DateWindow, GeoBounds, IndexType, ProcessingInfo,
    ProjectAnalysisReport, SceneMetadata, VegetationIndexResult,
};
use canopy_core::ports::{ImageryProvider, QueryOptions};
use canopy_core::{CanopyError, Result};
use canopy_indices::{ClimateZone, VegetationIndexSynthesizer};
use canopy_providers::{ProviderRegistry, SIMULATED};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::run::{most_complete, ProviderRun, BASELINE, CHANGE, CURRENT, IMAGERY};
use crate::settings::MonitorSettings;
use crate::synthesis::synthesize_run;

/// Scenes found by one provider for a project window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageryListing {
    pub provider: String,
    pub bounds: GeoBounds,
    pub date_range: DateWindow,
    pub imagery_count: usize,
    pub scenes: Vec<SceneMetadata>,
}

/// Index result tagged with the provider that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexReport {
    pub provider: String,
    pub result: VegetationIndexResult,
}

/// Coordinates providers to produce project-level analyses
pub struct MonitoringOrchestrator {
    registry: ProviderRegistry,
    settings: MonitorSettings,
    synthesizer: VegetationIndexSynthesizer,
}

impl MonitoringOrchestrator {
    pub fn new(registry: ProviderRegistry, settings: MonitorSettings) -> Self {
        Self {
            registry,
            settings,
            synthesizer: VegetationIndexSynthesizer::new(),
        }
    }

    /// Orchestrator over the built-in providers, configured from `config`
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Ok(Self::new(
            ProviderRegistry::from_config(config)?,
            MonitorSettings::from_config(config)?,
        ))
    }

    pub fn with_synthesizer(mut self, synthesizer: VegetationIndexSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn available_providers(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Analyze a project from its start date to `analysis_date` (today when
    /// unset).
    ///
    /// Only caller input errors are returned as `Err`. Provider failures are
    /// reported inside the returned report.
    pub async fn analyze(
        &self,
        bounds: &GeoBounds,
        project_start: NaiveDate,
        analysis_date: Option<NaiveDate>,
        preference: Option<&[String]>,
    ) -> Result<ProjectAnalysisReport> {
        let analysis_date = analysis_date.unwrap_or_else(|| Utc::now().date_naive());
        if project_start >= analysis_date {
            return Err(CanopyError::InvalidAnalysisPeriod { project_start, analysis_date });
        }
        let period = DateWindow::new(project_start, analysis_date)?;

        // Phase 1: provider selection
        let selected = self.registry.select(preference);
        tracing::info!(providers = ?selected, period = %period, "Starting project analysis");

        // Phase 2: per-provider fan-out
        let mut attempted = Vec::new();
        let mut outcomes = Vec::new();
        let mut runs = Vec::new();
        let mut failures = Vec::new();

        for name in &selected {
            let Some(provider) = self.registry.get(name) else {
                continue;
            };
            attempted.push(name.clone());

            let run = self.run_provider(provider, bounds, &period).await;
            outcomes.push(run.outcome());

            if run.is_complete() {
                tracing::info!(provider = %name, "Provider returned a complete analysis");
                runs.push(run);
                break;
            }
            if run.succeeded() {
                tracing::info!(
                    provider = %name,
                    fields = run.fields_populated(),
                    "Provider returned a partial analysis, trying next"
                );
                runs.push(run);
            } else {
                tracing::warn!(provider = %name, "Provider failed");
                failures.push(run.failure_summary());
            }
        }

        let succeeded = outcomes.iter().filter(|outcome| outcome.success).count();
        let quality = AnalysisQuality::from_success_ratio(succeeded, attempted.len());

        // Phase 3: synthesis of the most complete run
        let zone = self
            .settings
            .climate_zone
            .unwrap_or_else(|| ClimateZone::from_latitude(bounds.mean_latitude()));
        let satellite_analysis = most_complete(&runs)
            .map(|best| synthesize_run(best, bounds, quality, zone, &self.synthesizer));

        let error = match &satellite_analysis {
            Some(_) => None,
            None if failures.is_empty() => Some("No satellite providers available".to_string()),
            None => Some(format!("All satellite providers failed: {}", failures.join(" | "))),
        };

        // Phase 4: report
        Ok(ProjectAnalysisReport {
            success: satellite_analysis.is_some(),
            error,
            project_bounds: *bounds,
            analysis_period: AnalysisPeriod {
                project_start,
                analysis_date,
                monitoring_duration_days: period.days(),
            },
            satellite_analysis,
            data_sources: runs.iter().map(|run| run.provider.clone()).collect(),
            processing_info: ProcessingInfo {
                analysis_id: Uuid::new_v4().to_string(),
                processed_at: Utc::now(),
                providers_attempted: attempted,
                outcomes,
                analysis_quality: quality,
            },
        })
    }

    /// Run the four sub-queries of one provider concurrently
    async fn run_provider(
        &self,
        provider: Arc<dyn ImageryProvider>,
        bounds: &GeoBounds,
        period: &DateWindow,
    ) -> ProviderRun {
        let name = provider.name().to_string();
        let options = QueryOptions::default();
        let days = self.settings.baseline_window_days;

        let baseline_window =
            DateWindow::starting_at(period.start(), days).clamp_to(period).unwrap_or(*period);
        let current_window =
            DateWindow::ending_at(period.end(), days).clamp_to(period).unwrap_or(*period);

        let (baseline, current, change, imagery) = tokio::join!(
            self.bounded(
                &name,
                BASELINE,
                provider.get_vegetation_index(bounds, &baseline_window, IndexType::Ndvi, &options)
            ),
            self.bounded(
                &name,
                CURRENT,
                provider.get_vegetation_index(bounds, &current_window, IndexType::Ndvi, &options)
            ),
            self.bounded(
                &name,
                CHANGE,
                provider.detect_land_cover_change(bounds, period.start(), period.end(), &options)
            ),
            self.bounded(&name, IMAGERY, provider.get_imagery_metadata(bounds, period, &options)),
        );

        let mut run = ProviderRun::new(&name);
        run.baseline = run.record(BASELINE, baseline);
        run.current = run.record(CURRENT, current);
        run.change = run.record(CHANGE, change);
        run.imagery = run.record(IMAGERY, imagery);
        run
    }

    /// Apply the sub-query timeout, if any
    async fn bounded<T>(
        &self,
        provider: &str,
        operation: &str,
        query: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let Some(limit) = self.settings.subquery_timeout else {
            return query.await;
        };
        match tokio::time::timeout(limit, query).await {
            Ok(result) => result,
            Err(_) => Err(CanopyError::Timeout {
                provider: provider.to_string(),
                operation: operation.to_string(),
            }),
        }
    }

    /// Named provider, or the default provider when the name is unset or unknown
    fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn ImageryProvider>> {
        if let Some(name) = name {
            let key = name.trim().to_lowercase();
            if let Some(provider) = self.registry.get(&key) {
                return Ok(provider);
            }
            tracing::warn!(
                provider = %name,
                default = %self.settings.default_provider,
                "Unknown provider, using the default"
            );
        }
        match self.registry.get(&self.settings.default_provider) {
            Some(provider) => Ok(provider),
            None => self.registry.require(SIMULATED),
        }
    }

    /// Scene metadata for a project window
    pub async fn get_imagery(
        &self,
        bounds: &GeoBounds,
        start: NaiveDate,
        end: NaiveDate,
        provider: Option<&str>,
    ) -> Result<ImageryListing> {
        let window = DateWindow::new(start, end)?;
        let provider = self.resolve(provider)?;
        let scenes = provider.get_imagery_metadata(bounds, &window, &QueryOptions::default()).await?;

        Ok(ImageryListing {
            provider: provider.name().to_string(),
            bounds: *bounds,
            date_range: window,
            imagery_count: scenes.len(),
            scenes,
        })
    }

    /// One vegetation index over a project window
    pub async fn get_vegetation_index(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        index: IndexType,
        provider: Option<&str>,
    ) -> Result<IndexReport> {
        let provider = self.resolve(provider)?;
        let result = provider
            .get_vegetation_index(bounds, window, index, &QueryOptions::default())
            .await?;

        Ok(IndexReport { provider: provider.name().to_string(), result })
    }
}
