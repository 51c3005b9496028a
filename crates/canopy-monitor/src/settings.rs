use std::time::Duration;

use canopy_core::config::LayeredConfig;
use canopy_core::Result;
use canopy_indices::ClimateZone;
use canopy_providers::SIMULATED;

/// Orchestrator settings resolved from the layered configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    /// Provider used by the narrow calls when none or an unknown one is named
    pub default_provider: String,
    /// Bound on each sub-query; `None` waits indefinitely
    pub subquery_timeout: Option<Duration>,
    /// Length of the baseline and current NDVI windows
    pub baseline_window_days: i64,
    /// Fixed climate zone; inferred from the project's latitude when `None`
    pub climate_zone: Option<ClimateZone>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            default_provider: SIMULATED.to_string(),
            subquery_timeout: Some(Duration::from_secs(120)),
            baseline_window_days: 30,
            climate_zone: None,
        }
    }
}

impl MonitorSettings {
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let zone = config.climate_zone.value.trim();
        let climate_zone = if zone.is_empty() || zone.eq_ignore_ascii_case("auto") {
            None
        } else {
            Some(zone.parse::<ClimateZone>()?)
        };

        Ok(Self {
            default_provider: config.default_provider.value.trim().to_lowercase(),
            subquery_timeout: config.subquery_timeout(),
            baseline_window_days: config.baseline_window_days.value.max(1),
            climate_zone,
        })
    }

    pub fn with_subquery_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.subquery_timeout = timeout;
        self
    }

    pub fn with_climate_zone(mut self, zone: ClimateZone) -> Self {
        self.climate_zone = Some(zone);
        self
    }
}
