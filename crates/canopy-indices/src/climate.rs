use canopy_core::error::{CanopyError, Result};
use serde::{Deserialize, Serialize};

/// Broad climate zone used to scale productivity estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClimateZone {
    Tropical,
    Subtropical,
    Temperate,
    Boreal,
    Mediterranean,
    Arid,
    SemiArid,
}

impl ClimateZone {
    pub const ALL: [ClimateZone; 7] = [
        ClimateZone::Tropical,
        ClimateZone::Subtropical,
        ClimateZone::Temperate,
        ClimateZone::Boreal,
        ClimateZone::Mediterranean,
        ClimateZone::Arid,
        ClimateZone::SemiArid,
    ];

    /// GPP multiplier relative to a temperate baseline
    pub fn productivity_factor(&self) -> f64 {
        match self {
            ClimateZone::Tropical => 1.3,
            ClimateZone::Subtropical => 1.1,
            ClimateZone::Temperate => 1.0,
            ClimateZone::Boreal => 0.8,
            ClimateZone::Mediterranean => 1.05,
            ClimateZone::Arid => 0.6,
            ClimateZone::SemiArid => 0.75,
        }
    }

    /// Latitude-band guess used when no zone is configured.
    ///
    /// Only distinguishes the four latitude-driven zones; aridity needs more
    /// than a coordinate.
    pub fn from_latitude(latitude: f64) -> Self {
        match latitude.abs() {
            lat if lat < 23.5 => ClimateZone::Tropical,
            lat if lat < 35.0 => ClimateZone::Subtropical,
            lat if lat < 55.0 => ClimateZone::Temperate,
            _ => ClimateZone::Boreal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateZone::Tropical => "tropical",
            ClimateZone::Subtropical => "subtropical",
            ClimateZone::Temperate => "temperate",
            ClimateZone::Boreal => "boreal",
            ClimateZone::Mediterranean => "mediterranean",
            ClimateZone::Arid => "arid",
            ClimateZone::SemiArid => "semi-arid",
        }
    }
}

impl std::fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClimateZone {
    type Err = CanopyError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        ClimateZone::ALL
            .iter()
            .copied()
            .find(|zone| zone.as_str() == normalized)
            .ok_or_else(|| CanopyError::ConfigInvalid {
                key: "climate_zone".to_string(),
                reason: format!(
                    "Unknown climate zone: {}. Use tropical, subtropical, temperate, boreal, mediterranean, arid, or semi-arid",
                    s
                ),
            })
    }
}
