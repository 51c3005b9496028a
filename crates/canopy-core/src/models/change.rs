use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{GeoBounds, IndexType};

/// Primary land-cover change classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Stable,
    Afforestation,
    VegetationGrowth,
    VegetationImprovement,
    Deforestation,
    ForestDisturbance,
    ModerateDisturbance,
    VegetationLoss,
    VegetationDecline,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Stable => "stable",
            ChangeType::Afforestation => "afforestation",
            ChangeType::VegetationGrowth => "vegetation_growth",
            ChangeType::VegetationImprovement => "vegetation_improvement",
            ChangeType::Deforestation => "deforestation",
            ChangeType::ForestDisturbance => "forest_disturbance",
            ChangeType::ModerateDisturbance => "moderate_disturbance",
            ChangeType::VegetationLoss => "vegetation_loss",
            ChangeType::VegetationDecline => "vegetation_decline",
        }
    }

    /// Net loss of vegetation that warrants an urgent response
    pub fn is_loss(&self) -> bool {
        matches!(
            self,
            ChangeType::Deforestation | ChangeType::VegetationLoss | ChangeType::VegetationDecline
        )
    }

    pub fn is_disturbance(&self) -> bool {
        matches!(self, ChangeType::ForestDisturbance | ChangeType::ModerateDisturbance)
    }

    pub fn is_gain(&self) -> bool {
        matches!(
            self,
            ChangeType::Afforestation
                | ChangeType::VegetationGrowth
                | ChangeType::VegetationImprovement
        )
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeAreaMetrics {
    pub total_area_hectares: f64,
    pub changed_area_hectares: f64,
    pub stable_area_hectares: f64,
    pub change_percentage: f64,
}

/// Differences of index means between the two dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDeltas {
    pub before_ndvi: f64,
    pub after_ndvi: f64,
    pub ndvi_change: f64,
    pub relative_change_percent: f64,
    /// Secondary disturbance index, when the provider has one
    pub secondary_index: Option<IndexType>,
    pub secondary_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub biomass_change_tons: f64,
    pub carbon_impact_tons: f64,
    /// `high`, `moderate` or `low`
    pub disturbance_severity: String,
    pub ecosystem_health_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeQualityAssessment {
    pub temporal_consistency: f64,
    pub spatial_accuracy: f64,
    pub overall_confidence: f64,
    pub detection_threshold: f64,
}

/// Result of comparing the area at two dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDetectionResult {
    pub bounds: GeoBounds,
    pub before_date: NaiveDate,
    pub after_date: NaiveDate,
    pub days_between: i64,
    pub area: ChangeAreaMetrics,
    pub primary_change_type: ChangeType,
    pub confidence_score: f64,
    /// `significant` or `minor`
    pub change_significance: String,
    pub deltas: IndexDeltas,
    pub environmental_impact: EnvironmentalImpact,
    pub quality: ChangeQualityAssessment,
    pub algorithm: String,
    pub processed_at: DateTime<Utc>,
}
