use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ChangeQualityAssessment, ChangeType, ConfidenceLevel, EnvironmentalImpact, GeoBounds};

/// Five-band reading of the NDVI delta between baseline and current periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VegetationTrend {
    SignificantlyImproving,
    Improving,
    Stable,
    Declining,
    SignificantlyDeclining,
}

impl VegetationTrend {
    /// Bucket an NDVI delta at ±0.05 and ±0.1
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.1 {
            VegetationTrend::SignificantlyImproving
        } else if delta > 0.05 {
            VegetationTrend::Improving
        } else if delta > -0.05 {
            VegetationTrend::Stable
        } else if delta > -0.1 {
            VegetationTrend::Declining
        } else {
            VegetationTrend::SignificantlyDeclining
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VegetationTrend::SignificantlyImproving => "significantly_improving",
            VegetationTrend::Improving => "improving",
            VegetationTrend::Stable => "stable",
            VegetationTrend::Declining => "declining",
            VegetationTrend::SignificantlyDeclining => "significantly_declining",
        }
    }
}

impl std::fmt::Display for VegetationTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall grade derived from the share of providers that succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl AnalysisQuality {
    pub fn from_success_ratio(succeeded: usize, attempted: usize) -> Self {
        if succeeded == 0 || attempted == 0 {
            return AnalysisQuality::Poor;
        }
        let ratio = succeeded as f64 / attempted as f64;
        if ratio >= 0.8 {
            AnalysisQuality::Excellent
        } else if ratio >= 0.6 {
            AnalysisQuality::Good
        } else {
            AnalysisQuality::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisQuality::Poor => "poor",
            AnalysisQuality::Fair => "fair",
            AnalysisQuality::Good => "good",
            AnalysisQuality::Excellent => "excellent",
        }
    }
}

impl std::fmt::Display for AnalysisQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequestration potential bucket from health label and biomass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequestrationPotential {
    High,
    Medium,
    Low,
    VeryLow,
}

impl SequestrationPotential {
    pub fn assess(health: &str, biomass_tons_ha: f64) -> Self {
        if matches!(health, "excellent" | "good") && biomass_tons_ha > 100.0 {
            SequestrationPotential::High
        } else if matches!(health, "good" | "moderate") && biomass_tons_ha > 50.0 {
            SequestrationPotential::Medium
        } else if health != "very_poor" && biomass_tons_ha > 10.0 {
            SequestrationPotential::Low
        } else {
            SequestrationPotential::VeryLow
        }
    }
}

/// One sub-query of a provider run that failed without aborting the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialResultWarning {
    pub provider: String,
    pub operation: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaAnalysis {
    pub total_area_hectares: f64,
    pub bounds: GeoBounds,
    pub changed_area_hectares: Option<f64>,
    pub stable_area_hectares: Option<f64>,
    pub change_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VegetationMonitoring {
    pub monitoring_available: bool,
    pub baseline_ndvi: Option<f64>,
    pub current_ndvi: Option<f64>,
    pub ndvi_change: Option<f64>,
    pub vegetation_trend: Option<VegetationTrend>,
    pub baseline_health: Option<String>,
    pub current_health: Option<String>,
    pub confidence: Option<ConfidenceLevel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub change_detection_available: bool,
    pub primary_change_type: Option<ChangeType>,
    pub confidence_score: Option<f64>,
    pub change_significance: Option<String>,
    pub environmental_impact: Option<EnvironmentalImpact>,
    pub quality: Option<ChangeQualityAssessment>,
}

/// Carbon-proxy metrics derived from the synthesizer for the current period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSynthesisSummary {
    pub climate_zone: String,
    pub leaf_area_index: f64,
    pub fpar: f64,
    pub gpp_tco2_ha_year: f64,
    pub vegetation_condition_index: f64,
    pub biomass_tons_ha: f64,
    pub carbon_stock_tons_ha: f64,
    pub sequestration_rate_tco2_ha_year: f64,
    pub quality_score: f64,
    pub quality_level: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CarbonImpactAssessment {
    pub assessment_available: bool,
    pub estimated_biomass_tons_ha: Option<f64>,
    pub forest_coverage_percent: Option<f64>,
    pub carbon_sequestration_potential: Option<SequestrationPotential>,
    pub carbon_impact_tons: Option<f64>,
    pub ecosystem_health_change: Option<f64>,
    pub index_synthesis: Option<IndexSynthesisSummary>,
}

/// Project-level view built from the most complete provider run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedProjectAnalysis {
    pub data_source: String,
    pub area_analysis: AreaAnalysis,
    pub vegetation_monitoring: VegetationMonitoring,
    pub change_detection: ChangeSummary,
    pub carbon_impact_assessment: CarbonImpactAssessment,
    pub monitoring_recommendations: Vec<String>,
    pub analysis_quality: AnalysisQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    pub project_start: NaiveDate,
    pub analysis_date: NaiveDate,
    pub monitoring_duration_days: i64,
}

/// Outcome of querying one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOutcome {
    pub provider: String,
    pub success: bool,
    /// Number of sub-queries that returned a value, out of four
    pub fields_populated: usize,
    pub warnings: Vec<PartialResultWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    pub analysis_id: String,
    pub processed_at: DateTime<Utc>,
    pub providers_attempted: Vec<String>,
    pub outcomes: Vec<ProviderOutcome>,
    pub analysis_quality: AnalysisQuality,
}

/// Envelope returned by a full project analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysisReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub project_bounds: GeoBounds,
    pub analysis_period: AnalysisPeriod,
    pub satellite_analysis: Option<SynthesizedProjectAnalysis>,
    pub data_sources: Vec<String>,
    pub processing_info: ProcessingInfo,
}
