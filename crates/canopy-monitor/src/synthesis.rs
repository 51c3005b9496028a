//! Turn the most complete provider run into a project analysis.

use canopy_core::models::{
    AnalysisQuality, AreaAnalysis, CarbonImpactAssessment, ChangeDetectionResult, ChangeSummary,
    ConfidenceLevel, GeoBounds, SequestrationPotential, SynthesizedProjectAnalysis,
    VegetationIndexResult, VegetationMonitoring, VegetationTrend,
};
use canopy_indices::{ClimateZone, IndexSynthesis, VegetationIndexSynthesizer};

use crate::run::ProviderRun;

/// Build the analysis for `run`
pub fn synthesize_run(
    run: &ProviderRun,
    bounds: &GeoBounds,
    quality: AnalysisQuality,
    zone: ClimateZone,
    synthesizer: &VegetationIndexSynthesizer,
) -> SynthesizedProjectAnalysis {
    let vegetation_monitoring = vegetation_monitoring(run.baseline.as_ref(), run.current.as_ref());

    let latest = run.current.as_ref().or(run.baseline.as_ref());
    let synthesis = latest.and_then(|result| match synthesizer.synthesize(result.mean(), None, zone) {
        Ok(synthesis) => Some(synthesis),
        Err(e) => {
            tracing::warn!(provider = %run.provider, error = %e, "Index synthesis skipped");
            None
        }
    });

    let mut recommendations = recommendations(
        run.current.as_ref(),
        run.change.as_ref(),
        vegetation_monitoring.vegetation_trend,
        !run.warnings.is_empty(),
    );
    if let Some(synthesis) = &synthesis {
        for recommendation in &synthesis.recommendations {
            if !recommendations.contains(recommendation) {
                recommendations.push(recommendation.clone());
            }
        }
    }

    SynthesizedProjectAnalysis {
        data_source: run.provider.clone(),
        area_analysis: area_analysis(bounds, run.change.as_ref()),
        vegetation_monitoring,
        change_detection: change_summary(run.change.as_ref()),
        carbon_impact_assessment: carbon_impact(
            run.current.as_ref(),
            run.change.as_ref(),
            synthesis.as_ref(),
        ),
        monitoring_recommendations: recommendations,
        analysis_quality: quality,
    }
}

/// Area from the bounds, with change metrics when change detection ran
pub fn area_analysis(bounds: &GeoBounds, change: Option<&ChangeDetectionResult>) -> AreaAnalysis {
    AreaAnalysis {
        total_area_hectares: (bounds.area_hectares() * 100.0).round() / 100.0,
        bounds: *bounds,
        changed_area_hectares: change.map(|c| c.area.changed_area_hectares),
        stable_area_hectares: change.map(|c| c.area.stable_area_hectares),
        change_percentage: change.map(|c| c.area.change_percentage),
    }
}

pub fn vegetation_monitoring(
    baseline: Option<&VegetationIndexResult>,
    current: Option<&VegetationIndexResult>,
) -> VegetationMonitoring {
    match (baseline, current) {
        (Some(baseline), Some(current)) => {
            let change = current.mean() - baseline.mean();
            VegetationMonitoring {
                monitoring_available: true,
                baseline_ndvi: Some(baseline.mean()),
                current_ndvi: Some(current.mean()),
                ndvi_change: Some((change * 10_000.0).round() / 10_000.0),
                vegetation_trend: Some(VegetationTrend::from_delta(change)),
                baseline_health: Some(baseline.interpretation.vegetation_health.clone()),
                current_health: Some(current.interpretation.vegetation_health.clone()),
                confidence: Some(weaker(
                    baseline.interpretation.confidence_level,
                    current.interpretation.confidence_level,
                )),
            }
        }
        (_, Some(current)) => VegetationMonitoring {
            monitoring_available: true,
            current_ndvi: Some(current.mean()),
            current_health: Some(current.interpretation.vegetation_health.clone()),
            confidence: Some(weaker(ConfidenceLevel::Medium, current.interpretation.confidence_level)),
            ..Default::default()
        },
        _ => VegetationMonitoring::default(),
    }
}

fn weaker(a: ConfidenceLevel, b: ConfidenceLevel) -> ConfidenceLevel {
    use ConfidenceLevel::*;
    match (a, b) {
        (Low, _) | (_, Low) => Low,
        (Medium, _) | (_, Medium) => Medium,
        _ => High,
    }
}

pub fn change_summary(change: Option<&ChangeDetectionResult>) -> ChangeSummary {
    match change {
        Some(change) => ChangeSummary {
            change_detection_available: true,
            primary_change_type: Some(change.primary_change_type),
            confidence_score: Some(change.confidence_score),
            change_significance: Some(change.change_significance.clone()),
            environmental_impact: Some(change.environmental_impact.clone()),
            quality: Some(change.quality.clone()),
        },
        None => ChangeSummary::default(),
    }
}

pub fn carbon_impact(
    current: Option<&VegetationIndexResult>,
    change: Option<&ChangeDetectionResult>,
    synthesis: Option<&IndexSynthesis>,
) -> CarbonImpactAssessment {
    let mut assessment = CarbonImpactAssessment::default();

    if let Some(current) = current {
        let interpretation = &current.interpretation;
        assessment.assessment_available = true;
        assessment.estimated_biomass_tons_ha = Some(interpretation.estimated_biomass_tons_ha);
        assessment.forest_coverage_percent = Some(interpretation.forest_coverage_percent);
        assessment.carbon_sequestration_potential = Some(SequestrationPotential::assess(
            &interpretation.vegetation_health,
            interpretation.estimated_biomass_tons_ha,
        ));
    }

    if let Some(change) = change {
        assessment.assessment_available = true;
        assessment.carbon_impact_tons = Some(change.environmental_impact.carbon_impact_tons);
        assessment.ecosystem_health_change = Some(change.environmental_impact.ecosystem_health_change);
    }

    assessment.index_synthesis = synthesis.map(IndexSynthesis::summary);
    assessment
}

/// Monitoring advice from health, change and data quality
pub fn recommendations(
    current: Option<&VegetationIndexResult>,
    change: Option<&ChangeDetectionResult>,
    trend: Option<VegetationTrend>,
    has_warnings: bool,
) -> Vec<String> {
    let mut advice: Vec<&str> = Vec::new();

    if let Some(current) = current {
        match current.interpretation.vegetation_health.as_str() {
            "poor" | "very_poor" => {
                advice.push("Increase monitoring frequency due to poor vegetation health");
                advice.push("Consider intervention measures to improve ecosystem health");
            }
            "moderate" => advice.push("Regular monthly monitoring recommended"),
            _ => advice.push("Continue standard quarterly monitoring"),
        }
    }

    let change_type = change.map(|c| c.primary_change_type);
    let losing = change_type.is_some_and(|c| c.is_loss())
        || trend == Some(VegetationTrend::SignificantlyDeclining);
    if losing {
        advice.push("Urgent: Investigate causes of vegetation loss");
        advice.push("Implement protective measures immediately");
    } else if change_type.is_some_and(|c| c.is_disturbance()) {
        advice.push("Monitor recovery progress closely");
        advice.push("Consider restoration activities if natural recovery is slow");
    }

    if has_warnings {
        advice.push("Improve satellite data quality by reducing cloud cover constraints");
    }

    if advice.is_empty() {
        advice.push("Continue regular satellite monitoring to track project progress");
    }

    advice.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::models::{
        ChangeAreaMetrics, ChangeQualityAssessment, ChangeType, DateWindow, EnvironmentalImpact,
        IndexDeltas, IndexStatistics, IndexType, Interpretation, ProcessingMetadata, QualityFlags,
        SensorSummary,
    };
    use chrono::{NaiveDate, Utc};

    fn bounds() -> GeoBounds {
        GeoBounds::new(-74.0, 4.6, -73.9, 4.7).unwrap()
    }

    fn index_result(mean: f64, health: &str, confidence: ConfidenceLevel) -> VegetationIndexResult {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        VegetationIndexResult {
            index_type: IndexType::Ndvi,
            bounds: bounds(),
            date_range: DateWindow::single(day),
            area_hectares: 12_265.0,
            statistics: IndexStatistics {
                mean,
                std: 0.1,
                min: mean - 0.2,
                max: mean + 0.2,
                median: mean,
                pixel_count: 100,
                valid_pixel_count: 90,
            },
            interpretation: Interpretation {
                vegetation_health: health.to_string(),
                estimated_biomass_tons_ha: mean * 150.0,
                forest_coverage_percent: mean * 120.0,
                change_trend: "stable".to_string(),
                confidence_level: confidence,
            },
            scenes_used: Vec::new(),
            processing: ProcessingMetadata {
                processed_at: Utc::now(),
                algorithm: "test".to_string(),
                quality_flags: QualityFlags {
                    cloud_contamination_pct: 5.0,
                    shadow_contamination_pct: 1.0,
                    atmospheric_correction: "simulated".to_string(),
                    data_quality_score: 0.9,
                    cloud_filter_relaxed: false,
                },
            },
            sensor: SensorSummary {
                platform: "SimSat".to_string(),
                spatial_resolution_m: 10.0,
                bands_used: vec!["RED".to_string(), "NIR".to_string()],
                imagery_count: 0,
                cloud_filter_pct: 30.0,
                temporal_compositing: "median".to_string(),
            },
        }
    }

    fn change_result(change_type: ChangeType) -> ChangeDetectionResult {
        ChangeDetectionResult {
            bounds: bounds(),
            before_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            after_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            days_between: 366,
            area: ChangeAreaMetrics {
                total_area_hectares: 12_265.0,
                changed_area_hectares: 265.0,
                stable_area_hectares: 12_000.0,
                change_percentage: 2.16,
            },
            primary_change_type: change_type,
            confidence_score: 0.8,
            change_significance: "significant".to_string(),
            deltas: IndexDeltas {
                before_ndvi: 0.6,
                after_ndvi: 0.4,
                ndvi_change: -0.2,
                relative_change_percent: -33.33,
                secondary_index: None,
                secondary_change: None,
            },
            environmental_impact: EnvironmentalImpact {
                biomass_change_tons: -7950.0,
                carbon_impact_tons: -3975.0,
                disturbance_severity: "high".to_string(),
                ecosystem_health_change: -20.0,
            },
            quality: ChangeQualityAssessment {
                temporal_consistency: 0.85,
                spatial_accuracy: 0.9,
                overall_confidence: 0.8,
                detection_threshold: 0.1,
            },
            algorithm: "test".to_string(),
            processed_at: Utc::now(),
        }
    }

    #[test]
    fn test_monitoring_with_both_windows() {
        let baseline = index_result(0.5, "moderate", ConfidenceLevel::High);
        let current = index_result(0.62, "good", ConfidenceLevel::Medium);
        let monitoring = vegetation_monitoring(Some(&baseline), Some(&current));

        assert!(monitoring.monitoring_available);
        assert_eq!(monitoring.ndvi_change, Some(0.12));
        assert_eq!(monitoring.vegetation_trend, Some(VegetationTrend::SignificantlyImproving));
        assert_eq!(monitoring.confidence, Some(ConfidenceLevel::Medium));
    }

    #[test]
    fn test_monitoring_with_current_only() {
        let current = index_result(0.62, "good", ConfidenceLevel::High);
        let monitoring = vegetation_monitoring(None, Some(&current));
        assert!(monitoring.monitoring_available);
        assert_eq!(monitoring.baseline_ndvi, None);
        assert_eq!(monitoring.confidence, Some(ConfidenceLevel::Medium));

        assert!(!vegetation_monitoring(Some(&current), None).monitoring_available);
    }

    #[test]
    fn test_recommendation_tiers() {
        let poor = index_result(0.2, "poor", ConfidenceLevel::High);
        let loss = change_result(ChangeType::Deforestation);
        let advice = recommendations(Some(&poor), Some(&loss), None, true);
        assert_eq!(
            advice,
            vec![
                "Increase monitoring frequency due to poor vegetation health",
                "Consider intervention measures to improve ecosystem health",
                "Urgent: Investigate causes of vegetation loss",
                "Implement protective measures immediately",
                "Improve satellite data quality by reducing cloud cover constraints",
            ]
        );

        let good = index_result(0.7, "good", ConfidenceLevel::High);
        let disturbance = change_result(ChangeType::ModerateDisturbance);
        let advice = recommendations(Some(&good), Some(&disturbance), None, false);
        assert_eq!(advice[0], "Continue standard quarterly monitoring");
        assert_eq!(advice[1], "Monitor recovery progress closely");

        let advice = recommendations(None, None, Some(VegetationTrend::SignificantlyDeclining), false);
        assert_eq!(advice[0], "Urgent: Investigate causes of vegetation loss");

        assert_eq!(
            recommendations(None, None, None, false),
            vec!["Continue regular satellite monitoring to track project progress"]
        );
    }

    #[test]
    fn test_carbon_impact_combines_sources() {
        let current = index_result(0.7, "good", ConfidenceLevel::High);
        let change = change_result(ChangeType::VegetationLoss);
        let synthesis = VegetationIndexSynthesizer::new()
            .synthesize(0.7, None, ClimateZone::Tropical)
            .unwrap();

        let assessment = carbon_impact(Some(&current), Some(&change), Some(&synthesis));
        assert!(assessment.assessment_available);
        assert_eq!(assessment.carbon_sequestration_potential, Some(SequestrationPotential::High));
        assert_eq!(assessment.carbon_impact_tons, Some(-3975.0));
        assert_eq!(assessment.index_synthesis.map(|s| s.climate_zone), Some("tropical".to_string()));

        assert!(!carbon_impact(None, None, None).assessment_available);
    }

    #[test]
    fn test_synthesize_run_uses_change_area() {
        let mut run = ProviderRun::new("simulated");
        run.current = Some(index_result(0.55, "good", ConfidenceLevel::High));
        run.change = Some(change_result(ChangeType::Stable));

        let analysis = synthesize_run(
            &run,
            &bounds(),
            AnalysisQuality::Excellent,
            ClimateZone::Tropical,
            &VegetationIndexSynthesizer::new(),
        );
        assert_eq!(analysis.data_source, "simulated");
        assert_eq!(analysis.area_analysis.changed_area_hectares, Some(265.0));
        assert!(analysis.area_analysis.total_area_hectares > 0.0);
        assert!(analysis.change_detection.change_detection_available);
        assert!(analysis.carbon_impact_assessment.index_synthesis.is_some());
        assert!(!analysis.monitoring_recommendations.is_empty());
    }
}
