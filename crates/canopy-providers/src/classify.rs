//! Land-cover change classification from index deltas.

use canopy_core::models::ChangeType;

use crate::profile::ChangeCurve;

/// Classification and its confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub change_type: ChangeType,
    pub confidence: f64,
    /// Larger of the primary and secondary absolute deltas
    pub magnitude: f64,
}

/// Confidence from change magnitude, capped by the curve
pub fn base_confidence(curve: &ChangeCurve, magnitude: f64) -> f64 {
    (curve.confidence_intercept + curve.confidence_slope * magnitude).min(curve.confidence_cap)
}

/// Confidence from elapsed time, rising from the floor to 1 at saturation
pub fn temporal_confidence(curve: &ChangeCurve, days_between: i64) -> f64 {
    let progress = (days_between.max(0) as f64 / curve.saturation_days).min(1.0);
    curve.temporal_floor + (1.0 - curve.temporal_floor) * progress
}

/// Walk the priority ladder for a primary (NDVI) delta and an optional
/// secondary disturbance-index delta.
pub fn classify(
    curve: &ChangeCurve,
    primary_delta: f64,
    secondary_delta: Option<f64>,
    days_between: i64,
) -> Classification {
    let magnitude = primary_delta.abs().max(secondary_delta.map(f64::abs).unwrap_or(0.0));
    let confidence = base_confidence(curve, magnitude) * temporal_confidence(curve, days_between);

    let secondary_below = |threshold: f64| secondary_delta.is_some_and(|s| s < -threshold);

    let (change_type, factor) = if magnitude < curve.noise_floor {
        (ChangeType::Stable, 1.0)
    } else if primary_delta > curve.strong_positive
        && secondary_delta.map_or(true, |s| s > curve.secondary_growth)
    {
        (ChangeType::Afforestation, 1.0)
    } else if primary_delta > curve.moderate_positive {
        (ChangeType::VegetationGrowth, 1.0)
    } else if primary_delta < -curve.strong_negative
        && secondary_below(curve.secondary_strong_decline)
    {
        (ChangeType::Deforestation, 1.0)
    } else if primary_delta < -curve.strong_negative
        || secondary_below(curve.secondary_disturbance)
    {
        (ChangeType::ForestDisturbance, 1.0)
    } else if primary_delta < -curve.moderate_negative {
        (ChangeType::VegetationLoss, 1.0)
    } else if secondary_below(curve.secondary_moderate_disturbance) {
        (ChangeType::ModerateDisturbance, curve.moderate_disturbance_factor)
    } else if primary_delta > 0.0 {
        (ChangeType::VegetationImprovement, curve.weak_positive_factor)
    } else {
        (ChangeType::VegetationDecline, curve.weak_negative_factor)
    };

    Classification {
        change_type,
        confidence: (confidence * factor).clamp(0.0, 1.0),
        magnitude,
    }
}

/// Area affected by a change of the given magnitude
pub fn changed_area(curve: &ChangeCurve, total_hectares: f64, magnitude: f64) -> f64 {
    if magnitude > curve.significance {
        total_hectares * (4.0 * magnitude).min(1.0)
    } else {
        total_hectares * magnitude / 2.0
    }
}

/// Severity label from the strongest disturbance signal
pub fn disturbance_severity(delta: f64) -> &'static str {
    match delta.abs() {
        d if d > 0.2 => "high",
        d if d > 0.1 => "moderate",
        _ => "low",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SensorProfile;
    use proptest::prelude::*;

    fn highres() -> ChangeCurve {
        SensorProfile::high_resolution().change
    }

    fn moderate() -> ChangeCurve {
        SensorProfile::moderate_resolution().change
    }

    fn simulated() -> ChangeCurve {
        SensorProfile::simulated().change
    }

    #[test]
    fn test_strong_positive_is_afforestation() {
        let result = classify(&simulated(), 0.2, None, 365);
        assert_eq!(result.change_type, ChangeType::Afforestation);
        assert!((result.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_afforestation_needs_secondary_rise_when_available() {
        let result = classify(&moderate(), 0.15, Some(0.02), 730);
        assert_eq!(result.change_type, ChangeType::VegetationGrowth);
        let result = classify(&moderate(), 0.15, Some(0.1), 730);
        assert_eq!(result.change_type, ChangeType::Afforestation);
    }

    #[test]
    fn test_deforestation_requires_corroboration() {
        let result = classify(&simulated(), -0.2, None, 365);
        assert_eq!(result.change_type, ChangeType::ForestDisturbance);

        let result = classify(&moderate(), -0.2, Some(-0.18), 365);
        assert_eq!(result.change_type, ChangeType::Deforestation);

        let result = classify(&moderate(), -0.2, Some(-0.05), 365);
        assert_eq!(result.change_type, ChangeType::ForestDisturbance);
    }

    #[test]
    fn test_secondary_disturbance_ladder() {
        // Weak NDVI drop, strong secondary drop
        let result = classify(&moderate(), -0.02, Some(-0.25), 400);
        assert_eq!(result.change_type, ChangeType::ForestDisturbance);

        let result = classify(&moderate(), -0.02, Some(-0.12), 400);
        assert_eq!(result.change_type, ChangeType::ModerateDisturbance);
        let undamped = base_confidence(&moderate(), 0.12) * temporal_confidence(&moderate(), 400);
        assert!((result.confidence - undamped * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_moderate_and_weak_changes() {
        assert_eq!(classify(&highres(), -0.1, None, 200).change_type, ChangeType::VegetationLoss);
        assert_eq!(classify(&highres(), 0.06, None, 200).change_type, ChangeType::VegetationImprovement);
        assert_eq!(classify(&highres(), -0.06, None, 200).change_type, ChangeType::VegetationDecline);
    }

    #[test]
    fn test_temporal_confidence_curve() {
        assert_eq!(temporal_confidence(&highres(), 0), 0.0);
        assert_eq!(temporal_confidence(&highres(), 730), 1.0);
        assert!((temporal_confidence(&moderate(), 365) - 0.85).abs() < 1e-12);
        assert_eq!(temporal_confidence(&moderate(), 0), 0.7);
    }

    #[test]
    fn test_changed_area() {
        let curve = highres();
        assert_eq!(changed_area(&curve, 1000.0, 0.3), 1000.0);
        assert!((changed_area(&curve, 1000.0, 0.15) - 600.0).abs() < 1e-9);
        assert!((changed_area(&curve, 1000.0, 0.06) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_disturbance_severity() {
        assert_eq!(disturbance_severity(-0.25), "high");
        assert_eq!(disturbance_severity(0.15), "moderate");
        assert_eq!(disturbance_severity(-0.01), "low");
    }

    proptest! {
        #[test]
        fn prop_below_noise_floor_is_stable(
            fraction in 0.0..0.999f64,
            negative in any::<bool>(),
            secondary_fraction in prop::option::of(-0.999..0.999f64),
            days in 0i64..2000,
        ) {
            for curve in [highres(), moderate(), simulated()] {
                let primary = fraction * curve.noise_floor * if negative { -1.0 } else { 1.0 };
                let secondary = secondary_fraction.map(|f| f * curve.noise_floor);
                let result = classify(&curve, primary, secondary, days);
                prop_assert_eq!(result.change_type, ChangeType::Stable);
                prop_assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
            }
        }

        #[test]
        fn prop_confidence_is_monotonic_in_time(magnitude in 0.0..0.5f64, days in 0i64..1000) {
            for curve in [highres(), moderate(), simulated()] {
                let earlier = base_confidence(&curve, magnitude) * temporal_confidence(&curve, days);
                let later = base_confidence(&curve, magnitude) * temporal_confidence(&curve, days + 30);
                prop_assert!(later >= earlier);
            }
        }
    }
}
