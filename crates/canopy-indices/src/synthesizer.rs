//! Derivation of secondary indices and carbon proxies from NDVI/EVI.
//!
//! The secondary indices are closed-form approximations from NDVI rather than
//! band math; they are meant for screening, not for reporting measured values.

use canopy_core::error::{CanopyError, Result};
use canopy_core::models::IndexSynthesisSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::climate::ClimateZone;
use crate::interpret;

/// Soil brightness correction factor for SAVI
const SAVI_L: f64 = 0.5;

/// Regional NDVI assumed as normal when no history is available
const DEFAULT_NORMAL_NDVI: f64 = 0.6;

const LAI_MIN: f64 = 0.1;
const LAI_MAX: f64 = 8.0;
const FPAR_MAX: f64 = 0.95;

/// Carbon to CO2 mass ratio
const CO2_PER_C: f64 = 44.0 / 12.0;

/// One derived index with its reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedIndex {
    pub value: f64,
    pub description: String,
    pub interpretation: String,
}

impl DerivedIndex {
    fn new(value: f64, places: i32, description: &str, interpretation: &str) -> Self {
        Self {
            value: round_to(value, places),
            description: description.to_string(),
            interpretation: interpretation.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GppEstimate {
    pub kg_c_m2_year: f64,
    pub tons_co2_ha_year: f64,
    pub climate_zone: ClimateZone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonMetrics {
    pub above_ground_biomass_tons_ha: f64,
    pub carbon_stock_tons_c_ha: f64,
    pub npp_tons_co2_ha_year: f64,
    pub sequestration_rate_tons_co2_ha_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisQuality {
    pub score: f64,
    /// `high`, `medium` or `low`
    pub level: String,
    pub issues: Vec<String>,
}

/// Full derivation from one NDVI/EVI measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSynthesis {
    pub ndvi: f64,
    pub evi: f64,
    /// Set when EVI was not measured and EVI2 stood in for it
    pub evi_estimated: bool,
    pub evi2: DerivedIndex,
    pub savi: DerivedIndex,
    pub msavi: DerivedIndex,
    pub gndvi: DerivedIndex,
    pub nbr: DerivedIndex,
    pub lai: DerivedIndex,
    pub fpar: DerivedIndex,
    pub vci: DerivedIndex,
    pub gpp: GppEstimate,
    pub carbon: CarbonMetrics,
    pub quality: SynthesisQuality,
    pub recommendations: Vec<String>,
    pub computed_at: DateTime<Utc>,
}

impl IndexSynthesis {
    /// Compact form embedded in project reports
    pub fn summary(&self) -> IndexSynthesisSummary {
        IndexSynthesisSummary {
            climate_zone: self.gpp.climate_zone.to_string(),
            leaf_area_index: self.lai.value,
            fpar: self.fpar.value,
            gpp_tco2_ha_year: self.gpp.tons_co2_ha_year,
            vegetation_condition_index: self.vci.value,
            biomass_tons_ha: self.carbon.above_ground_biomass_tons_ha,
            carbon_stock_tons_ha: self.carbon.carbon_stock_tons_c_ha,
            sequestration_rate_tco2_ha_year: self.carbon.sequestration_rate_tons_co2_ha_year,
            quality_score: self.quality.score,
            quality_level: self.quality.level.clone(),
        }
    }
}

/// Expands an NDVI/EVI pair into derived indices and carbon metrics
#[derive(Debug, Clone)]
pub struct VegetationIndexSynthesizer {
    normal_ndvi: f64,
}

impl Default for VegetationIndexSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl VegetationIndexSynthesizer {
    pub fn new() -> Self {
        Self { normal_ndvi: DEFAULT_NORMAL_NDVI }
    }

    /// Use a regional NDVI normal for the condition index
    pub fn with_normal_ndvi(mut self, normal_ndvi: f64) -> Self {
        if normal_ndvi > 0.0 && normal_ndvi.is_finite() {
            self.normal_ndvi = normal_ndvi;
        }
        self
    }

    /// Derive the full index set.
    ///
    /// `evi` is optional; EVI2 is used in its place when absent.
    pub fn synthesize(
        &self,
        ndvi: f64,
        evi: Option<f64>,
        zone: ClimateZone,
    ) -> Result<IndexSynthesis> {
        check_range("NDVI", ndvi)?;
        if let Some(evi) = evi {
            check_range("EVI", evi)?;
        }

        let evi2 = evi2(ndvi);
        let (evi, evi_estimated) = match evi {
            Some(evi) => (evi, false),
            None => (evi2, true),
        };

        let savi = savi(ndvi);
        let msavi = (0.95 * ndvi + 0.02).clamp(0.0, 1.0);
        let gndvi = (0.85 * ndvi + 0.05).clamp(0.0, 1.0);
        let nbr = (0.7 * ndvi - 0.1).clamp(-1.0, 1.0);
        let lai = leaf_area_index(ndvi, evi);
        let fpar = fpar(ndvi);
        let vci = (ndvi / self.normal_ndvi * 100.0).clamp(0.0, 200.0);

        let gpp_kg_c = (0.6 * ndvi + 0.4 * evi) * 15.0 * zone.productivity_factor();
        let gpp_tco2 = gpp_kg_c * CO2_PER_C * 10.0;

        let biomass = lai * 25.0;
        let npp = 0.45 * gpp_tco2;
        let carbon = CarbonMetrics {
            above_ground_biomass_tons_ha: round_to(biomass, 1),
            carbon_stock_tons_c_ha: round_to(biomass * 0.47, 1),
            npp_tons_co2_ha_year: round_to(npp, 2),
            sequestration_rate_tons_co2_ha_year: round_to(npp * CO2_PER_C, 2),
        };

        let quality = assess_quality(lai, fpar);
        let recommendations = recommend(lai, carbon.sequestration_rate_tons_co2_ha_year, vci);

        tracing::debug!(
            ndvi,
            evi,
            lai,
            zone = %zone,
            sequestration = carbon.sequestration_rate_tons_co2_ha_year,
            "Synthesized vegetation indices"
        );

        Ok(IndexSynthesis {
            ndvi,
            evi,
            evi_estimated,
            evi2: DerivedIndex::new(
                evi2,
                4,
                "Enhanced Vegetation Index 2",
                interpret::evi(evi2),
            ),
            savi: DerivedIndex::new(
                savi,
                4,
                "Soil Adjusted Vegetation Index",
                interpret::soil_adjusted(savi),
            ),
            msavi: DerivedIndex::new(
                msavi,
                4,
                "Modified Soil Adjusted Vegetation Index",
                interpret::soil_adjusted(msavi),
            ),
            gndvi: DerivedIndex::new(
                gndvi,
                4,
                "Green Normalized Difference Vegetation Index",
                interpret::ndvi(gndvi),
            ),
            nbr: DerivedIndex::new(
                nbr,
                4,
                "Normalized Burn Ratio (estimated)",
                interpret::nbr(nbr),
            ),
            lai: DerivedIndex::new(lai, 2, "Leaf Area Index (m²/m²)", interpret::lai(lai)),
            fpar: DerivedIndex::new(
                fpar,
                4,
                "Fraction of Photosynthetically Active Radiation",
                interpret::fpar(fpar),
            ),
            vci: DerivedIndex::new(vci, 1, "Vegetation Condition Index (%)", interpret::vci(vci)),
            gpp: GppEstimate {
                kg_c_m2_year: round_to(gpp_kg_c, 2),
                tons_co2_ha_year: round_to(gpp_tco2, 2),
                climate_zone: zone,
            },
            carbon,
            quality,
            recommendations,
            computed_at: Utc::now(),
        })
    }
}

fn check_range(index: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(CanopyError::InvalidIndexValue { index: index.to_string(), value });
    }
    Ok(())
}

/// Two-band EVI approximated from NDVI
pub fn evi2(ndvi: f64) -> f64 {
    (0.8 * ndvi + 0.1).clamp(0.0, 1.0)
}

pub fn savi(ndvi: f64) -> f64 {
    (ndvi * (1.0 + SAVI_L) / (1.0 + SAVI_L * ndvi)).clamp(0.0, 1.0)
}

/// Piecewise LAI curve scaled by the EVI/NDVI ratio, bounded to [0.1, 8]
pub fn leaf_area_index(ndvi: f64, evi: f64) -> f64 {
    let base = if ndvi < 0.2 {
        0.1
    } else if ndvi < 0.5 {
        (ndvi - 0.2) * 6.67
    } else {
        2.0 + 1.5 * (1.0 + 10.0 * (ndvi - 0.5)).ln()
    };

    let evi_factor = if ndvi > 0.0 { (evi / ndvi).clamp(0.8, 1.2) } else { 1.0 };

    (base * evi_factor).clamp(LAI_MIN, LAI_MAX)
}

pub fn fpar(ndvi: f64) -> f64 {
    let value = if ndvi < 0.125 {
        0.0
    } else if ndvi > 0.8 {
        FPAR_MAX
    } else {
        1.25 * ndvi - 0.15625
    };
    value.clamp(0.0, FPAR_MAX)
}

fn assess_quality(lai: f64, fpar: f64) -> SynthesisQuality {
    let mut score = 50.0;
    let mut issues = Vec::new();

    if (LAI_MIN..=LAI_MAX).contains(&lai) {
        score += 25.0;
    } else {
        issues.push("LAI value outside realistic range".to_string());
    }

    if (0.0..=FPAR_MAX).contains(&fpar) {
        score += 25.0;
    } else {
        issues.push("fPAR value outside realistic range".to_string());
    }

    let score: f64 = f64::min(score, 100.0);
    let level = if score >= 80.0 {
        "high"
    } else if score >= 60.0 {
        "medium"
    } else {
        "low"
    };

    SynthesisQuality { score, level: level.to_string(), issues }
}

fn recommend(lai: f64, sequestration: f64, vci: f64) -> Vec<String> {
    let mut recommendations = Vec::new();

    if lai < 2.0 {
        recommendations.push(
            "Low vegetation density detected. Consider reforestation or afforestation activities."
                .to_string(),
        );
    }
    if sequestration < 5.0 {
        recommendations.push(
            "Low carbon sequestration potential. Investigate soil conditions and species selection."
                .to_string(),
        );
    }
    if sequestration > 15.0 {
        recommendations.push(
            "High carbon sequestration potential identified. Prioritize for carbon credit development."
                .to_string(),
        );
    }
    if vci < 80.0 {
        recommendations
            .push("Vegetation condition below normal. Monitor for stress factors.".to_string());
    }

    recommendations
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth(ndvi: f64, evi: Option<f64>) -> IndexSynthesis {
        VegetationIndexSynthesizer::new().synthesize(ndvi, evi, ClimateZone::Temperate).unwrap()
    }

    #[test]
    fn test_secondary_indices() {
        let result = synth(0.5, Some(0.4));
        assert_eq!(result.evi2.value, 0.5);
        assert_eq!(result.savi.value, 0.6);
        assert_eq!(result.msavi.value, 0.495);
        assert_eq!(result.gndvi.value, 0.475);
        assert_eq!(result.nbr.value, 0.25);
        assert!(!result.evi_estimated);
    }

    #[test]
    fn test_lai_curve() {
        assert_eq!(leaf_area_index(0.1, 0.1), LAI_MIN);
        // Linear segment with a neutral EVI ratio
        assert!((leaf_area_index(0.35, 0.35) - 1.0005).abs() < 1e-9);
        // Logarithmic segment: 2 + 1.5 ln(3)
        let expected = 2.0 + 1.5 * 3.0f64.ln();
        assert!((leaf_area_index(0.7, 0.7) - expected).abs() < 1e-9);
        // EVI ratio is capped at 1.2
        assert!((leaf_area_index(0.7, 1.0) - expected * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_fpar_segments() {
        assert_eq!(fpar(0.1), 0.0);
        assert_eq!(fpar(0.9), 0.95);
        assert!((fpar(0.5) - 0.46875).abs() < 1e-12);
    }

    #[test]
    fn test_allometric_ratios() {
        let result = synth(0.7, Some(0.6));
        let biomass = result.carbon.above_ground_biomass_tons_ha;
        assert!((biomass - result.lai.value * 25.0).abs() < 0.5);
        assert!((result.carbon.carbon_stock_tons_c_ha - biomass * 0.47).abs() < 0.1);
        assert!(
            (result.carbon.sequestration_rate_tons_co2_ha_year
                - result.carbon.npp_tons_co2_ha_year * 44.0 / 12.0)
                .abs()
                < 0.05
        );
    }

    #[test]
    fn test_climate_scales_gpp() {
        let synthesizer = VegetationIndexSynthesizer::new();
        let tropical = synthesizer.synthesize(0.7, Some(0.6), ClimateZone::Tropical).unwrap();
        let arid = synthesizer.synthesize(0.7, Some(0.6), ClimateZone::Arid).unwrap();
        assert!(tropical.gpp.tons_co2_ha_year > arid.gpp.tons_co2_ha_year);
        // (0.6*0.7 + 0.4*0.6) * 15 * 1.3
        assert!((tropical.gpp.kg_c_m2_year - 12.87).abs() < 1e-9);
    }

    #[test]
    fn test_missing_evi_uses_evi2() {
        let result = synth(0.6, None);
        assert!(result.evi_estimated);
        assert!((result.evi - evi2(0.6)).abs() < 1e-12);
    }

    #[test]
    fn test_recommendations() {
        let sparse = synth(0.15, None);
        assert!(sparse.recommendations.iter().any(|r| r.contains("reforestation")));
        assert!(sparse.recommendations.iter().any(|r| r.contains("Monitor for stress")));

        let lush = synth(0.85, Some(0.7));
        assert!(lush.recommendations.iter().any(|r| r.contains("Prioritize for carbon credit")));
        assert!(!lush.recommendations.iter().any(|r| r.contains("reforestation")));
    }

    #[test]
    fn test_quality_is_high_for_valid_inputs() {
        let result = synth(0.5, None);
        assert_eq!(result.quality.score, 100.0);
        assert_eq!(result.quality.level, "high");
        assert!(result.quality.issues.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_input() {
        let synthesizer = VegetationIndexSynthesizer::new();
        assert!(matches!(
            synthesizer.synthesize(1.5, None, ClimateZone::Temperate),
            Err(CanopyError::InvalidIndexValue { .. })
        ));
        assert!(synthesizer.synthesize(0.5, Some(f64::NAN), ClimateZone::Temperate).is_err());
    }

    #[test]
    fn test_custom_normal_changes_vci() {
        let result = VegetationIndexSynthesizer::new()
            .with_normal_ndvi(0.8)
            .synthesize(0.6, None, ClimateZone::Temperate)
            .unwrap();
        assert_eq!(result.vci.value, 75.0);
    }
}
