//! Sensor profiles.
//!
//! A profile holds every constant that distinguishes one imagery source from
//! another: revisit cadence, cloud behaviour, per-index base values, and the
//! change-classification curve. Providers are generic over the data path and
//! take all of their numbers from here.

use canopy_core::models::IndexType;

/// Which scene naming scheme synthetic scenes imitate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFlavor {
    /// Tiled 10 m products (MGRS tile ids, relative orbits)
    HighRes,
    /// Path/row 30 m products
    ModerateRes,
    /// Generic synthetic scenes
    Simulated,
}

/// Parameters of the change-classification ladder
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeCurve {
    /// Magnitudes below this always classify as stable
    pub noise_floor: f64,
    pub confidence_cap: f64,
    pub confidence_intercept: f64,
    pub confidence_slope: f64,
    /// Days after which elapsed time no longer adds confidence
    pub saturation_days: f64,
    /// Temporal confidence at zero elapsed days
    pub temporal_floor: f64,
    pub strong_positive: f64,
    pub moderate_positive: f64,
    pub strong_negative: f64,
    pub moderate_negative: f64,
    /// Secondary-index rise required to call afforestation
    pub secondary_growth: f64,
    /// Secondary-index drop that corroborates deforestation
    pub secondary_strong_decline: f64,
    /// Secondary-index drop that alone indicates forest disturbance
    pub secondary_disturbance: f64,
    /// Secondary-index drop that indicates moderate disturbance
    pub secondary_moderate_disturbance: f64,
    pub moderate_disturbance_factor: f64,
    pub weak_positive_factor: f64,
    pub weak_negative_factor: f64,
    /// NDVI change above which a change is reported as significant
    pub significance: f64,
    pub biomass_factor: f64,
    pub carbon_factor: f64,
    pub spatial_accuracy: f64,
    /// (days threshold, consistency above it, consistency at or below it)
    pub temporal_consistency: (i64, f64, f64),
}

/// Static characteristics of one imagery source
#[derive(Debug, Clone, PartialEq)]
pub struct SensorProfile {
    pub platform: &'static str,
    pub sensor: &'static str,
    /// Spacecraft names a scene may come from
    pub spacecraft: &'static [&'static str],
    pub flavor: SceneFlavor,
    pub resolution_m: f64,
    pub revisit_days: (u32, u32),
    /// Probability that a candidate acquisition date yields a scene
    pub presence_probability: f64,
    pub cloud_cover_range: (f64, f64),
    /// Cloud ceiling used when the caller does not set one
    pub default_max_cloud_pct: f64,
    pub processing_level: &'static str,
    pub bands: &'static [&'static str],
    pub product_base_url: &'static str,
    /// Bases of the synthetic mean per supported index
    pub index_bases: &'static [(IndexType, f64)],
    pub index_bands: &'static [(IndexType, &'static [&'static str])],
    pub default_index_bands: &'static [&'static str],
    pub resolution_boost: f64,
    pub temporal_bonus: f64,
    pub seasonal_amplitude: f64,
    /// Average cloud cover is divided by this to give the mean penalty
    pub cloud_divisor: f64,
    pub noise_amplitude: f64,
    pub std_range: (f64, f64),
    /// Half-width of the min/max spread in standard deviations
    pub spread_factor: f64,
    pub valid_pixel_ratio: f64,
    pub biomass_factor: f64,
    pub coverage_factor: f64,
    /// Scenes needed before an interpretation is reported with high confidence
    pub high_confidence_scenes: usize,
    pub shadow_max_pct: f64,
    pub quality_score_range: (f64, f64),
    pub secondary_index: Option<IndexType>,
    pub index_algorithm: &'static str,
    pub change_algorithm: &'static str,
    pub change: ChangeCurve,
}

const S2_BANDS: &[&str] = &["B02", "B03", "B04", "B05", "B06", "B07", "B08", "B8A", "B11", "B12"];
const LANDSAT_BANDS: &[&str] = &["SR_B1", "SR_B2", "SR_B3", "SR_B4", "SR_B5", "SR_B6", "SR_B7"];
const SIM_BANDS: &[&str] = &["BLUE", "GREEN", "RED", "NIR", "SWIR1", "SWIR2"];

impl SensorProfile {
    /// 10 m, 5 to 10 day revisit multispectral profile
    pub fn high_resolution() -> Self {
        Self {
            platform: "Sentinel-2",
            sensor: "MSI",
            spacecraft: &["Sentinel-2A", "Sentinel-2B"],
            flavor: SceneFlavor::HighRes,
            resolution_m: 10.0,
            revisit_days: (5, 10),
            presence_probability: 0.85,
            cloud_cover_range: (0.0, 25.0),
            default_max_cloud_pct: 20.0,
            processing_level: "Level-2A",
            bands: S2_BANDS,
            product_base_url: "https://catalog.dataspace.example/products",
            index_bases: &[
                (IndexType::Ndvi, 0.65),
                (IndexType::Evi, 0.45),
                (IndexType::Savi, 0.55),
                (IndexType::Msavi, 0.60),
                (IndexType::Ndwi, 0.25),
                (IndexType::Ndmi, 0.35),
            ],
            index_bands: &[
                (IndexType::Ndvi, &["B04", "B08"]),
                (IndexType::Evi, &["B02", "B04", "B08"]),
                (IndexType::Savi, &["B04", "B08"]),
                (IndexType::Msavi, &["B04", "B08"]),
                (IndexType::Ndwi, &["B03", "B08"]),
                (IndexType::Ndmi, &["B08", "B11"]),
            ],
            default_index_bands: &["B04", "B08"],
            resolution_boost: 0.05,
            temporal_bonus: 0.0,
            seasonal_amplitude: 0.15,
            cloud_divisor: 1000.0,
            noise_amplitude: 0.02,
            std_range: (0.08, 0.18),
            spread_factor: 2.5,
            valid_pixel_ratio: 0.92,
            biomass_factor: 180.0,
            coverage_factor: 130.0,
            high_confidence_scenes: 3,
            shadow_max_pct: 8.0,
            quality_score_range: (0.88, 0.98),
            secondary_index: Some(IndexType::Ndmi),
            index_algorithm: "MSI index compositor v2.1",
            change_algorithm: "MSI multi-temporal change detection v2.0",
            change: ChangeCurve {
                noise_floor: 0.05,
                confidence_cap: 0.95,
                confidence_intercept: 0.6,
                confidence_slope: 2.0,
                saturation_days: 365.0,
                temporal_floor: 0.0,
                strong_positive: 0.15,
                moderate_positive: 0.08,
                strong_negative: 0.15,
                moderate_negative: 0.08,
                secondary_growth: 0.05,
                secondary_strong_decline: 0.12,
                secondary_disturbance: 0.2,
                secondary_moderate_disturbance: 0.1,
                moderate_disturbance_factor: 0.9,
                weak_positive_factor: 0.8,
                weak_negative_factor: 0.8,
                significance: 0.1,
                biomass_factor: 150.0,
                carbon_factor: 75.0,
                spatial_accuracy: 0.95,
                temporal_consistency: (30, 0.90, 0.75),
            },
        }
    }

    /// 30 m, 8 to 16 day revisit profile with a long archive
    pub fn moderate_resolution() -> Self {
        Self {
            platform: "Landsat",
            sensor: "OLI/TIRS",
            spacecraft: &["Landsat-8", "Landsat-9"],
            flavor: SceneFlavor::ModerateRes,
            resolution_m: 30.0,
            revisit_days: (8, 16),
            presence_probability: 0.8,
            cloud_cover_range: (0.0, 40.0),
            default_max_cloud_pct: 30.0,
            processing_level: "L2SP",
            bands: LANDSAT_BANDS,
            product_base_url: "https://landsat.archive.example/collection2/level-2",
            index_bases: &[
                (IndexType::Ndvi, 0.62),
                (IndexType::Evi, 0.42),
                (IndexType::Savi, 0.52),
                (IndexType::Msavi, 0.58),
                (IndexType::Nbr, 0.45),
                (IndexType::Ndmi, 0.32),
                (IndexType::Ndwi, 0.22),
            ],
            index_bands: &[
                (IndexType::Ndvi, &["SR_B4", "SR_B5"]),
                (IndexType::Evi, &["SR_B2", "SR_B4", "SR_B5"]),
                (IndexType::Savi, &["SR_B4", "SR_B5"]),
                (IndexType::Msavi, &["SR_B4", "SR_B5"]),
                (IndexType::Nbr, &["SR_B5", "SR_B7"]),
                (IndexType::Ndmi, &["SR_B5", "SR_B6"]),
                (IndexType::Ndwi, &["SR_B3", "SR_B5"]),
            ],
            default_index_bands: &["SR_B4", "SR_B5"],
            resolution_boost: 0.02,
            temporal_bonus: 0.03,
            seasonal_amplitude: 0.12,
            cloud_divisor: 800.0,
            noise_amplitude: 0.02,
            std_range: (0.06, 0.14),
            spread_factor: 2.2,
            valid_pixel_ratio: 0.88,
            biomass_factor: 160.0,
            coverage_factor: 125.0,
            high_confidence_scenes: 2,
            shadow_max_pct: 12.0,
            quality_score_range: (0.82, 0.94),
            secondary_index: Some(IndexType::Nbr),
            index_algorithm: "OLI surface reflectance index compositor v3.0",
            change_algorithm: "OLI NDVI/NBR change detection v2.1",
            change: ChangeCurve {
                noise_floor: 0.04,
                confidence_cap: 0.92,
                confidence_intercept: 0.65,
                confidence_slope: 1.8,
                saturation_days: 730.0,
                temporal_floor: 0.7,
                strong_positive: 0.12,
                moderate_positive: 0.06,
                strong_negative: 0.12,
                moderate_negative: 0.06,
                secondary_growth: 0.08,
                secondary_strong_decline: 0.15,
                secondary_disturbance: 0.2,
                secondary_moderate_disturbance: 0.1,
                moderate_disturbance_factor: 0.9,
                weak_positive_factor: 0.85,
                weak_negative_factor: 0.8,
                significance: 0.08,
                biomass_factor: 140.0,
                carbon_factor: 70.0,
                spatial_accuracy: 0.88,
                temporal_consistency: (60, 0.92, 0.82),
            },
        }
    }

    /// Generic synthetic source used when nothing else is available
    pub fn simulated() -> Self {
        Self {
            platform: "SimSat",
            sensor: "SimSat-MSI",
            spacecraft: &["SimSat-1"],
            flavor: SceneFlavor::Simulated,
            resolution_m: 10.0,
            revisit_days: (3, 16),
            presence_probability: 0.7,
            cloud_cover_range: (0.0, 30.0),
            default_max_cloud_pct: 30.0,
            processing_level: "L2A",
            bands: SIM_BANDS,
            product_base_url: "https://simulated.canopy.invalid/scenes",
            index_bases: &[
                (IndexType::Ndvi, 0.6),
                (IndexType::Evi, 0.42),
                (IndexType::Savi, 0.52),
                (IndexType::Msavi, 0.56),
                (IndexType::Ndwi, 0.22),
                (IndexType::Nbr, 0.42),
                (IndexType::Ndmi, 0.3),
                (IndexType::Gndvi, 0.55),
            ],
            index_bands: &[
                (IndexType::Ndvi, &["RED", "NIR"]),
                (IndexType::Evi, &["BLUE", "RED", "NIR"]),
                (IndexType::Ndwi, &["GREEN", "NIR"]),
                (IndexType::Nbr, &["NIR", "SWIR2"]),
                (IndexType::Ndmi, &["NIR", "SWIR1"]),
                (IndexType::Gndvi, &["GREEN", "NIR"]),
            ],
            default_index_bands: &["RED", "NIR"],
            resolution_boost: 0.0,
            temporal_bonus: 0.0,
            seasonal_amplitude: 0.1,
            cloud_divisor: 1000.0,
            noise_amplitude: 0.05,
            std_range: (0.05, 0.15),
            spread_factor: 2.0,
            valid_pixel_ratio: 0.85,
            biomass_factor: 150.0,
            coverage_factor: 120.0,
            high_confidence_scenes: 3,
            shadow_max_pct: 10.0,
            quality_score_range: (0.8, 1.0),
            secondary_index: None,
            index_algorithm: "Synthetic index generator v1.0",
            change_algorithm: "Synthetic change detection v1.0",
            change: ChangeCurve {
                noise_floor: 0.05,
                confidence_cap: 0.95,
                confidence_intercept: 0.6,
                confidence_slope: 2.0,
                saturation_days: 365.0,
                temporal_floor: 0.5,
                strong_positive: 0.15,
                moderate_positive: 0.08,
                strong_negative: 0.15,
                moderate_negative: 0.08,
                secondary_growth: 0.05,
                secondary_strong_decline: 0.12,
                secondary_disturbance: 0.2,
                secondary_moderate_disturbance: 0.1,
                moderate_disturbance_factor: 0.9,
                weak_positive_factor: 0.8,
                weak_negative_factor: 0.8,
                significance: 0.1,
                biomass_factor: 150.0,
                carbon_factor: 75.0,
                spatial_accuracy: 0.9,
                temporal_consistency: (30, 0.85, 0.7),
            },
        }
    }

    pub fn index_base(&self, index: IndexType) -> Option<f64> {
        self.index_bases.iter().find(|(i, _)| *i == index).map(|(_, base)| *base)
    }

    pub fn supports(&self, index: IndexType) -> bool {
        self.index_base(index).is_some()
    }

    pub fn supported_indices(&self) -> Vec<IndexType> {
        self.index_bases.iter().map(|(index, _)| *index).collect()
    }

    /// Bands read to compute `index`
    pub fn bands_for(&self, index: IndexType) -> Vec<String> {
        self.index_bands
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, bands)| *bands)
            .unwrap_or(self.default_index_bands)
            .iter()
            .map(|band| band.to_string())
            .collect()
    }

    /// Atmospheric correction implied by a product's processing level
    pub fn atmospheric_correction(&self, processing_level: Option<&str>) -> &'static str {
        match self.flavor {
            SceneFlavor::HighRes => match processing_level {
                Some(level) if level.contains("2A") => "applied",
                _ => "toa_reflectance",
            },
            SceneFlavor::ModerateRes => "surface_reflectance",
            SceneFlavor::Simulated => "simulated",
        }
    }
}

/// Health ladder by index family
pub fn vegetation_health(index: IndexType, value: f64) -> &'static str {
    match index {
        IndexType::Nbr => match value {
            v if v > 0.4 => "unburned",
            v if v > 0.1 => "low_severity",
            v if v > -0.1 => "moderate_severity",
            _ => "high_severity",
        },
        IndexType::Evi => match value {
            v if v > 0.5 => "excellent",
            v if v > 0.35 => "good",
            v if v > 0.2 => "moderate",
            _ => "poor",
        },
        index if index.is_greenness() => match value {
            v if v > 0.7 => "excellent",
            v if v > 0.5 => "good",
            v if v > 0.3 => "moderate",
            v if v > 0.1 => "poor",
            _ => "very_poor",
        },
        _ => match value {
            v if v > 0.6 => "good",
            v if v > 0.3 => "moderate",
            _ => "poor",
        },
    }
}
