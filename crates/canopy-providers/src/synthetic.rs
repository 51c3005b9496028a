//! Synthetic scene calendars and index statistics.

use std::collections::BTreeMap;

use canopy_core::models::{
    sort_by_acquisition, DateWindow, GeoBounds, IndexStatistics, IndexType, SceneMetadata,
};
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

use crate::profile::{SceneFlavor, SensorProfile};
use crate::random::{CallKey, SeedSource};
use crate::round_to;

const TILE_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";

/// Statistics plus the per-call quality numbers drawn alongside them
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticMeasurement {
    pub statistics: IndexStatistics,
    pub shadow_contamination_pct: f64,
    pub data_quality_score: f64,
}

/// Generates plausible scenes and statistics from a sensor profile
#[derive(Debug, Clone)]
pub struct SyntheticStrategy {
    name: String,
    profile: SensorProfile,
    seed: SeedSource,
}

impl SyntheticStrategy {
    pub fn new(name: impl Into<String>, profile: SensorProfile, seed: SeedSource) -> Self {
        Self { name: name.into(), profile, seed }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    /// Scene calendar for the window, ascending by date.
    ///
    /// Candidate dates are spaced by a random revisit interval and each is
    /// kept with the profile's presence probability. A window at least one
    /// full revisit cycle long always yields a scene.
    pub fn scenes(&self, bounds: &GeoBounds, window: &DateWindow) -> Vec<SceneMetadata> {
        let mut rng = self.seed.rng_for(&CallKey {
            provider: &self.name,
            operation: "scenes",
            bounds,
            window,
            index: None,
        });

        let (min_step, max_step) = self.profile.revisit_days;
        let mut scenes = Vec::new();
        let mut date = window.start();

        while date <= window.end() {
            if rng.gen_bool(self.profile.presence_probability) {
                scenes.push(self.make_scene(date, scenes.len(), &mut rng));
            }
            date += Duration::days(i64::from(rng.gen_range(min_step..=max_step)));
        }

        if scenes.is_empty() && window.days() >= i64::from(max_step) {
            scenes.push(self.make_scene(window.start(), 0, &mut rng));
        }

        sort_by_acquisition(&mut scenes);
        tracing::debug!(
            provider = %self.name,
            window = %window,
            count = scenes.len(),
            "Generated synthetic scenes"
        );
        scenes
    }

    /// Index statistics composited from `scenes`
    pub fn measure(
        &self,
        bounds: &GeoBounds,
        window: &DateWindow,
        index: IndexType,
        scenes: &[SceneMetadata],
    ) -> SyntheticMeasurement {
        let mut rng = self.seed.rng_for(&CallKey {
            provider: &self.name,
            operation: "statistics",
            bounds,
            window,
            index: Some(index),
        });
        let profile = &self.profile;

        let base = profile.index_base(index).unwrap_or(0.5);

        let seasonal = scenes
            .get(scenes.len() / 2)
            .map(|scene| {
                let day_of_year = f64::from(scene.acquisition_date.ordinal());
                profile.seasonal_amplitude * (day_of_year / 365.0 * std::f64::consts::TAU).sin()
            })
            .unwrap_or(0.0);

        let avg_cloud = if scenes.is_empty() {
            10.0
        } else {
            scenes.iter().map(|scene| scene.cloud_cover_pct).sum::<f64>() / scenes.len() as f64
        };
        let cloud_penalty = avg_cloud / profile.cloud_divisor;

        let noise = rng.gen_range(-profile.noise_amplitude..=profile.noise_amplitude);
        let mean = (base + profile.resolution_boost + profile.temporal_bonus + seasonal
            - cloud_penalty
            + noise)
            .clamp(0.0, 1.0);

        let std = rng.gen_range(profile.std_range.0..=profile.std_range.1);
        let min = (mean - profile.spread_factor * std).max(0.0);
        let max = (mean + profile.spread_factor * std).min(1.0);
        let median = (mean + rng.gen_range(-0.02..=0.02)).clamp(min, max);

        let pixels_per_hectare = 10_000.0 / (profile.resolution_m * profile.resolution_m);
        let pixel_count = (bounds.area_hectares() * pixels_per_hectare) as u64;
        let valid_pixel_count = (pixel_count as f64 * profile.valid_pixel_ratio) as u64;

        SyntheticMeasurement {
            statistics: IndexStatistics {
                mean: round_to(mean, 4),
                std: round_to(std, 4),
                min: round_to(min, 4),
                max: round_to(max, 4),
                median: round_to(median, 4),
                pixel_count,
                valid_pixel_count: valid_pixel_count.min(pixel_count),
            },
            shadow_contamination_pct: round_to(rng.gen_range(0.0..=profile.shadow_max_pct), 2),
            data_quality_score: round_to(
                rng.gen_range(profile.quality_score_range.0..=profile.quality_score_range.1),
                3,
            ),
        }
    }

    fn make_scene(&self, date: NaiveDate, ordinal: usize, rng: &mut StdRng) -> SceneMetadata {
        let profile = &self.profile;
        let spacecraft = profile.spacecraft.choose(rng).copied().unwrap_or(profile.platform);
        let cloud_cover_pct =
            round_to(rng.gen_range(profile.cloud_cover_range.0..=profile.cloud_cover_range.1), 2);
        let stamp = date.format("%Y%m%d");

        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), json!("synthetic"));

        let id = match profile.flavor {
            SceneFlavor::HighRes => {
                let tile = format!(
                    "{:02}{}{}{}",
                    rng.gen_range(10..=60),
                    random_letter(rng),
                    random_letter(rng),
                    random_letter(rng)
                );
                let relative_orbit: u32 = rng.gen_range(1..=143);
                let unit = spacecraft.chars().last().unwrap_or('A');
                metadata.insert("tile_id".to_string(), json!(tile));
                metadata.insert("relative_orbit".to_string(), json!(relative_orbit));
                metadata.insert("orbit_direction".to_string(), json!("DESCENDING"));
                format!(
                    "S2{}_MSIL2A_{}T{:06}_N0509_R{:03}_T{}",
                    unit,
                    stamp,
                    rng.gen_range(100_000..=235_959),
                    relative_orbit,
                    tile
                )
            }
            SceneFlavor::ModerateRes => {
                let path: u32 = rng.gen_range(1..=233);
                let row: u32 = rng.gen_range(1..=248);
                let mission = if spacecraft.ends_with('9') { "09" } else { "08" };
                metadata.insert("wrs_path".to_string(), json!(path));
                metadata.insert("wrs_row".to_string(), json!(row));
                metadata.insert("collection".to_string(), json!("02"));
                metadata.insert("sun_elevation".to_string(), json!(round_to(rng.gen_range(35.0..=65.0), 2)));
                format!("LC{}_L2SP_{:03}{:03}_{}_02_T1", mission, path, row, stamp)
            }
            SceneFlavor::Simulated => format!("SIM_{}_{:04}", stamp, ordinal),
        };

        SceneMetadata {
            url: format!("{}/{}", profile.product_base_url, id),
            id,
            acquisition_date: date,
            platform: spacecraft.to_string(),
            sensor: profile.sensor.to_string(),
            resolution_m: profile.resolution_m,
            cloud_cover_pct,
            bands: profile.bands.iter().map(|band| band.to_string()).collect(),
            processing_level: profile.processing_level.to_string(),
            metadata,
        }
    }
}

fn random_letter(rng: &mut StdRng) -> char {
    TILE_LETTERS.choose(rng).map(|b| *b as char).unwrap_or('X')
}
