//! Geographic bounding boxes.

use geo::{coord, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{CanopyError, Result};

/// Meters per degree of longitude at the equator
const METERS_PER_DEGREE_LON: f64 = 111_320.0;

/// Meters per degree of latitude (treated as constant)
const METERS_PER_DEGREE_LAT: f64 = 110_540.0;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Validated geographic bounding box in WGS 84 degrees.
///
/// Serialized as `[min_lon, min_lat, max_lon, max_lat]`. Deserialization goes
/// through the same validation as [`GeoBounds::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct GeoBounds {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl GeoBounds {
    /// Create bounds, rejecting inverted, degenerate or out-of-range boxes
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        validate_bounds(min_lon, min_lat, max_lon, max_lat)?;
        Ok(Self { min_lon, min_lat, max_lon, max_lat })
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Bounds as `[min_lon, min_lat, max_lon, max_lat]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Mean latitude of the box in degrees
    pub fn mean_latitude(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }

    /// Convert to a `geo::Rect` (x = longitude, y = latitude)
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    /// Center of the box as `[lon, lat]`
    pub fn centroid(&self) -> [f64; 2] {
        let center = self.to_rect().center();
        [center.x, center.y]
    }

    /// Approximate area in hectares.
    ///
    /// Equirectangular approximation: the longitude extent is scaled by the
    /// cosine of the mean latitude. Accurate enough at project scale; not a
    /// geodesic area.
    pub fn area_hectares(&self) -> f64 {
        let lat_scale = self.mean_latitude().to_radians().cos();
        let width_m = (self.max_lon - self.min_lon) * METERS_PER_DEGREE_LON * lat_scale;
        let height_m = (self.max_lat - self.min_lat) * METERS_PER_DEGREE_LAT;
        width_m * height_m / SQUARE_METERS_PER_HECTARE
    }
}

impl TryFrom<[f64; 4]> for GeoBounds {
    type Error = CanopyError;

    fn try_from(value: [f64; 4]) -> Result<Self> {
        GeoBounds::new(value[0], value[1], value[2], value[3])
    }
}

impl From<GeoBounds> for [f64; 4] {
    fn from(bounds: GeoBounds) -> Self {
        bounds.as_array()
    }
}

impl std::fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.4}, {:.4}, {:.4}, {:.4})",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

impl std::str::FromStr for GeoBounds {
    type Err = CanopyError;

    /// Parse `"min_lon,min_lat,max_lon,max_lat"`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(CanopyError::InvalidBounds {
                reason: format!("expected 4 comma-separated values, found {}", parts.len()),
            });
        }

        let mut values = [0.0; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse::<f64>().map_err(|_| CanopyError::InvalidBounds {
                reason: format!("'{}' is not a number", part),
            })?;
        }

        GeoBounds::try_from(values)
    }
}

/// Validate raw bounding-box coordinates
pub fn validate_bounds(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<()> {
    let invalid = |reason: String| Err(CanopyError::InvalidBounds { reason });

    if ![min_lon, min_lat, max_lon, max_lat].iter().all(|v| v.is_finite()) {
        return invalid("coordinates must be finite".to_string());
    }
    if !(-180.0..=180.0).contains(&min_lon) || !(-180.0..=180.0).contains(&max_lon) {
        return invalid(format!("longitude out of range [-180, 180]: {}, {}", min_lon, max_lon));
    }
    if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
        return invalid(format!("latitude out of range [-90, 90]: {}, {}", min_lat, max_lat));
    }
    if min_lon >= max_lon {
        return invalid(format!("min_lon {} must be less than max_lon {}", min_lon, max_lon));
    }
    if min_lat >= max_lat {
        return invalid(format!("min_lat {} must be less than max_lat {}", min_lat, max_lat));
    }

    Ok(())
}
