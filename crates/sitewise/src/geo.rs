//! Spherical distance math over validated latitude/longitude pairs.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles, used for every great-circle computation in
/// this crate. The radius and the returned unit must never diverge: all
/// distances produced here are miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Per-axis tolerance, in degrees, under which two coordinates count as the
/// same physical point (roughly 11 meters of latitude). This is a deliberate
/// identity rule for self-conflict filtering and edit detection, not a
/// general GPS noise allowance.
pub const SAME_POINT_EPSILON_DEG: f64 = 1e-4;

/// Immutable, validated geographic point.
///
/// Construction goes through [`Coordinate::new`], so a value of this type is
/// always finite and inside the valid latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Whether `other` falls within [`SAME_POINT_EPSILON_DEG`] of `self` on
    /// both axes.
    pub fn is_same_point(&self, other: Coordinate) -> bool {
        (self.lat - other.lat).abs() <= SAME_POINT_EPSILON_DEG
            && (self.lng - other.lng).abs() <= SAME_POINT_EPSILON_DEG
    }
}

/// Rejected coordinate input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("latitude and longitude must be finite")]
    NotFinite,
}

/// Great-circle distance between two points, in miles, via the Haversine
/// formula.
///
/// Total over all valid coordinates: symmetric, non-negative, and never
/// panics. The intermediate `h` term is clamped to `[0, 1]` so floating-point
/// overshoot near antipodal points cannot push `sqrt` out of domain.
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}
