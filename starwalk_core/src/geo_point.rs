//! Geographic coordinate value type and great-circle distance.

use crate::error::{Result, WalkError};
use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Always valid: latitude in [-90, 90], longitude in [-180, 180], never NaN.
/// Deserialization goes through the same checks as [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = WalkError;

    fn try_from(raw: RawGeoPoint) -> Result<Self> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Creates a validated point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WalkError::invalid(format!("latitude {latitude} out of range")));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WalkError::invalid(format!("longitude {longitude} out of range")));
        }
        Ok(Self { latitude, longitude })
    }

    /// Creates a point, wrapping longitude into [-180, 180).
    ///
    /// Latitude is still validated; it cannot be wrapped meaningfully.
    pub fn wrapped(latitude: f64, longitude: f64) -> Result<Self> {
        if !longitude.is_finite() {
            return Err(WalkError::invalid(format!("longitude {longitude} is not finite")));
        }
        Self::new(latitude, wrap_longitude(longitude))
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine great-circle distance in meters (mean Earth radius).
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        self.to_point().haversine_distance(&other.to_point())
    }

    /// Converts to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Wraps a longitude in degrees into [-180, 180).
pub fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GeoPoint::new(90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 1.0).unwrap();
        assert_relative_eq!(a.distance_to(&b), 111_195.0, max_relative = 0.01);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(37.7749, -122.4194).unwrap();
        let b = GeoPoint::new(37.7849, -122.4094).unwrap();
        assert_relative_eq!(a.distance_to(&b), b.distance_to(&a), epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_relative_eq!(wrap_longitude(190.0), -170.0, epsilon = 1e-9);
        assert_relative_eq!(wrap_longitude(-190.0), 170.0, epsilon = 1e-9);
        assert_relative_eq!(wrap_longitude(45.0), 45.0, epsilon = 1e-9);
        assert!(GeoPoint::wrapped(91.0, 0.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: GeoPoint = serde_json::from_str(r#"{"latitude":1.5,"longitude":2.5}"#).unwrap();
        assert_eq!(ok, GeoPoint::new(1.5, 2.5).unwrap());

        let bad = serde_json::from_str::<GeoPoint>(r#"{"latitude":100.0,"longitude":0.0}"#);
        assert!(bad.is_err());
    }
}
