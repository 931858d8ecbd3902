//! Outline of the play area around a session's start position.

use crate::error::{Result, WalkError};
use crate::geo_point::{wrap_longitude, GeoPoint};
use geo::{Coord, LineString, Polygon};
use std::f64::consts::PI;

/// Earth radius used for the outline in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Inset from the poles and antimeridian for the outer world boundary.
const WORLD_INSET_DEG: f64 = 0.01;

/// Default number of ring vertices.
pub const DEFAULT_RING_POINTS: usize = 50;

/// Vertices of a circle of `radius_m` around `center`.
///
/// Offsets are computed in degrees with the longitude radius stretched by
/// `1 / cos(latitude)`. The ring is open; the first vertex is not repeated.
pub fn play_area_ring(center: GeoPoint, radius_m: f64, points: usize) -> Result<Vec<GeoPoint>> {
    if !(radius_m.is_finite() && radius_m > 0.0) {
        return Err(WalkError::invalid(format!("radius must be positive, got {radius_m}")));
    }
    if points < 3 {
        return Err(WalkError::invalid("a ring needs at least 3 points"));
    }

    let radius_lat = (radius_m / 1000.0 / EARTH_RADIUS_KM).to_degrees();
    let radius_lon = radius_lat / center.latitude().to_radians().cos();
    let step = 2.0 * PI / points as f64;

    (0..points)
        .map(|i| {
            let theta = i as f64 * step;
            let lat = (center.latitude() + radius_lat * theta.sin()).clamp(-90.0, 90.0);
            let lon = wrap_longitude(center.longitude() + radius_lon * theta.cos());
            GeoPoint::new(lat, lon)
        })
        .collect()
}

/// The world minus the play area: an outer boundary with the ring as a hole.
///
/// Hosts fill this to grey out everything outside the circle.
pub fn play_area_polygon(center: GeoPoint, radius_m: f64, points: usize) -> Result<Polygon<f64>> {
    let ring = play_area_ring(center, radius_m, points)?;
    let hole: LineString<f64> = ring.iter().map(|p| p.to_point()).collect();
    Ok(Polygon::new(world_boundary(), vec![hole]))
}

fn world_boundary() -> LineString<f64> {
    let top = 90.0 - WORLD_INSET_DEG;
    let bottom = -90.0 + WORLD_INSET_DEG;
    let west = -180.0 + WORLD_INSET_DEG;
    let east = 180.0 - WORLD_INSET_DEG;

    LineString::new(vec![
        Coord { x: west, y: top },
        Coord { x: west, y: 0.0 },
        Coord { x: west, y: bottom },
        Coord { x: 0.0, y: bottom },
        Coord { x: east, y: bottom },
        Coord { x: east, y: 0.0 },
        Coord { x: east, y: top },
        Coord { x: 0.0, y: top },
        Coord { x: west, y: top },
    ])
}
