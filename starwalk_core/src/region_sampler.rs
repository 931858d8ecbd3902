//! Uniform random placement of points inside a geographic disc.
//!
//! The disc is sampled in degree space with a flat-Earth approximation:
//!
//! ```text
//! r_deg = radius_m / 111000
//! w     = r_deg * sqrt(u)        u, v ~ U[0, 1)
//! t     = 2π v
//! lat   = center.lat + w sin t
//! lon   = center.lon + w cos t / cos(center.lat)
//! ```
//!
//! `sqrt(u)` gives uniform areal density; without it samples cluster at the
//! center. The approximation overshoots slightly (111000 m is a little short
//! of a spherical degree) and degrades near the poles, so every candidate is
//! checked against its true great-circle distance and rejected if it is not
//! strictly inside the radius.

use crate::error::{Result, WalkError};
use crate::geo_point::GeoPoint;
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;

/// Meters per degree used for the degree-space radius.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Draws uniformly distributed points inside a circular region.
#[derive(Debug, Clone)]
pub struct RegionSampler {
    max_attempts: u32,
}

impl Default for RegionSampler {
    fn default() -> Self {
        Self { max_attempts: 1000 }
    }
}

impl RegionSampler {
    /// Creates a sampler that gives up after `max_attempts` rejections.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Samples one point strictly within `radius_m` meters of `center`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center: GeoPoint,
        radius_m: f64,
    ) -> Result<GeoPoint> {
        validate_radius(radius_m)?;

        for attempt in 1..=self.max_attempts {
            if let Some(point) = candidate(rng, center, radius_m) {
                if center.distance_to(&point) < radius_m {
                    return Ok(point);
                }
            }
            debug!(attempt, %center, radius_m, "Resampling point outside region");
        }

        Err(WalkError::SamplingExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Samples `count` independent points.
    pub fn sample_batch<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center: GeoPoint,
        radius_m: f64,
        count: usize,
    ) -> Result<Vec<GeoPoint>> {
        if count == 0 {
            return Err(WalkError::invalid("target count must be positive"));
        }
        (0..count).map(|_| self.sample(rng, center, radius_m)).collect()
    }
}

fn validate_radius(radius_m: f64) -> Result<()> {
    if radius_m.is_finite() && radius_m > 0.0 {
        Ok(())
    } else {
        Err(WalkError::invalid(format!("radius must be positive, got {radius_m}")))
    }
}

/// One flat-Earth draw. `None` if it lands on an invalid latitude.
fn candidate<R: Rng + ?Sized>(rng: &mut R, center: GeoPoint, radius_m: f64) -> Option<GeoPoint> {
    let u: f64 = rng.gen();
    let v: f64 = rng.gen();

    let radius_deg = radius_m / METERS_PER_DEGREE;
    let w = radius_deg * u.sqrt();
    let t = 2.0 * PI * v;
    let dx = w * t.cos();
    let dy = w * t.sin();

    let lon_scale = center.latitude().to_radians().cos();
    GeoPoint::wrapped(center.latitude() + dy, center.longitude() + dx / lon_scale).ok()
}
