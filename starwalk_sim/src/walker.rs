//! Simulated pedestrian acting as the session's GPS.
//!
//! The Walker keeps the ground-truth position of the player:
//! - Walks toward a waypoint at constant speed
//! - Reports fixes with Gaussian noise (in meters, east/north)
//! - Occasionally drops a fix entirely

use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use starwalk_core::{GeoPoint, PositionSource};

/// Spherical radius for the local east/north approximation.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A simulated player walking between stars.
pub struct Walker {
    /// Ground-truth position
    position: GeoPoint,

    /// Where the walker is heading, if anywhere
    waypoint: Option<GeoPoint>,

    /// Walking speed in m/s
    speed_mps: f64,

    /// Seconds covered by one `next_position` call
    dt: f64,

    /// Position noise (meters); `None` for perfect fixes
    noise: Option<Normal<f64>>,

    /// Probability that a tick yields no fix (0.0 - 1.0)
    dropout_rate: f64,

    /// RNG for noise and dropouts
    rng: ChaCha8Rng,

    /// Meters walked (ground truth)
    walked_m: f64,
}

impl Walker {
    /// Creates a stationary walker at `start`.
    pub fn new(start: GeoPoint, speed_mps: f64, dt: f64, seed: u64) -> Self {
        Self {
            position: start,
            waypoint: None,
            speed_mps,
            dt,
            noise: None,
            dropout_rate: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            walked_m: 0.0,
        }
    }

    /// Sets the GPS noise standard deviation in meters.
    ///
    /// Non-positive or non-finite values disable noise.
    pub fn with_noise(mut self, std_dev_m: f64) -> Self {
        self.noise = Normal::new(0.0, std_dev_m)
            .ok()
            .filter(|_| std_dev_m > 0.0);
        self
    }

    /// Sets the probability of a tick producing no fix.
    pub fn with_dropout(mut self, rate: f64) -> Self {
        self.dropout_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn set_waypoint(&mut self, waypoint: Option<GeoPoint>) {
        self.waypoint = waypoint;
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn walked_m(&self) -> f64 {
        self.walked_m
    }

    /// Advances the ground truth by one tick.
    pub fn step(&mut self) {
        let Some(target) = self.waypoint else {
            return;
        };

        let offset = enu_offset(self.position, target);
        let distance = offset.norm();
        let reach = self.speed_mps * self.dt;

        if distance <= reach {
            self.position = target;
            self.walked_m += distance;
        } else {
            let step = offset * (reach / distance);
            // Latitude stays in range: the step heads toward a valid point
            if let Some(next) = apply_offset(self.position, step) {
                self.position = next;
                self.walked_m += reach;
            }
        }
    }

    /// The current fix as the device would report it.
    pub fn observe(&mut self) -> Option<GeoPoint> {
        if self.dropout_rate > 0.0 && self.rng.gen_bool(self.dropout_rate) {
            return None;
        }
        let Some(noise) = self.noise.as_ref() else {
            return Some(self.position);
        };
        let error = Vector2::new(noise.sample(&mut self.rng), noise.sample(&mut self.rng));
        apply_offset(self.position, error).or(Some(self.position))
    }
}

impl PositionSource for Walker {
    fn next_position(&mut self) -> Option<GeoPoint> {
        self.step();
        self.observe()
    }
}

/// East/north offset in meters from `from` to `to` (equirectangular).
pub fn enu_offset(from: GeoPoint, to: GeoPoint) -> Vector2<f64> {
    let mut dlon = to.longitude() - from.longitude();
    if dlon > 180.0 {
        dlon -= 360.0;
    } else if dlon < -180.0 {
        dlon += 360.0;
    }
    let dlat = to.latitude() - from.latitude();
    let mean_lat = ((from.latitude() + to.latitude()) / 2.0).to_radians();

    Vector2::new(
        dlon.to_radians() * EARTH_RADIUS_M * mean_lat.cos(),
        dlat.to_radians() * EARTH_RADIUS_M,
    )
}

/// Moves `from` by an east/north offset in meters.
pub fn apply_offset(from: GeoPoint, offset: Vector2<f64>) -> Option<GeoPoint> {
    let dlat = (offset.y / EARTH_RADIUS_M).to_degrees();
    let cos_lat = from.latitude().to_radians().cos().max(1e-9);
    let dlon = (offset.x / (EARTH_RADIUS_M * cos_lat)).to_degrees();
    GeoPoint::wrapped(from.latitude() + dlat, from.longitude() + dlon).ok()
}
