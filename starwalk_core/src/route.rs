//! Walked-route accumulation and timing.

use crate::geo_point::GeoPoint;
use geo::LineString;
use std::time::Duration;

/// Records the observer's path and the time since the walk started.
///
/// Consecutive duplicate points are dropped so zero-length segments never
/// reach the distance sum.
#[derive(Debug, Default, Clone)]
pub struct RouteAccumulator {
    points: Vec<GeoPoint>,
    started_at: Option<Duration>,
}

impl RouteAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the path and forgets the start time.
    pub fn reset(&mut self) {
        self.points.clear();
        self.started_at = None;
    }

    /// Marks the start of the walk.
    pub fn start(&mut self, now: Duration) {
        self.started_at = Some(now);
    }

    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    /// Appends `point` unless it equals the last recorded point.
    ///
    /// The first recorded point starts the clock if `start` was not called.
    /// Returns whether the point was appended.
    pub fn record(&mut self, point: GeoPoint, now: Duration) -> bool {
        if self.points.last() == Some(&point) {
            return false;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.points.push(point);
        true
    }

    /// Sum of great-circle distances between consecutive points, in meters.
    pub fn total_distance_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    /// Time since the start, zero if the walk never started.
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.started_at
            .map(|start| now.saturating_sub(start))
            .unwrap_or_default()
    }

    /// Elapsed time as `HH:MM:SS`. Hours wrap at 24.
    pub fn elapsed_hms(&self, now: Duration) -> String {
        format_hms(self.elapsed(now))
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The path as a `geo` line string, for the host's map polyline.
    pub fn to_line_string(&self) -> LineString<f64> {
        self.points.iter().map(|p| p.to_point()).collect()
    }
}

/// Formats a duration as zero-padded `HH:MM:SS`.
///
/// Hours are taken modulo 24, so a 25 hour walk reads `01:00:00`.
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    let s = total % 60;
    let m = total / 60 % 60;
    let h = total / 3600 % 24;
    format!("{h:02}:{m:02}:{s:02}")
}
