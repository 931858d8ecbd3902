//! Nearest-target bookkeeping for a live set of collectible points.

use crate::geo_point::GeoPoint;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opaque handle to a target.
///
/// Ids keep increasing across `begin` calls, so an id from an earlier batch
/// never names a target in the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "star-{}", self.0)
    }
}

/// A collectible point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub position: GeoPoint,
    pub captured: bool,
}

/// Tracks live targets and answers "which one is the observer standing at?".
///
/// Targets are kept in insertion order, so scans (and tie-breaks) are
/// deterministic.
#[derive(Debug, Default)]
pub struct ProximityTracker {
    live: Vec<Target>,
    next_id: u64,
}

impl ProximityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live set. Ids are assigned in input order.
    pub fn begin<I>(&mut self, points: I) -> Vec<TargetId>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        self.live.clear();
        for position in points {
            let id = TargetId(self.next_id);
            self.next_id += 1;
            self.live.push(Target {
                id,
                position,
                captured: false,
            });
        }
        self.live.iter().map(|t| t.id).collect()
    }

    /// Nearest live target and its great-circle distance in meters.
    ///
    /// Equidistant targets resolve to the one inserted first.
    pub fn nearest(&self, observer: GeoPoint) -> Option<(TargetId, f64)> {
        let mut best: Option<(TargetId, f64)> = None;
        for target in &self.live {
            let dist = observer.distance_to(&target.position);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((target.id, dist));
            }
        }
        best
    }

    /// Returns the nearest target if it is strictly closer than `threshold_m`.
    pub fn update(&self, observer: GeoPoint, threshold_m: f64) -> Option<TargetId> {
        self.nearest(observer)
            .filter(|&(_, dist)| dist < threshold_m)
            .map(|(id, _)| id)
    }

    /// Removes a target. Unknown (or already captured) ids are a no-op.
    pub fn capture(&mut self, id: TargetId) -> Option<Target> {
        let index = self.live.iter().position(|t| t.id == id)?;
        let mut target = self.live.remove(index);
        target.captured = true;
        debug!(%id, remaining = self.live.len(), "Captured target");
        Some(target)
    }

    /// Number of live targets.
    pub fn remaining(&self) -> usize {
        self.live.len()
    }

    pub fn is_complete(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops every live target.
    pub fn clear(&mut self) {
        self.live.clear();
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.live.iter()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.live.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gp(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_walk_between_two_targets() {
        let mut tracker = ProximityTracker::new();
        let ids = tracker.begin([gp(0.0, 0.0), gp(0.0, 0.001)]);

        assert_eq!(tracker.update(gp(0.0, 0.0), 50.0), Some(ids[0]));
        assert!(tracker.capture(ids[0]).is_some());
        assert_eq!(tracker.remaining(), 1);

        assert_eq!(tracker.update(gp(0.0, 0.001), 50.0), Some(ids[1]));
    }

    #[test]
    fn test_nearest_over_threshold_is_not_returned() {
        let mut tracker = ProximityTracker::new();
        tracker.begin([gp(0.0, 0.001)]);

        // ~111m away
        assert!(tracker.nearest(gp(0.0, 0.0)).is_some());
        assert_eq!(tracker.update(gp(0.0, 0.0), 50.0), None);
    }

    #[test]
    fn test_tie_breaks_on_insertion_order() {
        let mut tracker = ProximityTracker::new();
        let ids = tracker.begin([gp(0.0, 0.0001), gp(0.0, -0.0001)]);

        assert_eq!(tracker.update(gp(0.0, 0.0), 50.0), Some(ids[0]));
    }

    #[test]
    fn test_capture_is_idempotent() {
        let mut tracker = ProximityTracker::new();
        let ids = tracker.begin([gp(1.0, 1.0), gp(2.0, 2.0)]);

        let first = tracker.capture(ids[0]).unwrap();
        assert!(first.captured);
        assert_eq!(tracker.remaining(), 1);

        assert!(tracker.capture(ids[0]).is_none());
        assert_eq!(tracker.remaining(), 1);
        assert_eq!(tracker.get(ids[1]).map(|t| t.position), Some(gp(2.0, 2.0)));
    }

    #[test]
    fn test_ids_do_not_alias_across_batches() {
        let mut tracker = ProximityTracker::new();
        let old = tracker.begin([gp(0.0, 0.0)]);
        let new = tracker.begin([gp(0.0, 0.0)]);

        assert_ne!(old[0], new[0]);
        assert!(tracker.capture(old[0]).is_none());
        assert_eq!(tracker.remaining(), 1);
    }

    #[test]
    fn test_empty_tracker() {
        let mut tracker = ProximityTracker::new();
        assert!(tracker.begin(std::iter::empty()).is_empty());
        assert!(tracker.is_complete());
        assert_eq!(tracker.update(gp(0.0, 0.0), 1e9), None);
    }

    proptest! {
        #[test]
        fn prop_update_never_returns_target_at_or_over_threshold(
            targets in prop::collection::vec((-0.01f64..0.01, -0.01f64..0.01), 1..20),
            threshold in 1.0f64..2000.0,
        ) {
            let mut tracker = ProximityTracker::new();
            tracker.begin(targets.iter().map(|&(lat, lon)| gp(lat, lon)));
            let observer = gp(0.0, 0.0);

            if let Some(id) = tracker.update(observer, threshold) {
                let target = tracker.get(id).unwrap();
                prop_assert!(observer.distance_to(&target.position) < threshold);
            }
        }
    }
}
