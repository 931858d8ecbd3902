//! Position input from the host.

use crate::geo_point::GeoPoint;
use std::collections::VecDeque;

/// Supplies the observer's position once per update tick.
///
/// The host decides the tick frequency and thread. `None` means there is no
/// fix this tick (tracking lost, sensor warming up) and the tick is skipped.
pub trait PositionSource {
    fn next_position(&mut self) -> Option<GeoPoint>;
}

/// Replays a fixed list of fixes, then reports no fix.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    fixes: VecDeque<GeoPoint>,
}

impl ReplaySource {
    pub fn new(fixes: impl IntoIterator<Item = GeoPoint>) -> Self {
        Self {
            fixes: fixes.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }
}

impl PositionSource for ReplaySource {
    fn next_position(&mut self) -> Option<GeoPoint> {
        self.fixes.pop_front()
    }
}
