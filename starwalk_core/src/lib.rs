//! Starwalk Core - geolocated star collecting
//!
//! Places collectible "stars" at random inside a circle around the player,
//! reports when the player is close enough to collect one, and traces the
//! walked route:
//! 1. **RegionSampler**: areally uniform points in a geographic disc
//! 2. **ProximityTracker**: nearest live target within a capture threshold
//! 3. **RouteAccumulator**: deduplicated path, great-circle length, timing
//!
//! `Session` wires the three together as an explicit state machine driven by
//! host events. Nothing here renders, tracks poses or touches the network.

pub mod error;
pub mod config;
pub mod geo_point;
pub mod region_sampler;
pub mod proximity;
pub mod route;
pub mod play_area;
pub mod source;
pub mod session;

// Re-export key types for convenience
pub use error::{Result, WalkError};
pub use config::SessionConfig;
pub use geo_point::GeoPoint;
pub use region_sampler::RegionSampler;
pub use proximity::{ProximityTracker, Target, TargetId};
pub use route::{format_hms, RouteAccumulator};
pub use play_area::{play_area_polygon, play_area_ring, DEFAULT_RING_POINTS};
pub use source::{PositionSource, ReplaySource};
pub use session::{Session, SessionEvent, SessionNotice, SessionState, SessionSummary};
