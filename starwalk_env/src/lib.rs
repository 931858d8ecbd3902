//! Starwalk Environment Abstraction Layer
//!
//! Everything a walking session needs from the outside world that is not a
//! position fix: a clock and a source of randomness. Sessions take a
//! `WalkContext` so the same logic runs on a device (`SystemContext`) and in
//! the deterministic simulator (`starwalk_sim::SimContext`).
//!
//! By deriving all entropy from a single 64-bit seed, any simulated walk is
//! reproducible via its seed number.

mod context;
mod types;
mod system_impl;

pub use context::WalkContext;
pub use types::SessionId;
pub use system_impl::SystemContext;
