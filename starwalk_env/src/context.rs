//! Core environment context trait for Starwalk sessions.

use rand_chacha::ChaCha8Rng;
use std::time::{Duration, SystemTime};

/// The central interface for environment interaction.
///
/// This trait abstracts the "real world" so a walking session can run on a
/// device (system clock, OS entropy) and in the simulator (virtual clock,
/// seeded RNG) without changing the session logic.
///
/// # Implementations
///
/// - **Production**: `SystemContext` - wraps `Instant`, entropy-seeded RNG
/// - **Simulation**: `SimContext` - manual virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// Everything that would normally introduce non-determinism (time,
/// randomness) is controlled by the implementation.
pub trait WalkContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// This is the timestamp fed to route timing. In simulation it is the
    /// virtual clock.
    fn now(&self) -> Duration;

    /// Returns the wall-clock time.
    fn system_time(&self) -> SystemTime;

    /// Derives an RNG for the given stream.
    ///
    /// In simulation the seed is combined with `stream`, so the same stream
    /// always yields the same sequence. In production every call is freshly
    /// seeded from entropy.
    ///
    /// # Arguments
    /// * `stream` - A value distinguishing independent consumers
    fn derive_rng(&self, stream: u64) -> ChaCha8Rng;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64;
}
