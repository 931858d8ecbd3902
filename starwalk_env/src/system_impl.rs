//! Production implementation of WalkContext using the system clock.

use crate::WalkContext;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// Production context backed by the system clock and OS entropy.
pub struct SystemContext {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl SystemContext {
    /// Creates a new SystemContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WalkContext for SystemContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }

    fn derive_rng(&self, _stream: u64) -> ChaCha8Rng {
        ChaCha8Rng::from_entropy()
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_system_context_time_is_monotonic() {
        let ctx = SystemContext::new();
        let t1 = ctx.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = ctx.now();

        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(5));
    }

    #[test]
    fn test_system_context_rng_is_unseeded() {
        let ctx = SystemContext::new();
        let a: u64 = ctx.derive_rng(1).gen();
        let b: u64 = ctx.derive_rng(1).gen();

        // Same stream, fresh entropy each time
        assert_ne!(a, b);
    }

    #[test]
    fn test_system_context_seed() {
        let ctx = SystemContext::new();
        assert_eq!(ctx.seed(), 0);
    }
}
