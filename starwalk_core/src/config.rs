//! Session configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a walking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of stars placed per session (default: 5)
    pub star_count: usize,

    /// Radius of the play area around the start position in meters (default: 1000)
    pub radius_m: f64,

    /// Distance at which a star can be collected in meters (default: 10)
    pub capture_threshold_m: f64,

    /// Resample attempts per star before giving up (default: 1000)
    pub max_sample_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            star_count: 5,
            radius_m: 1000.0,
            capture_threshold_m: 10.0,
            max_sample_attempts: 1000,
        }
    }
}

impl SessionConfig {
    pub fn with_star_count(mut self, count: usize) -> Self {
        self.star_count = count;
        self
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_capture_threshold(mut self, threshold_m: f64) -> Self {
        self.capture_threshold_m = threshold_m;
        self
    }

    pub fn with_max_sample_attempts(mut self, attempts: u32) -> Self {
        self.max_sample_attempts = attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"star_count": 3}"#).unwrap();
        assert_eq!(config.star_count, 3);
        assert_eq!(config.radius_m, 1000.0);
        assert_eq!(config.capture_threshold_m, 10.0);
    }
}
