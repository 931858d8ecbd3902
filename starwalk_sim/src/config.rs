//! Simulation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Position fixes per second
    pub tick_rate_hz: u32,

    /// Maximum simulated walking time in seconds
    pub max_duration_secs: f64,

    /// Walking speed in m/s
    pub walker_speed_mps: f64,

    /// GPS noise standard deviation in meters (0 = perfect fixes)
    pub gps_noise_std_m: f64,

    /// Ticks between exported frames
    pub export_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate_hz: 1,
            max_duration_secs: 4.0 * 3600.0,
            walker_speed_mps: 1.4,
            gps_noise_std_m: 0.0,
            export_interval_ticks: 10,
        }
    }
}
