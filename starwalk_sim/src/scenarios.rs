//! Walking scenarios for deterministic simulation.

use starwalk_core::{GeoPoint, Result, SessionConfig};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// SW-001: Clean fixes, default session, collect everything
    Stroll,

    /// SW-002: 3m GPS noise around the capture threshold
    NoisyGps,

    /// SW-003: Session centered at 89°N, longitude scaling at its worst
    PolarCircle,

    /// SW-004: Play area straddling the antimeridian
    DateLine,

    /// SW-005: 30% of ticks produce no fix
    Dropout,

    /// SW-006: Player gives up halfway
    Abandon,
}

/// Everything a scenario changes about a run.
#[derive(Debug, Clone)]
pub struct WalkSetup {
    pub center: GeoPoint,
    pub session: SessionConfig,
    pub gps_noise_std_m: f64,
    pub dropout_rate: f64,
    /// End the session after this many seconds instead of finishing
    pub abandon_after_secs: Option<f64>,
    /// Compare the recorded route length with the ground-truth walk
    pub check_route_length: bool,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Stroll,
            ScenarioId::NoisyGps,
            ScenarioId::PolarCircle,
            ScenarioId::DateLine,
            ScenarioId::Dropout,
            ScenarioId::Abandon,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Stroll => "stroll",
            ScenarioId::NoisyGps => "noisy_gps",
            ScenarioId::PolarCircle => "polar_circle",
            ScenarioId::DateLine => "date_line",
            ScenarioId::Dropout => "dropout",
            ScenarioId::Abandon => "abandon",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Stroll => "5 stars in 1km, perfect GPS, route length must match the walk",
            ScenarioId::NoisyGps => "5 stars in 1km, 3m GPS noise",
            ScenarioId::PolarCircle => "10 stars in 1km around 89°N",
            ScenarioId::DateLine => "5 stars in 1km around 180° longitude",
            ScenarioId::Dropout => "5 stars in 1km, 30% of fixes lost",
            ScenarioId::Abandon => "session ended after 5 minutes, state must reset",
        }
    }

    /// Builds the run parameters, with `default_noise_m` for scenarios
    /// that do not set their own noise.
    pub fn setup(&self, default_noise_m: f64) -> Result<WalkSetup> {
        let base = WalkSetup {
            center: GeoPoint::new(37.7749, -122.4194)?,
            session: SessionConfig::default(),
            gps_noise_std_m: default_noise_m,
            dropout_rate: 0.0,
            abandon_after_secs: None,
            check_route_length: false,
        };

        Ok(match self {
            ScenarioId::Stroll => WalkSetup {
                gps_noise_std_m: 0.0,
                check_route_length: true,
                ..base
            },
            ScenarioId::NoisyGps => WalkSetup {
                gps_noise_std_m: 3.0,
                ..base
            },
            ScenarioId::PolarCircle => WalkSetup {
                center: GeoPoint::new(89.0, 45.0)?,
                session: SessionConfig::default().with_star_count(10),
                ..base
            },
            ScenarioId::DateLine => WalkSetup {
                center: GeoPoint::new(-17.7134, 179.999)?,
                ..base
            },
            ScenarioId::Dropout => WalkSetup {
                dropout_rate: 0.3,
                ..base
            },
            ScenarioId::Abandon => WalkSetup {
                abandon_after_secs: Some(300.0),
                ..base
            },
        })
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stroll" | "sw-001" => Ok(ScenarioId::Stroll),
            "noisy_gps" | "noisygps" | "sw-002" => Ok(ScenarioId::NoisyGps),
            "polar_circle" | "polarcircle" | "sw-003" => Ok(ScenarioId::PolarCircle),
            "date_line" | "dateline" | "sw-004" => Ok(ScenarioId::DateLine),
            "dropout" | "sw-005" => Ok(ScenarioId::Dropout),
            "abandon" | "sw-006" => Ok(ScenarioId::Abandon),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
