//! JSON exporter for replaying a simulated walk on a map.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use starwalk_core::{GeoPoint, SessionNotice, SessionSummary, Target};
use std::fs::File;
use std::io::Write;

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Simulation time in seconds
    pub time_sec: f64,

    /// Ground-truth walker position
    pub walker: GeoPoint,

    /// Reported fix, if the tick produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observer: Option<GeoPoint>,

    /// Stars still to collect
    pub targets: Vec<TargetPosition>,

    /// Points on the recorded route so far
    pub route_len: usize,

    /// Bag counter as shown to the player
    pub bag: String,

    /// Session notices raised on this tick
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SimEvent>,
}

/// Position of a live star.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPosition {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Target> for TargetPosition {
    fn from(target: &Target) -> Self {
        Self {
            id: target.id.0,
            latitude: target.position.latitude(),
            longitude: target.position.longitude(),
        }
    }
}

/// Simulation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub message: String,
    /// `capture` for collections and completion, `info` for range changes
    pub level: String,
}

impl From<&SessionNotice> for SimEvent {
    fn from(notice: &SessionNotice) -> Self {
        let level = match notice {
            SessionNotice::Captured { .. } | SessionNotice::AllTargetsCaptured(_) => "capture",
            SessionNotice::CaptureAvailable(_) | SessionNotice::CaptureUnavailable => "info",
        };
        Self {
            message: format!("{notice:?}"),
            level: level.to_string(),
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Duration in seconds
    pub duration_sec: f64,

    /// Play-area outline around the start position
    pub play_area: Vec<GeoPoint>,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    /// Completion summary, if every star was collected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            duration_sec: 0.0,
            play_area: Vec::new(),
            frames: Vec::new(),
            passed: false,
            summary: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, summary: Option<SessionSummary>) {
        self.passed = passed;
        self.summary = summary;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starwalk_core::TargetId;

    #[test]
    fn test_event_level_follows_notice_kind() {
        let captured = SimEvent::from(&SessionNotice::Captured { id: TargetId(3), remaining: 1 });
        assert_eq!(captured.level, "capture");
        assert!(captured.message.contains("Captured"));

        let in_range = SimEvent::from(&SessionNotice::CaptureAvailable(TargetId(3)));
        assert_eq!(in_range.level, "info");
        assert_eq!(SimEvent::from(&SessionNotice::CaptureUnavailable).level, "info");
    }
}
