//! Scenario runner - walks a simulated player through a session.

use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::SimError;
use crate::exporter::{SimEvent, SimExport, SimFrame, TargetPosition};
use crate::scenarios::{ScenarioId, WalkSetup};
use crate::walker::Walker;

use starwalk_core::{
    format_hms, play_area_ring, Session, SessionEvent, SessionNotice, SessionState,
    SessionSummary, WalkError, DEFAULT_RING_POINTS,
};
use starwalk_env::WalkContext;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Total ticks executed
    pub total_ticks: u64,

    /// Final simulation time in seconds
    pub final_time_secs: f64,

    /// Stars collected before the run stopped
    pub stars_collected: usize,

    /// Completion summary, if the session finished
    pub summary: Option<SessionSummary>,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Fixes delivered to the session
    pub fixes: u64,

    /// Ticks without a fix
    pub dropped_fixes: u64,

    /// Stars collected
    pub captures: u64,

    /// Ground-truth distance walked (m)
    pub walked_m: f64,
}

/// What a finished walk looked like, before pass/fail is decided.
struct WalkOutcome {
    ticks: u64,
    elapsed: Duration,
    time_secs: f64,
    collected: usize,
    state: SessionState,
    route_len: usize,
    live_targets: usize,
    metrics: ScenarioMetrics,
}

/// Runs walking scenarios.
pub struct ScenarioRunner {
    config: SimConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self::from_config(SimConfig {
            seed,
            ..SimConfig::default()
        })
    }

    pub fn from_config(config: SimConfig) -> Self {
        Self { config }
    }

    /// Sets the tick rate.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.config.tick_rate_hz = hz.max(1);
        self
    }

    /// Sets the maximum duration.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.config.max_duration_secs = secs;
        self
    }

    /// Sets the GPS noise used by scenarios that do not pick their own.
    pub fn with_noise(mut self, std_dev_m: f64) -> Self {
        self.config.gps_noise_std_m = std_dev_m;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.run_inner(scenario, None)
    }

    /// Runs a scenario, recording frames into `export`.
    pub fn run_with_export(&self, scenario: ScenarioId, export: &mut SimExport) -> ScenarioResult {
        let result = self.run_inner(scenario, Some(&mut *export));
        export.finalize(result.passed, result.summary.clone());
        result
    }

    fn run_inner(&self, scenario: ScenarioId, export: Option<&mut SimExport>) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.config.seed);

        let mut result = ScenarioResult {
            scenario,
            seed: self.config.seed,
            passed: false,
            total_ticks: 0,
            final_time_secs: 0.0,
            stars_collected: 0,
            summary: None,
            failure_reason: None,
            metrics: ScenarioMetrics::default(),
        };

        let setup = match scenario.setup(self.config.gps_noise_std_m) {
            Ok(setup) => setup,
            Err(e) => {
                result.failure_reason = Some(e.to_string());
                return result;
            }
        };

        match self.walk(&setup, export) {
            Ok(outcome) => {
                result.total_ticks = outcome.ticks;
                result.final_time_secs = outcome.time_secs;
                result.stars_collected = outcome.collected;
                result.metrics = outcome.metrics.clone();
                if let SessionState::Complete(summary) = &outcome.state {
                    result.summary = Some(summary.clone());
                }
                result.failure_reason = check(&setup, &outcome);
                result.passed = result.failure_reason.is_none();
            }
            Err(e) => {
                warn!("Scenario {} aborted: {}", scenario.name(), e);
                result.failure_reason = Some(e.to_string());
            }
        }
        result
    }

    fn walk(&self, setup: &WalkSetup, mut export: Option<&mut SimExport>) -> Result<WalkOutcome, SimError> {
        let seed = self.config.seed;
        let walker_seed = seed.wrapping_mul(0x9e3779b97f4a7c15);
        let dt = 1.0 / self.config.tick_rate_hz.max(1) as f64;
        let max_ticks = (self.config.max_duration_secs * self.config.tick_rate_hz.max(1) as f64) as u64;

        let ctx = SimContext::shared(seed);
        let mut session = Session::new(ctx.clone(), setup.session.clone());
        session.begin(setup.center)?;

        let radius = setup.session.radius_m;
        if let Some(stray) = session
            .tracker()
            .targets()
            .find(|t| setup.center.distance_to(&t.position) >= radius)
        {
            return Err(WalkError::invalid(format!(
                "star {} placed outside the play area at {}",
                stray.id, stray.position
            ))
            .into());
        }

        if let Some(export) = export.as_deref_mut() {
            export.play_area = play_area_ring(setup.center, radius, DEFAULT_RING_POINTS)?;
        }

        let mut walker = Walker::new(setup.center, self.config.walker_speed_mps, dt, walker_seed)
            .with_noise(setup.gps_noise_std_m)
            .with_dropout(setup.dropout_rate);

        let mut metrics = ScenarioMetrics::default();
        let mut ticks = 0;

        for tick in 0..max_ticks {
            ticks = tick + 1;
            ctx.advance_time(Duration::from_secs_f64(dt));
            let time_secs = ctx.now().as_secs_f64();

            if setup.abandon_after_secs.is_some_and(|limit| time_secs >= limit) {
                info!("Abandoning session at t={:.0}s", time_secs);
                session.end();
                break;
            }

            let waypoint = session
                .tracker()
                .nearest(walker.position())
                .and_then(|(id, _)| session.tracker().get(id))
                .map(|t| t.position);
            walker.set_waypoint(waypoint);

            walker.step();
            let fix = walker.observe();
            let mut notices = match fix {
                Some(position) => {
                    metrics.fixes += 1;
                    session.handle(SessionEvent::ObserverMoved(position))
                }
                None => {
                    metrics.dropped_fixes += 1;
                    Vec::new()
                }
            };

            if notices
                .iter()
                .any(|n| matches!(n, SessionNotice::CaptureAvailable(_)))
            {
                notices.extend(session.capture_nearest()?);
            }
            metrics.captures += notices
                .iter()
                .filter(|n| matches!(n, SessionNotice::Captured { .. }))
                .count() as u64;

            if let Some(export) = export.as_deref_mut() {
                if tick % self.config.export_interval_ticks.max(1) == 0 || !notices.is_empty() {
                    export.add_frame(SimFrame {
                        time_sec: time_secs,
                        walker: walker.position(),
                        observer: fix,
                        targets: session.tracker().targets().map(TargetPosition::from).collect(),
                        route_len: session.route().len(),
                        bag: session.bag_label(),
                        events: notices.iter().map(SimEvent::from).collect(),
                    });
                }
            }

            if tick % 600 == 0 {
                debug!(
                    "  t={:.0}s | bag={} | route={} pts",
                    time_secs,
                    session.bag_label(),
                    session.route().len()
                );
            }

            if matches!(session.state(), SessionState::Complete(_)) {
                break;
            }
        }

        metrics.walked_m = walker.walked_m();
        Ok(WalkOutcome {
            ticks,
            elapsed: ctx.now(),
            time_secs: ctx.now().as_secs_f64(),
            collected: metrics.captures as usize,
            state: session.state().clone(),
            route_len: session.route().len(),
            live_targets: session.tracker().remaining(),
            metrics,
        })
    }
}

/// Pass/fail assertions. Returns the failure reason, if any.
fn check(setup: &WalkSetup, outcome: &WalkOutcome) -> Option<String> {
    if setup.abandon_after_secs.is_some() {
        if outcome.state != SessionState::Idle {
            return Some(format!("expected Idle after abandoning, got {:?}", outcome.state));
        }
        if outcome.route_len != 0 || outcome.live_targets != 0 {
            return Some(format!(
                "abandoned session kept {} route points and {} stars",
                outcome.route_len, outcome.live_targets
            ));
        }
        return None;
    }

    let SessionState::Complete(summary) = &outcome.state else {
        return Some(format!(
            "collected {}/{} stars in {:.0}s",
            outcome.collected, setup.session.star_count, outcome.time_secs
        ));
    };

    if outcome.collected != setup.session.star_count {
        return Some(format!("completed with {} captures", outcome.collected));
    }
    if summary.elapsed != outcome.elapsed || summary.elapsed_hms != format_hms(outcome.elapsed) {
        return Some(format!(
            "elapsed {} does not match clock {:.0}s",
            summary.elapsed_hms, outcome.time_secs
        ));
    }
    if setup.check_route_length {
        let walked = outcome.metrics.walked_m;
        let error = (summary.distance_m - walked).abs() / walked.max(1.0);
        if error > 0.01 {
            return Some(format!(
                "route {:.1}m vs walked {:.1}m ({:.2}% off)",
                summary.distance_m,
                walked,
                error * 100.0
            ));
        }
    }
    None
}
