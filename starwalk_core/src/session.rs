//! Session state machine - ties sampling, proximity and route together.
//!
//! ```text
//!            begin                      last TargetCaptured
//!   Idle ───────────────► Active ──────────────────────────► Complete
//!    ▲                     │  ▲                                 │
//!    │        End          │  │            begin                │
//!    └─────────────────────┘  └─────────────────────────────────┘
//! ```
//!
//! The session owns the only copy of the live targets and the walked route.
//! Hosts feed it events (`ObserverMoved`, `TargetCaptured`, `End`) and react
//! to the returned notices (show/hide the collect button, update the bag
//! counter, present the summary).
//!
//! # Threading
//!
//! Every call is synchronous and O(live targets). A host that drives the
//! session from both a frame callback and a UI thread must serialize the
//! calls itself, e.g. with a `Mutex<Session<_>>`.

use crate::config::SessionConfig;
use crate::error::{Result, WalkError};
use crate::geo_point::GeoPoint;
use crate::proximity::{ProximityTracker, TargetId};
use crate::region_sampler::RegionSampler;
use crate::route::{format_hms, RouteAccumulator};
use crate::source::PositionSource;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use starwalk_env::{SessionId, WalkContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// RNG stream reserved for target placement.
const SAMPLER_STREAM: u64 = 0x5354_4152;

/// What the walk looked like once every star was collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session: SessionId,
    pub elapsed: Duration,
    /// `HH:MM:SS`, hours wrapping at 24
    pub elapsed_hms: String,
    pub distance_m: f64,
    /// Distance with two decimals
    pub distance_label: String,
    /// Recorded route points
    pub steps: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Active { id: SessionId, started_at: Duration },
    Complete(SessionSummary),
}

/// Input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    ObserverMoved(GeoPoint),
    TargetCaptured(TargetId),
    End,
}

/// Output of the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionNotice {
    /// The nearest star is within capture range
    CaptureAvailable(TargetId),
    /// No star is within capture range any more
    CaptureUnavailable,
    Captured { id: TargetId, remaining: usize },
    AllTargetsCaptured(SessionSummary),
}

/// A walk-to-collect session.
pub struct Session<C: WalkContext> {
    ctx: Arc<C>,
    config: SessionConfig,
    sampler: RegionSampler,
    rng: ChaCha8Rng,
    tracker: ProximityTracker,
    route: RouteAccumulator,
    state: SessionState,
    total: usize,
    available: Option<TargetId>,
}

impl<C: WalkContext> Session<C> {
    pub fn new(ctx: Arc<C>, config: SessionConfig) -> Self {
        let rng = ctx.derive_rng(SAMPLER_STREAM);
        Self {
            sampler: RegionSampler::new(config.max_sample_attempts),
            ctx,
            config,
            rng,
            tracker: ProximityTracker::new(),
            route: RouteAccumulator::new(),
            state: SessionState::Idle,
            total: 0,
            available: None,
        }
    }

    /// Starts a session around `center` with the configured radius and count.
    pub fn begin(&mut self, center: GeoPoint) -> Result<Vec<TargetId>> {
        self.begin_with(center, self.config.radius_m, self.config.star_count)
    }

    /// Starts (or restarts) a session with an explicit radius and star count.
    ///
    /// On error the previous state is left untouched.
    pub fn begin_with(
        &mut self,
        center: GeoPoint,
        radius_m: f64,
        count: usize,
    ) -> Result<Vec<TargetId>> {
        if count == 0 {
            return Err(WalkError::invalid("star count must be positive"));
        }
        let threshold = self.config.capture_threshold_m;
        if threshold.is_nan() || threshold <= 0.0 {
            return Err(WalkError::invalid(format!(
                "capture threshold must be positive, got {threshold}"
            )));
        }
        let points = self
            .sampler
            .sample_batch(&mut self.rng, center, radius_m, count)?;

        let now = self.ctx.now();
        self.route.reset();
        self.route.start(now);
        let ids = self.tracker.begin(points);
        self.total = ids.len();
        self.available = None;

        let id = SessionId::from_seed(self.rng.gen());
        self.state = SessionState::Active { id, started_at: now };
        info!(session = %id, %center, radius_m, count, "Session started");
        Ok(ids)
    }

    /// Feeds one event through the state machine.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionNotice> {
        let active = match self.state {
            SessionState::Active { id, .. } => Some(id),
            _ => None,
        };

        match (event, active) {
            (SessionEvent::End, _) => {
                self.end();
                Vec::new()
            }
            (SessionEvent::ObserverMoved(position), Some(_)) => self.observer_moved(position),
            (SessionEvent::TargetCaptured(target), Some(session)) => {
                self.target_captured(session, target)
            }
            (event, None) => {
                debug!(?event, "Ignoring event outside an active session");
                Vec::new()
            }
        }
    }

    /// Pulls one fix from `source` and feeds it as `ObserverMoved`.
    pub fn tick<S: PositionSource + ?Sized>(&mut self, source: &mut S) -> Vec<SessionNotice> {
        match source.next_position() {
            Some(position) => self.handle(SessionEvent::ObserverMoved(position)),
            None => Vec::new(),
        }
    }

    /// Collects the star currently in range, if any.
    pub fn capture_nearest(&mut self) -> Result<Vec<SessionNotice>> {
        if !self.is_active() {
            return Err(WalkError::NotActive);
        }
        Ok(match self.available {
            Some(id) => self.handle(SessionEvent::TargetCaptured(id)),
            None => Vec::new(),
        })
    }

    /// Abandons the session, dropping targets and route.
    pub fn end(&mut self) {
        if let SessionState::Active { id, .. } = self.state {
            info!(session = %id, remaining = self.tracker.remaining(), "Session ended");
        }
        self.tracker.clear();
        self.route.reset();
        self.total = 0;
        self.available = None;
        self.state = SessionState::Idle;
    }

    fn observer_moved(&mut self, position: GeoPoint) -> Vec<SessionNotice> {
        self.route.record(position, self.ctx.now());

        let available = self
            .tracker
            .update(position, self.config.capture_threshold_m);
        if available == self.available {
            return Vec::new();
        }
        self.available = available;

        vec![match available {
            Some(id) => SessionNotice::CaptureAvailable(id),
            None => SessionNotice::CaptureUnavailable,
        }]
    }

    fn target_captured(&mut self, session: SessionId, target: TargetId) -> Vec<SessionNotice> {
        if self.tracker.capture(target).is_none() {
            return Vec::new();
        }
        if self.available == Some(target) {
            self.available = None;
        }

        let remaining = self.tracker.remaining();
        let mut notices = vec![SessionNotice::Captured { id: target, remaining }];

        if remaining == 0 {
            let summary = self.summarize(session);
            info!(
                session = %session,
                elapsed = %summary.elapsed_hms,
                distance_m = summary.distance_m,
                "All stars collected"
            );
            self.route.reset();
            self.total = 0;
            self.state = SessionState::Complete(summary.clone());
            notices.push(SessionNotice::AllTargetsCaptured(summary));
        }
        notices
    }

    fn summarize(&self, session: SessionId) -> SessionSummary {
        let elapsed = self.route.elapsed(self.ctx.now());
        let distance_m = self.route.total_distance_m();
        SessionSummary {
            session,
            elapsed,
            elapsed_hms: format_hms(elapsed),
            distance_m,
            distance_label: format!("{distance_m:.2}"),
            steps: self.route.len(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Star currently within capture range.
    pub fn available(&self) -> Option<TargetId> {
        self.available
    }

    /// Stars collected in the active session.
    pub fn collected(&self) -> usize {
        self.total - self.tracker.remaining()
    }

    /// Bag counter, e.g. `2/5`.
    pub fn bag_label(&self) -> String {
        if self.is_active() {
            format!("{}/{}", self.collected(), self.total)
        } else {
            format!("0/{}", self.config.star_count)
        }
    }

    pub fn tracker(&self) -> &ProximityTracker {
        &self.tracker
    }

    pub fn route(&self) -> &RouteAccumulator {
        &self.route
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<C> {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReplaySource;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Manually advanced clock with a fixed seed.
    struct ManualContext {
        now_ms: AtomicU64,
        seed: u64,
    }

    impl ManualContext {
        fn shared(seed: u64) -> Arc<Self> {
            Arc::new(Self {
                now_ms: AtomicU64::new(0),
                seed,
            })
        }

        fn advance(&self, ms: u64) {
            self.now_ms.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl WalkContext for ManualContext {
        fn now(&self) -> Duration {
            Duration::from_millis(self.now_ms.load(Ordering::SeqCst))
        }

        fn system_time(&self) -> SystemTime {
            UNIX_EPOCH + self.now()
        }

        fn derive_rng(&self, stream: u64) -> ChaCha8Rng {
            ChaCha8Rng::seed_from_u64(self.seed ^ stream)
        }

        fn seed(&self) -> u64 {
            self.seed
        }
    }

    fn gp(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn positions<C: WalkContext>(session: &Session<C>) -> Vec<(TargetId, GeoPoint)> {
        session.tracker().targets().map(|t| (t.id, t.position)).collect()
    }

    #[test]
    fn test_idle_session_ignores_events() {
        let mut session = Session::new(ManualContext::shared(1), SessionConfig::default());

        assert!(session.handle(SessionEvent::ObserverMoved(gp(0.0, 0.0))).is_empty());
        assert!(session.handle(SessionEvent::TargetCaptured(TargetId(0))).is_empty());
        assert!(session.route().is_empty());
        assert_eq!(session.capture_nearest(), Err(WalkError::NotActive));
        assert_eq!(session.bag_label(), "0/5");
    }

    #[test]
    fn test_begin_places_configured_stars_inside_radius() {
        let mut session = Session::new(ManualContext::shared(2), SessionConfig::default());
        let center = gp(40.0, -74.0);
        let ids = session.begin(center).unwrap();

        assert_eq!(ids.len(), 5);
        assert!(session.is_active());
        for (_, position) in positions(&session) {
            assert!(center.distance_to(&position) < 1000.0);
        }
    }

    #[test]
    fn test_begin_rejects_bad_arguments_without_changing_state() {
        let mut session = Session::new(ManualContext::shared(3), SessionConfig::default());

        assert!(matches!(
            session.begin_with(gp(0.0, 0.0), 100.0, 0),
            Err(WalkError::InvalidArgument(_))
        ));
        assert!(matches!(
            session.begin_with(gp(0.0, 0.0), -1.0, 3),
            Err(WalkError::InvalidArgument(_))
        ));
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_collect_all_stars_completes_with_summary() {
        let ctx = ManualContext::shared(4);
        let mut session = Session::new(ctx.clone(), SessionConfig::default());
        session.begin_with(gp(0.0, 0.0), 100.0, 2).unwrap();
        let targets = positions(&session);
        let (a, pa) = targets[0];
        let (b, pb) = targets[1];

        assert_eq!(
            session.handle(SessionEvent::ObserverMoved(pa)),
            vec![SessionNotice::CaptureAvailable(a)]
        );
        // Standing still is not news
        assert!(session.handle(SessionEvent::ObserverMoved(pa)).is_empty());

        assert_eq!(
            session.capture_nearest().unwrap(),
            vec![SessionNotice::Captured { id: a, remaining: 1 }]
        );
        assert_eq!(session.bag_label(), "1/2");

        ctx.advance(5000);
        assert_eq!(
            session.handle(SessionEvent::ObserverMoved(pb)),
            vec![SessionNotice::CaptureAvailable(b)]
        );

        let notices = session.handle(SessionEvent::TargetCaptured(b));
        assert_eq!(notices.len(), 2);
        let SessionNotice::AllTargetsCaptured(summary) = &notices[1] else {
            panic!("expected completion, got {notices:?}");
        };
        assert_eq!(summary.elapsed_hms, "00:00:05");
        assert_eq!(summary.steps, 2);
        assert!((summary.distance_m - pa.distance_to(&pb)).abs() < 1e-9);
        assert_eq!(summary.distance_label, format!("{:.2}", summary.distance_m));

        assert!(matches!(session.state(), SessionState::Complete(_)));
        assert!(session.route().is_empty());
    }

    #[test]
    fn test_double_capture_is_a_no_op() {
        let mut session = Session::new(ManualContext::shared(5), SessionConfig::default());
        session.begin_with(gp(10.0, 10.0), 200.0, 3).unwrap();
        let (a, _) = positions(&session)[0];

        assert_eq!(session.handle(SessionEvent::TargetCaptured(a)).len(), 1);
        assert!(session.handle(SessionEvent::TargetCaptured(a)).is_empty());
        assert_eq!(session.tracker().remaining(), 2);
    }

    #[test]
    fn test_walking_away_withdraws_capture() {
        let mut session = Session::new(ManualContext::shared(6), SessionConfig::default());
        session.begin_with(gp(0.0, 0.0), 50.0, 1).unwrap();
        let (a, pa) = positions(&session)[0];
        let far = GeoPoint::new(pa.latitude() + 0.01, pa.longitude()).unwrap();

        assert_eq!(
            session.handle(SessionEvent::ObserverMoved(pa)),
            vec![SessionNotice::CaptureAvailable(a)]
        );
        assert_eq!(
            session.handle(SessionEvent::ObserverMoved(far)),
            vec![SessionNotice::CaptureUnavailable]
        );
        assert!(session.capture_nearest().unwrap().is_empty());
    }

    #[test]
    fn test_end_returns_to_idle() {
        let mut session = Session::new(ManualContext::shared(7), SessionConfig::default());
        session.begin(gp(0.0, 0.0)).unwrap();
        session.handle(SessionEvent::ObserverMoved(gp(0.0, 0.0)));

        session.handle(SessionEvent::End);
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.tracker().remaining(), 0);
        assert!(session.route().is_empty());
    }

    #[test]
    fn test_tick_records_route_from_source() {
        let mut session = Session::new(ManualContext::shared(8), SessionConfig::default());
        session.begin(gp(0.0, 0.0)).unwrap();

        let mut source = ReplaySource::new([gp(0.0, 0.0), gp(0.0, 0.0), gp(0.0, 0.0001)]);
        for _ in 0..4 {
            session.tick(&mut source);
        }
        assert_eq!(session.route().len(), 2);
    }

    #[test]
    fn test_same_seed_same_stars() {
        let a = {
            let mut s = Session::new(ManualContext::shared(99), SessionConfig::default());
            s.begin(gp(35.0, 139.0)).unwrap();
            positions(&s)
        };
        let b = {
            let mut s = Session::new(ManualContext::shared(99), SessionConfig::default());
            s.begin(gp(35.0, 139.0)).unwrap();
            positions(&s)
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_sampling_exhaustion_leaves_session_idle() {
        let config = SessionConfig::default().with_max_sample_attempts(1);
        let pole = gp(90.0, 0.0);

        let exhausted = (0..200u64).find(|&seed| {
            let mut session = Session::new(ManualContext::shared(seed), config.clone());
            match session.begin(pole) {
                Err(WalkError::SamplingExhausted { attempts: 1 }) => {
                    assert_eq!(session.state(), &SessionState::Idle);
                    assert_eq!(session.tracker().remaining(), 0);
                    true
                }
                _ => false,
            }
        });
        assert!(exhausted.is_some(), "no seed exhausted a single attempt at the pole");
    }

    #[test]
    fn test_restart_while_active_discards_old_session() {
        let mut session = Session::new(ManualContext::shared(10), SessionConfig::default());
        let old_ids = session.begin(gp(0.0, 0.0)).unwrap();
        session.handle(SessionEvent::TargetCaptured(old_ids[0]));
        session.handle(SessionEvent::ObserverMoved(gp(0.0, 0.0)));
        assert_eq!(session.bag_label(), "1/5");
        assert_eq!(session.route().len(), 1);

        let new_ids = session.begin(gp(0.0, 0.0)).unwrap();
        assert!(session.is_active());
        assert_eq!(session.bag_label(), "0/5");
        assert!(session.route().is_empty());
        for id in &old_ids {
            assert!(!new_ids.contains(id));
            assert!(session.handle(SessionEvent::TargetCaptured(*id)).is_empty());
        }
        assert_eq!(session.tracker().remaining(), 5);
    }

    #[test]
    fn test_restart_after_complete() {
        let mut session = Session::new(ManualContext::shared(11), SessionConfig::default());
        let old_ids = session.begin_with(gp(0.0, 0.0), 100.0, 1).unwrap();
        session.handle(SessionEvent::ObserverMoved(gp(0.0, 0.0)));
        session.handle(SessionEvent::TargetCaptured(old_ids[0]));
        assert!(matches!(session.state(), SessionState::Complete(_)));

        session.begin(gp(0.0, 0.0)).unwrap();
        assert!(session.is_active());
        assert_eq!(session.bag_label(), "0/5");
        assert!(session.route().is_empty());
        assert!(session.handle(SessionEvent::TargetCaptured(old_ids[0])).is_empty());
        assert_eq!(session.tracker().remaining(), 5);
    }

    #[test]
    fn test_end_after_complete_returns_to_idle() {
        let mut session = Session::new(ManualContext::shared(12), SessionConfig::default());
        let ids = session.begin_with(gp(0.0, 0.0), 100.0, 1).unwrap();
        session.handle(SessionEvent::TargetCaptured(ids[0]));
        assert!(matches!(session.state(), SessionState::Complete(_)));

        assert!(session.handle(SessionEvent::End).is_empty());
        assert_eq!(session.state(), &SessionState::Idle);
    }
}
