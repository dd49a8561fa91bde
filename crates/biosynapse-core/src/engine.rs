//! Dashboard engine - main entry point for running the simulation

use std::time::Duration;

use biosynapse_logic::mission::{MissionState, MissionStatus, Transition};
use biosynapse_logic::telemetry::{MetricGenerator, TelemetryFeed};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Tick, TimerId, VirtualClock};
use crate::config::{ConfigError, DashboardConfig};
use crate::observer::{DashboardObserver, DashboardSnapshot, MissionEvent};

/// Owns the telemetry stream and the mission run, and drives both from a
/// single virtual clock.
pub struct DashboardEngine {
    config: DashboardConfig,
    /// Simulation clock and its two periodic timers
    clock: VirtualClock,
    telemetry_timer: TimerId,
    mission_timer: TimerId,
    /// Telemetry source and live feed
    generator: MetricGenerator<StdRng>,
    feed: TelemetryFeed,
    /// Current mission run
    mission: MissionState,
    observers: Vec<Box<dyn DashboardObserver>>,
    /// Ticks dropped because their timer was cancelled or re-armed
    stale_ticks: u64,
}

impl DashboardEngine {
    /// Build an engine from a config, rejecting invalid values.
    pub fn new(config: DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: DashboardConfig) -> Self {
        let mut clock = VirtualClock::new();
        let telemetry_timer = clock.register("telemetry", config.telemetry.refresh_ms);
        let mission_timer = clock.register("mission", config.mission.tick_ms);

        let generator = MetricGenerator::new(
            StdRng::seed_from_u64(config.seed),
            config.telemetry.ranges.clone(),
        );
        let feed = TelemetryFeed::new(config.telemetry.capacity);

        let mut engine = Self {
            config,
            clock,
            telemetry_timer,
            mission_timer,
            generator,
            feed,
            mission: MissionState::new(),
            observers: Vec::new(),
            stale_ticks: 0,
        };

        if engine.config.telemetry.autostart {
            engine.start_telemetry();
        }

        log::info!(
            "Dashboard engine ready (seed={}, feed capacity={}, telemetry every {}ms, mission tick every {}ms)",
            engine.config.seed,
            engine.feed.capacity(),
            engine.config.telemetry.refresh_ms,
            engine.config.mission.tick_ms
        );

        engine
    }

    /// Register an observer. Observers are called in registration order.
    pub fn subscribe(&mut self, observer: Box<dyn DashboardObserver>) {
        self.observers.push(observer);
    }

    // ── Time ────────────────────────────────────────────────────────────

    /// Advance the virtual clock by `delta`, delivering every tick that
    /// falls due on the way, oldest first.
    pub fn advance(&mut self, delta: Duration) {
        let until = self.deadline(delta);
        while let Some(tick) = self.clock.next_due(until) {
            self.deliver(tick);
        }
        self.clock.settle(until);
    }

    /// Take the next tick due within `delta` without delivering it.
    ///
    /// For hosts that receive timer callbacks themselves and hand them back
    /// through [`deliver`](Self::deliver).
    pub fn take_due_tick(&mut self, delta: Duration) -> Option<Tick> {
        let until = self.deadline(delta);
        self.clock.next_due(until)
    }

    /// Clock time `delta` from now, saturating at the end of time.
    fn deadline(&self, delta: Duration) -> u64 {
        let delta_ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        self.clock.now_ms().saturating_add(delta_ms)
    }

    /// Apply one tick. Returns false, changing nothing, if the tick's timer
    /// was cancelled or re-armed after the tick was issued.
    pub fn deliver(&mut self, tick: Tick) -> bool {
        if !self.clock.is_live(&tick) {
            self.stale_ticks += 1;
            log::debug!(
                "Dropping stale {} tick due at {}ms",
                self.clock.name(tick.timer),
                tick.due_ms
            );
            return false;
        }

        if tick.timer == self.telemetry_timer {
            self.on_telemetry_tick(tick.due_ms);
        } else if tick.timer == self.mission_timer {
            self.on_mission_tick();
        }
        true
    }

    fn on_telemetry_tick(&mut self, now_ms: u64) {
        let reading = self.generator.generate(now_ms);
        log::trace!(
            "{} = {:.1} {} at {}ms",
            reading.kind,
            reading.value,
            reading.unit,
            reading.timestamp_ms
        );
        self.feed.push(reading);

        for observer in self.observers.iter_mut() {
            observer.on_telemetry(&self.feed);
        }
    }

    fn on_mission_tick(&mut self) {
        let Some(outcome) = self.mission.tick(&self.config.mission) else {
            return;
        };

        self.notify_mission(MissionEvent::Progressed);

        if outcome.risks_identified {
            log::info!(
                "Mission at {:.1}%: {} risks identified",
                outcome.progress_percent,
                self.mission.risks.len()
            );
            self.notify_mission(MissionEvent::RisksIdentified);
        }
        if outcome.countermeasures_deployed {
            log::info!(
                "Mission at {:.1}%: {} countermeasures deployed",
                outcome.progress_percent,
                self.mission.countermeasures.len()
            );
            self.notify_mission(MissionEvent::CountermeasuresDeployed);
        }
        if outcome.completed {
            self.clock.cancel(self.mission_timer);
            log::info!(
                "Mission completed after {} simulated seconds",
                self.mission.elapsed_seconds
            );
            self.notify_mission(MissionEvent::Completed);
        }
    }

    fn notify_mission(&mut self, event: MissionEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_mission(event, &self.mission);
        }
    }

    // ── Commands ────────────────────────────────────────────────────────

    /// Start a fresh run from idle, or resume a paused one.
    pub fn start_mission(&mut self) -> Transition {
        let transition = self.mission.start();
        if transition.arms_ticker() {
            self.clock.arm(self.mission_timer);
        }
        match transition {
            Transition::Started => {
                log::info!("Mission started");
                self.notify_mission(MissionEvent::Started);
            }
            Transition::Resumed => {
                log::info!(
                    "Mission resumed at {:.1}%",
                    self.mission.progress_percent
                );
                self.notify_mission(MissionEvent::Resumed);
            }
            _ => self.log_ignored("start"),
        }
        transition
    }

    pub fn pause_mission(&mut self) -> Transition {
        // Cancel before touching state so no tick lands in between
        if self.mission.is_running() {
            self.clock.cancel(self.mission_timer);
        }
        let transition = self.mission.pause();
        if transition == Transition::Paused {
            log::info!("Mission paused at {:.1}%", self.mission.progress_percent);
            self.notify_mission(MissionEvent::Paused);
        } else {
            self.log_ignored("pause");
        }
        transition
    }

    pub fn reset_mission(&mut self) -> Transition {
        self.clock.cancel(self.mission_timer);
        let transition = self.mission.reset();
        log::info!("Mission reset");
        self.notify_mission(MissionEvent::Reset);
        transition
    }

    fn log_ignored(&self, command: &str) {
        log::debug!(
            "Ignoring {} while mission is {}",
            command,
            self.mission.status.name()
        );
    }

    /// Start generating readings. No-op if already streaming.
    pub fn start_telemetry(&mut self) {
        if !self.clock.is_armed(self.telemetry_timer) {
            self.clock.arm(self.telemetry_timer);
            log::info!("Telemetry stream started");
        }
    }

    /// Stop generating readings. The feed keeps its contents.
    pub fn stop_telemetry(&mut self) {
        if self.clock.is_armed(self.telemetry_timer) {
            self.clock.cancel(self.telemetry_timer);
            log::info!("Telemetry stream stopped");
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn mission_status(&self) -> MissionStatus {
        self.mission.status
    }

    pub fn feed(&self) -> &TelemetryFeed {
        &self.feed
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn telemetry_running(&self) -> bool {
        self.clock.is_armed(self.telemetry_timer)
    }

    /// Whether the mission ticker is armed.
    pub fn mission_ticking(&self) -> bool {
        self.clock.is_armed(self.mission_timer)
    }

    /// Current simulation time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn stale_ticks(&self) -> u64 {
        self.stale_ticks
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            clock_ms: self.clock.now_ms(),
            telemetry_running: self.telemetry_running(),
            telemetry: self.feed.snapshot(),
            mission: self.mission.clone(),
        }
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::build(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use biosynapse_logic::telemetry::MetricRanges;

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<MissionEvent>>>,
        feed_sizes: Rc<RefCell<Vec<usize>>>,
    }

    impl DashboardObserver for Recorder {
        fn on_telemetry(&mut self, feed: &TelemetryFeed) {
            self.feed_sizes.borrow_mut().push(feed.len());
        }

        fn on_mission(&mut self, event: MissionEvent, _state: &MissionState) {
            self.events.borrow_mut().push(event);
        }
    }

    fn quiet_engine() -> DashboardEngine {
        let mut config = DashboardConfig::default();
        config.telemetry.autostart = false;
        DashboardEngine::new(config).unwrap()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_engine_creation() {
        let engine = DashboardEngine::default();
        assert_eq!(engine.now_ms(), 0);
        assert!(engine.telemetry_running());
        assert!(!engine.mission_ticking());
        assert_eq!(engine.mission_status(), MissionStatus::Idle);
        assert!(engine.feed().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DashboardConfig::default();
        config.telemetry.refresh_ms = 0;
        assert!(DashboardEngine::new(config).is_err());
    }

    #[test]
    fn test_telemetry_refresh_period() {
        let mut engine = DashboardEngine::default();
        engine.advance(Duration::from_millis(1499));
        assert!(engine.feed().is_empty());
        engine.advance(Duration::from_millis(1));
        assert_eq!(engine.feed().len(), 1);
        assert_eq!(engine.feed().latest().unwrap().timestamp_ms, 1500);

        engine.advance(secs(60));
        assert_eq!(engine.feed().len(), 9);
        let snap = engine.feed().snapshot();
        assert!(snap.windows(2).all(|w| w[0].timestamp_ms > w[1].timestamp_ms));
        let ranges = MetricRanges::default();
        assert!(snap.iter().all(|r| ranges.get(r.kind).contains(r.value)));
    }

    #[test]
    fn test_stop_telemetry_keeps_feed() {
        let mut engine = DashboardEngine::default();
        engine.advance(secs(6));
        let before = engine.feed().snapshot();
        engine.stop_telemetry();
        engine.advance(secs(60));
        assert_eq!(engine.feed().snapshot(), before);
        engine.start_telemetry();
        engine.advance(Duration::from_millis(1500));
        assert_eq!(engine.feed().len(), before.len() + 1);
    }

    #[test]
    fn test_mission_thresholds_over_time() {
        let mut engine = quiet_engine();
        assert_eq!(engine.start_mission(), Transition::Started);

        engine.advance(secs(39));
        assert!(engine.mission().risks.is_empty());
        engine.advance(secs(1));
        assert_eq!(engine.mission().progress_percent, 20.0);
        assert_eq!(engine.mission().risks.len(), 3);

        engine.advance(secs(40));
        assert_eq!(engine.mission().progress_percent, 40.0);
        assert_eq!(engine.mission().countermeasures.len(), 3);

        engine.advance(secs(120));
        assert_eq!(engine.mission().progress_percent, 100.0);
        assert_eq!(engine.mission_status(), MissionStatus::Completed);
        assert!(!engine.mission_ticking());

        let done = engine.mission().clone();
        engine.advance(secs(100));
        assert_eq!(engine.mission(), &done);
    }

    #[test]
    fn test_pause_stops_ticks_and_resume_continues() {
        let mut engine = quiet_engine();
        engine.start_mission();
        engine.advance(secs(10));
        assert_eq!(engine.pause_mission(), Transition::Paused);
        engine.advance(secs(30));
        assert_eq!(engine.mission().progress_percent, 5.0);
        assert_eq!(engine.mission().elapsed_seconds, 10);

        assert_eq!(engine.start_mission(), Transition::Resumed);
        engine.advance(secs(10));
        assert_eq!(engine.mission().progress_percent, 10.0);
        assert_eq!(engine.mission().elapsed_seconds, 20);
    }

    #[test]
    fn test_reset_cancels_ticker() {
        let mut engine = quiet_engine();
        engine.start_mission();
        engine.advance(secs(90));
        engine.reset_mission();
        assert!(!engine.mission_ticking());
        engine.advance(secs(30));
        assert_eq!(engine.mission(), &MissionState::new());
    }

    #[test]
    fn test_longest_tick_period_with_unbounded_lookahead() {
        let mut config = DashboardConfig::default();
        config.telemetry.autostart = false;
        config.mission.tick_ms = biosynapse_logic::mission::MAX_TICK_MS;
        let mut engine = DashboardEngine::new(config).unwrap();
        engine.advance(secs(1));
        engine.start_mission();

        let tick = engine.take_due_tick(Duration::MAX).unwrap();
        assert_eq!(tick.due_ms, 1000 + biosynapse_logic::mission::MAX_TICK_MS);
        assert!(engine.deliver(tick));
        assert_eq!(engine.mission().progress_percent, 0.5);
    }

    #[test]
    fn test_stale_tick_after_reset_ignored() {
        let mut engine = quiet_engine();
        engine.start_mission();
        let tick = engine.take_due_tick(secs(1)).unwrap();

        engine.reset_mission();
        assert!(!engine.deliver(tick));
        assert_eq!(engine.mission(), &MissionState::new());
        assert_eq!(engine.stale_ticks(), 1);
    }

    #[test]
    fn test_stale_tick_after_restart_ignored() {
        let mut engine = quiet_engine();
        engine.start_mission();
        let old = engine.take_due_tick(secs(1)).unwrap();

        engine.reset_mission();
        engine.start_mission();
        assert!(!engine.deliver(old));
        assert_eq!(engine.mission().progress_percent, 0.0);

        engine.advance(secs(1));
        assert_eq!(engine.mission().progress_percent, 0.5);
    }

    #[test]
    fn test_stale_tick_after_pause_ignored() {
        let mut engine = quiet_engine();
        engine.start_mission();
        let tick = engine.take_due_tick(secs(1)).unwrap();
        assert!(engine.deliver(tick));
        let tick = engine.take_due_tick(secs(1)).unwrap();
        engine.pause_mission();
        assert!(!engine.deliver(tick));
        assert_eq!(engine.mission().progress_percent, 0.5);
    }

    #[test]
    fn test_observer_event_order() {
        let mut engine = quiet_engine();
        let recorder = Recorder::default();
        let events = Rc::clone(&recorder.events);
        engine.subscribe(Box::new(recorder));

        engine.start_mission();
        engine.advance(secs(200));
        engine.reset_mission();

        let events = events.borrow();
        assert_eq!(events.first(), Some(&MissionEvent::Started));
        assert_eq!(events.last(), Some(&MissionEvent::Reset));
        let count = |e: MissionEvent| events.iter().filter(|x| **x == e).count();
        assert_eq!(count(MissionEvent::Progressed), 200);
        assert_eq!(count(MissionEvent::RisksIdentified), 1);
        assert_eq!(count(MissionEvent::CountermeasuresDeployed), 1);
        assert_eq!(count(MissionEvent::Completed), 1);

        let risk_at = events.iter().position(|e| *e == MissionEvent::RisksIdentified).unwrap();
        assert_eq!(events[risk_at - 1], MissionEvent::Progressed);
        let done_at = events.iter().position(|e| *e == MissionEvent::Completed).unwrap();
        assert_eq!(events[done_at + 1], MissionEvent::Reset);
    }

    #[test]
    fn test_observer_sees_telemetry() {
        let mut engine = DashboardEngine::default();
        let recorder = Recorder::default();
        let sizes = Rc::clone(&recorder.feed_sizes);
        engine.subscribe(Box::new(recorder));
        engine.advance(secs(30));
        let sizes = sizes.borrow();
        assert_eq!(sizes.len(), 20);
        assert_eq!(*sizes.last().unwrap(), 9);
    }

    #[test]
    fn test_ignored_commands_do_not_notify() {
        let mut engine = quiet_engine();
        let recorder = Recorder::default();
        let events = Rc::clone(&recorder.events);
        engine.subscribe(Box::new(recorder));

        assert_eq!(engine.pause_mission(), Transition::Ignored);
        engine.start_mission();
        assert_eq!(engine.start_mission(), Transition::Ignored);
        assert_eq!(*events.borrow(), vec![MissionEvent::Started]);
    }

    #[test]
    fn test_telemetry_and_mission_independent() {
        let mut engine = DashboardEngine::default();
        engine.start_mission();
        engine.advance(secs(15));
        assert_eq!(engine.mission().progress_percent, 7.5);
        assert_eq!(engine.feed().len(), 9);

        engine.pause_mission();
        engine.advance(Duration::from_millis(1500));
        assert_eq!(engine.mission().progress_percent, 7.5);
        assert_eq!(engine.feed().latest().unwrap().timestamp_ms, 16_500);
    }

    #[test]
    fn test_same_seed_same_feed() {
        let mut a = DashboardEngine::default();
        let mut b = DashboardEngine::default();
        a.advance(secs(30));
        b.advance(secs(30));
        assert_eq!(a.feed().snapshot(), b.feed().snapshot());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = DashboardEngine::default();
        engine.start_mission();
        engine.advance(secs(45));
        let snap = engine.snapshot();
        assert_eq!(snap.clock_ms, 45_000);
        assert!(snap.telemetry_running);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"running\""));
        let back: DashboardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mission, snap.mission);
        assert_eq!(back.telemetry.len(), snap.telemetry.len());
    }
}
