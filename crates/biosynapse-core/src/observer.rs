//! Presentation boundary: state-change notifications and snapshots.

use biosynapse_logic::mission::MissionState;
use biosynapse_logic::telemetry::{MetricReading, TelemetryFeed};
use serde::{Deserialize, Serialize};

/// What just happened to the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionEvent {
    Started,
    Resumed,
    Paused,
    Reset,
    /// A tick advanced progress.
    Progressed,
    RisksIdentified,
    CountermeasuresDeployed,
    Completed,
}

/// Receives read-only views after every state change.
///
/// Both methods default to doing nothing so observers only implement what
/// they render.
pub trait DashboardObserver {
    fn on_telemetry(&mut self, _feed: &TelemetryFeed) {}

    fn on_mission(&mut self, _event: MissionEvent, _state: &MissionState) {}
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub clock_ms: u64,
    pub telemetry_running: bool,
    /// Newest first.
    pub telemetry: Vec<MetricReading>,
    pub mission: MissionState,
}
