//! Bio-Synapse Core - Dashboard Simulation Engine
//!
//! Runs the simulated astronaut telemetry stream and the mission progress
//! simulation behind the Bio-Synapse dashboard.
//!
//! # Architecture
//!
//! - **Logic** (`biosynapse-logic`): readings, feed, mission state machine.
//!   Pure data, no notion of time.
//! - **Clock**: a virtual millisecond clock with cancellable periodic timers.
//!   Ticks from a cancelled or re-armed timer are stale and never applied.
//! - **Engine**: owns all state, turns ticks and commands into state changes,
//!   and notifies observers.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use biosynapse_core::prelude::*;
//!
//! let mut engine = DashboardEngine::default();
//! engine.start_mission();
//!
//! // One simulated minute
//! engine.advance(Duration::from_secs(60));
//! println!("{:.1}% complete", engine.mission().progress_percent);
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod observer;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::{ConfigError, DashboardConfig, TelemetryConfig};
    pub use crate::engine::DashboardEngine;
    pub use crate::observer::{DashboardObserver, DashboardSnapshot, MissionEvent};
    pub use biosynapse_logic::mission::{MissionState, MissionStatus, Transition};
    pub use biosynapse_logic::telemetry::{MetricKind, MetricReading, TelemetryFeed};
}
