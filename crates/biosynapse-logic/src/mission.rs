//! Mission progress simulation: status machine, threshold emissions.
//!
//! A [`MissionState`] advances a completion percentage one tick at a time.
//! Crossing the risk threshold populates the identified risks, crossing the
//! later countermeasure threshold populates the deployed countermeasures,
//! and reaching 100% completes the run.
//!
//! Everything here is plain data. Commands return a [`Transition`] and ticks
//! return a [`TickOutcome`] so the caller decides what to schedule, cancel,
//! or announce. Invalid commands are no-ops, never errors.

use serde::{Deserialize, Serialize};

// ============================================================================
// STATUS & FACTS
// ============================================================================

/// Lifecycle of a mission run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    #[default]
    Idle,
    Running,
    Paused,
    /// Terminal until reset.
    Completed,
}

impl MissionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Health risk identified during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub name: String,
    pub severity: Severity,
}

/// Countermeasure deployed against identified risks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countermeasure {
    pub name: String,
    /// Expected reduction of the targeted risk, 0-100.
    pub effectiveness_percent: f64,
}

/// Risks emitted at the risk threshold, in emission order.
pub const IDENTIFIED_RISKS: [(&str, Severity); 3] = [
    ("Bone Density Loss", Severity::High),
    ("Radiation Exposure", Severity::Medium),
    ("Muscle Atrophy", Severity::Medium),
];

/// Countermeasures emitted at the countermeasure threshold, in emission order.
pub const DEPLOYED_COUNTERMEASURES: [(&str, f64); 3] = [
    ("Advanced Resistive Exercise Device (ARED)", 70.0),
    ("Radioprotective compounds", 60.0),
    ("Virtual reality therapy", 50.0),
];

pub fn identified_risks() -> Vec<Risk> {
    IDENTIFIED_RISKS
        .iter()
        .map(|(name, severity)| Risk {
            name: (*name).to_string(),
            severity: *severity,
        })
        .collect()
}

pub fn deployed_countermeasures() -> Vec<Countermeasure> {
    DEPLOYED_COUNTERMEASURES
        .iter()
        .map(|(name, effectiveness)| Countermeasure {
            name: (*name).to_string(),
            effectiveness_percent: *effectiveness,
        })
        .collect()
}

// ============================================================================
// PROFILE
// ============================================================================

/// Tuning for a mission run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionProfile {
    /// Wall period between progress ticks, in milliseconds of simulation clock.
    pub tick_ms: u64,
    /// Percentage points added per tick.
    pub progress_step: f64,
    /// Simulated mission seconds added per tick.
    pub seconds_per_tick: u64,
    /// Progress at which risks are identified.
    pub risk_threshold: f64,
    /// Progress at which countermeasures are deployed.
    pub countermeasure_threshold: f64,
}

impl Default for MissionProfile {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            progress_step: 0.5,
            seconds_per_tick: 1,
            risk_threshold: 20.0,
            countermeasure_threshold: 40.0,
        }
    }
}

impl MissionProfile {
    /// Describe the first problem with this profile, if any.
    pub fn problem(&self) -> Option<String> {
        if self.tick_ms == 0 || self.tick_ms > MAX_TICK_MS {
            return Some(format!(
                "mission tick_ms must be in 1..={}, got {}",
                MAX_TICK_MS, self.tick_ms
            ));
        }
        if !self.progress_step.is_finite() || self.progress_step <= 0.0 {
            return Some(format!(
                "mission progress_step must be positive, got {}",
                self.progress_step
            ));
        }
        if !self.risk_threshold.is_finite() || !self.countermeasure_threshold.is_finite() {
            return Some("mission thresholds must be finite".into());
        }
        if self.countermeasure_threshold < self.risk_threshold {
            return Some(format!(
                "countermeasure_threshold ({}) is below risk_threshold ({})",
                self.countermeasure_threshold, self.risk_threshold
            ));
        }
        None
    }

    /// Progress after `ticks` ticks of a fresh run, clamped to the ceiling.
    pub fn progress_after(&self, ticks: u64) -> f64 {
        (ticks as f64 * self.progress_step).min(MAX_PROGRESS)
    }

    /// Ticks from a fresh start until completion.
    pub fn ticks_to_complete(&self) -> u64 {
        // Division can land one off for steps that are inexact in binary;
        // settle on the same product `progress_after` computes.
        let mut ticks = (MAX_PROGRESS / self.progress_step).ceil().max(1.0) as u64;
        while self.progress_after(ticks) < MAX_PROGRESS {
            ticks += 1;
        }
        while ticks > 1 && self.progress_after(ticks - 1) >= MAX_PROGRESS {
            ticks -= 1;
        }
        ticks
    }
}

/// Progress ceiling.
pub const MAX_PROGRESS: f64 = 100.0;

/// Longest accepted tick period (one simulated day).
pub const MAX_TICK_MS: u64 = 86_400_000;

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Result of a start/pause/reset command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle → running with cleared accumulators.
    Started,
    /// Paused → running, accumulators kept.
    Resumed,
    Paused,
    Reset,
    /// Command not valid in the current status; nothing changed.
    Ignored,
}

impl Transition {
    /// Whether the mission ticker should be running after this transition.
    pub fn arms_ticker(&self) -> bool {
        matches!(self, Self::Started | Self::Resumed)
    }

    pub fn changed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    pub progress_percent: f64,
    pub risks_identified: bool,
    pub countermeasures_deployed: bool,
    pub completed: bool,
}

/// Complete state of one mission run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MissionState {
    pub status: MissionStatus,
    pub progress_percent: f64,
    pub elapsed_seconds: u64,
    /// Ticks applied in this run; progress derives from it.
    #[serde(default)]
    pub ticks: u64,
    pub risks: Vec<Risk>,
    pub countermeasures: Vec<Countermeasure>,
}

impl MissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == MissionStatus::Running
    }

    /// Start fresh from idle, or resume from paused.
    pub fn start(&mut self) -> Transition {
        match self.status {
            MissionStatus::Idle => {
                self.clear();
                self.status = MissionStatus::Running;
                Transition::Started
            }
            MissionStatus::Paused => {
                self.status = MissionStatus::Running;
                Transition::Resumed
            }
            MissionStatus::Running | MissionStatus::Completed => Transition::Ignored,
        }
    }

    pub fn pause(&mut self) -> Transition {
        if self.status != MissionStatus::Running {
            return Transition::Ignored;
        }
        self.status = MissionStatus::Paused;
        Transition::Paused
    }

    /// Back to idle from any status.
    pub fn reset(&mut self) -> Transition {
        self.clear();
        self.status = MissionStatus::Idle;
        Transition::Reset
    }

    /// Advance one tick. Returns `None` unless running.
    pub fn tick(&mut self, profile: &MissionProfile) -> Option<TickOutcome> {
        if !self.is_running() {
            return None;
        }

        self.ticks += 1;
        self.progress_percent = profile.progress_after(self.ticks);
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(profile.seconds_per_tick);

        let mut outcome = TickOutcome {
            progress_percent: self.progress_percent,
            ..TickOutcome::default()
        };

        // Emptiness guard: each list fills at most once per run
        if self.progress_percent >= profile.risk_threshold && self.risks.is_empty() {
            self.risks = identified_risks();
            outcome.risks_identified = true;
        }
        if self.progress_percent >= profile.countermeasure_threshold
            && self.countermeasures.is_empty()
        {
            self.countermeasures = deployed_countermeasures();
            outcome.countermeasures_deployed = true;
        }

        if self.progress_percent >= MAX_PROGRESS {
            self.status = MissionStatus::Completed;
            outcome.completed = true;
        }

        Some(outcome)
    }

    fn clear(&mut self) {
        self.progress_percent = 0.0;
        self.elapsed_seconds = 0;
        self.ticks = 0;
        self.risks.clear();
        self.countermeasures.clear();
    }
}
