//! Simulated astronaut telemetry: metric kinds, readings, generation, live feed.
//!
//! A [`MetricGenerator`] draws one reading at a time from a fixed set of
//! physiological and environmental metrics. Readings land in a
//! [`TelemetryFeed`], a fixed-capacity newest-first buffer that drops the
//! oldest reading on overflow.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// METRIC KINDS
// ============================================================================

/// Kind of reading produced by the telemetry stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MetricKind {
    /// Crew heart rate.
    HeartRate = 0,
    /// Blood oxygen saturation.
    OxygenSaturation = 1,
    /// Core body temperature.
    BodyTemperature = 2,
    /// Accumulated radiation dose for the sampling window.
    RadiationExposure = 3,
    /// Sleep quality score from the last rest period.
    SleepQuality = 4,
}

impl MetricKind {
    /// Every kind, in declaration order. The generator picks uniformly from this.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::HeartRate,
        MetricKind::OxygenSaturation,
        MetricKind::BodyTemperature,
        MetricKind::RadiationExposure,
        MetricKind::SleepQuality,
    ];

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::HeartRate),
            1 => Some(Self::OxygenSaturation),
            2 => Some(Self::BodyTemperature),
            3 => Some(Self::RadiationExposure),
            4 => Some(Self::SleepQuality),
            _ => None,
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HeartRate => "Heart Rate",
            Self::OxygenSaturation => "Oxygen Saturation",
            Self::BodyTemperature => "Body Temperature",
            Self::RadiationExposure => "Radiation Exposure",
            Self::SleepQuality => "Sleep Quality",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::HeartRate => "BPM",
            Self::OxygenSaturation => "%",
            Self::BodyTemperature => "°C",
            Self::RadiationExposure => "μSv",
            Self::SleepQuality => "%",
        }
    }

    /// Medical alert band `(low, high)`. Values outside are critical.
    pub fn alert_band(&self) -> (f64, f64) {
        match self {
            Self::HeartRate => (60.0, 100.0),
            Self::OxygenSaturation => (90.0, 100.0),
            Self::BodyTemperature => (36.0, 38.0),
            Self::RadiationExposure => (0.0, 1.0),
            Self::SleepQuality => (60.0, 100.0),
        }
    }

    /// Classify a value against this kind's alert band.
    pub fn status(&self, value: f64) -> MetricStatus {
        let (low, high) = self.alert_band();
        if value < low || value > high {
            MetricStatus::Critical
        } else if value < low + status_constants::CAUTION_MARGIN
            || value > high - status_constants::CAUTION_MARGIN
        {
            MetricStatus::Caution
        } else {
            MetricStatus::Nominal
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Health status of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    /// Comfortably inside the alert band.
    Nominal,
    /// Inside the band but close to an edge.
    Caution,
    /// Outside the alert band.
    Critical,
}

pub mod status_constants {
    /// Distance from a band edge (in the metric's own unit) that counts as caution.
    ///
    /// Applied uniformly, so narrow bands like body temperature and radiation
    /// are always at least cautionary.
    pub const CAUTION_MARGIN: f64 = 5.0;
}

// ============================================================================
// RANGES
// ============================================================================

/// Inclusive value range for one metric kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// A range is usable when both bounds and the span are finite and `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && (self.max - self.min).is_finite()
    }
}

/// Generation range for every metric kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricRanges {
    pub heart_rate: MetricRange,
    pub oxygen_saturation: MetricRange,
    pub body_temperature: MetricRange,
    pub radiation_exposure: MetricRange,
    pub sleep_quality: MetricRange,
}

impl Default for MetricRanges {
    fn default() -> Self {
        Self {
            heart_rate: MetricRange::new(60.0, 80.0),
            oxygen_saturation: MetricRange::new(95.0, 99.0),
            body_temperature: MetricRange::new(36.0, 37.0),
            radiation_exposure: MetricRange::new(0.1, 0.5),
            sleep_quality: MetricRange::new(70.0, 95.0),
        }
    }
}

impl MetricRanges {
    pub fn get(&self, kind: MetricKind) -> MetricRange {
        match kind {
            MetricKind::HeartRate => self.heart_rate,
            MetricKind::OxygenSaturation => self.oxygen_saturation,
            MetricKind::BodyTemperature => self.body_temperature,
            MetricKind::RadiationExposure => self.radiation_exposure,
            MetricKind::SleepQuality => self.sleep_quality,
        }
    }

    fn get_mut(&mut self, kind: MetricKind) -> &mut MetricRange {
        match kind {
            MetricKind::HeartRate => &mut self.heart_rate,
            MetricKind::OxygenSaturation => &mut self.oxygen_saturation,
            MetricKind::BodyTemperature => &mut self.body_temperature,
            MetricKind::RadiationExposure => &mut self.radiation_exposure,
            MetricKind::SleepQuality => &mut self.sleep_quality,
        }
    }

    /// First kind whose range is unusable, if any.
    pub fn first_invalid(&self) -> Option<MetricKind> {
        MetricKind::ALL
            .into_iter()
            .find(|kind| !self.get(*kind).is_valid())
    }

    /// Replace every unusable range with the default for its kind.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        while let Some(kind) = self.first_invalid() {
            *self.get_mut(kind) = defaults.get(kind);
        }
        self
    }
}

// ============================================================================
// READINGS
// ============================================================================

/// One simulated sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    /// Milliseconds on the simulation clock when the reading was taken.
    pub timestamp_ms: u64,
    pub kind: MetricKind,
    pub value: f64,
    pub unit: String,
}

impl MetricReading {
    pub fn new(timestamp_ms: u64, kind: MetricKind, value: f64) -> Self {
        Self {
            timestamp_ms,
            kind,
            value,
            unit: kind.unit().to_string(),
        }
    }

    pub fn status(&self) -> MetricStatus {
        self.kind.status(self.value)
    }
}

/// Draws readings from an injected random source.
#[derive(Debug, Clone)]
pub struct MetricGenerator<R> {
    rng: R,
    ranges: MetricRanges,
}

impl<R: Rng> MetricGenerator<R> {
    /// Unusable ranges fall back to the defaults for their kind; reject them
    /// earlier with [`MetricRanges::first_invalid`] to surface the error instead.
    pub fn new(rng: R, ranges: MetricRanges) -> Self {
        Self {
            rng,
            ranges: ranges.sanitized(),
        }
    }

    pub fn ranges(&self) -> &MetricRanges {
        &self.ranges
    }

    /// Produce one reading stamped with `now_ms`.
    pub fn generate(&mut self, now_ms: u64) -> MetricReading {
        let kind = MetricKind::ALL[self.rng.gen_range(0..MetricKind::ALL.len())];
        let range = self.ranges.get(kind);
        let value = self.rng.gen_range(range.min..=range.max);
        MetricReading::new(now_ms, kind, value)
    }
}

// ============================================================================
// FEED
// ============================================================================

/// Default number of readings kept in the live feed.
pub const DEFAULT_FEED_CAPACITY: usize = 9;

/// Fixed-capacity, newest-first buffer of readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "FeedParts")]
pub struct TelemetryFeed {
    capacity: usize,
    readings: VecDeque<MetricReading>,
}

/// Serialized form of a feed; rebuilt through [`TelemetryFeed::new`] on load.
#[derive(Deserialize)]
struct FeedParts {
    capacity: usize,
    readings: Vec<MetricReading>,
}

impl From<FeedParts> for TelemetryFeed {
    fn from(parts: FeedParts) -> Self {
        let mut feed = TelemetryFeed::new(parts.capacity);
        // Oldest first, so the newest readings survive eviction
        for reading in parts.readings.into_iter().rev() {
            feed.push(reading);
        }
        feed
    }
}

impl TelemetryFeed {
    /// Capacity below 1 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Prepend a reading, dropping the oldest one when full.
    pub fn push(&mut self, reading: MetricReading) {
        self.readings.push_front(reading);
        if self.readings.len() > self.capacity {
            self.readings.pop_back();
        }
    }

    /// Current contents, newest first.
    pub fn snapshot(&self) -> Vec<MetricReading> {
        self.readings.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricReading> {
        self.readings.iter()
    }

    pub fn latest(&self) -> Option<&MetricReading> {
        self.readings.front()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

impl Default for TelemetryFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}
