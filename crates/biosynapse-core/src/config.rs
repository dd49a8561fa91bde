//! Dashboard configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Values are checked by [`DashboardConfig::validate`] before an engine is
//! built from them.

use std::path::Path;

use biosynapse_logic::mission::{MissionProfile, MAX_TICK_MS};
use biosynapse_logic::telemetry::{MetricRanges, DEFAULT_FEED_CAPACITY};
use serde::{Deserialize, Serialize};

/// Telemetry stream settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Readings kept in the live feed.
    pub capacity: usize,
    /// Milliseconds between generated readings.
    pub refresh_ms: u64,
    /// Start the stream as soon as the engine is built.
    pub autostart: bool,
    pub ranges: MetricRanges,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_FEED_CAPACITY,
            refresh_ms: 1500,
            autostart: true,
            ranges: MetricRanges::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seed for the telemetry random source.
    pub seed: u64,
    pub telemetry: TelemetryConfig,
    pub mission: MissionProfile,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            telemetry: TelemetryConfig::default(),
            mission: MissionProfile::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry.capacity == 0 {
            return Err(ConfigError::Invalid(
                "telemetry capacity must be at least 1".into(),
            ));
        }
        if self.telemetry.refresh_ms == 0 || self.telemetry.refresh_ms > MAX_TICK_MS {
            return Err(ConfigError::Invalid(format!(
                "telemetry refresh_ms must be in 1..={}, got {}",
                MAX_TICK_MS, self.telemetry.refresh_ms
            )));
        }
        if let Some(kind) = self.telemetry.ranges.first_invalid() {
            let range = self.telemetry.ranges.get(kind);
            return Err(ConfigError::Invalid(format!(
                "invalid {} range [{}, {}]",
                kind, range.min, range.max
            )));
        }
        if let Some(problem) = self.mission.problem() {
            return Err(ConfigError::Invalid(problem));
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biosynapse_logic::telemetry::MetricRange;

    #[test]
    fn test_default_is_valid() {
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = DashboardConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "seed": 7,
            "telemetry": { "capacity": 4, "ranges": { "heart_rate": { "min": 50.0, "max": 55.0 } } },
            "mission": { "progress_step": 1.0 }
        }"#;
        let config = DashboardConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.telemetry.capacity, 4);
        assert_eq!(config.telemetry.refresh_ms, 1500);
        assert_eq!(config.telemetry.ranges.heart_rate, MetricRange::new(50.0, 55.0));
        assert_eq!(
            config.telemetry.ranges.sleep_quality,
            MetricRanges::default().sleep_quality
        );
        assert_eq!(config.mission.progress_step, 1.0);
        assert_eq!(config.mission.risk_threshold, 20.0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = DashboardConfig::from_json_str(r#"{ "telemetry": { "capacity": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = DashboardConfig::default();
        config.telemetry.ranges.body_temperature = MetricRange::new(38.0, 36.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Body Temperature"));
    }

    #[test]
    fn test_bad_mission_profile_rejected() {
        let err = DashboardConfig::from_json_str(r#"{ "mission": { "tick_ms": 0 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("tick_ms"));
    }

    #[test]
    fn test_overflowing_range_span_rejected() {
        let wide = r#"{ "min": -1e308, "max": 1e308 }"#;
        let json = format!(
            r#"{{ "telemetry": {{ "ranges": {{
                "heart_rate": {w}, "oxygen_saturation": {w}, "body_temperature": {w},
                "radiation_exposure": {w}, "sleep_quality": {w}
            }} }} }}"#,
            w = wide
        );
        let err = DashboardConfig::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("Heart Rate"));
    }

    #[test]
    fn test_unbounded_periods_rejected() {
        let err = DashboardConfig::from_json_str(
            r#"{ "mission": { "tick_ms": 18446744073709551615 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("tick_ms"));

        let err = DashboardConfig::from_json_str(
            r#"{ "telemetry": { "refresh_ms": 18446744073709551615 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("refresh_ms"));
    }

    #[test]
    fn test_malformed_json() {
        let err = DashboardConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
