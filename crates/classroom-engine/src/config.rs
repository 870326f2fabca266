//! Engine configuration

use std::str::FromStr;

use behavior::{BehaviorConfig, BehaviorError};
use intervention::InterventionConfig;
use serde::{Deserialize, Serialize};
use session_analytics::AnalyticsConfig;
use tracing::Level;

use crate::EngineError;

/// Environment variable prefix, e.g. `CLASSROOM_BEHAVIOR__EAR_THRESHOLD=0.3`
pub const ENV_PREFIX: &str = "CLASSROOM";

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Classifier and hysteresis thresholds
    pub behavior: BehaviorConfig,

    /// Aggregation thresholds
    pub analytics: AnalyticsConfig,

    /// Intervention rule thresholds
    pub intervention: InterventionConfig,

    /// Session task settings
    pub runner: RunnerConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Bounded capacity of the frame and record channels
    pub channel_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { channel_capacity: 64 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn, error
    pub level: String,

    /// Emit JSON lines instead of plain text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<Level, EngineError> {
        Level::from_str(&self.level)
            .map_err(|_| EngineError::InvalidConfig(format!("unknown log level {:?}", self.level)))
    }
}

impl EngineConfig {
    /// Load configuration from file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self, EngineError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .add_source(environment())
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self, EngineError> {
        let settings = ::config::Config::builder()
            .add_source(environment())
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that cannot produce meaningful output
    pub fn validate(&self) -> Result<(), EngineError> {
        self.behavior.validate().map_err(|e| match e {
            BehaviorError::Config(reason) => EngineError::InvalidConfig(reason),
            other => EngineError::Behavior(other),
        })?;

        let event_threshold = self.analytics.distraction_event_threshold;
        if !(0.0..=100.0).contains(&event_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "analytics.distraction_event_threshold must be within [0, 100], got {}",
                event_threshold
            )));
        }

        let engagement = self.intervention.engagement_threshold;
        if !(0.0..=100.0).contains(&engagement) {
            return Err(EngineError::InvalidConfig(format!(
                "intervention.engagement_threshold must be within [0, 100], got {}",
                engagement
            )));
        }

        let ratio = self.intervention.drowsy_ratio_threshold;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(EngineError::InvalidConfig(format!(
                "intervention.drowsy_ratio_threshold must be within [0, 1], got {}",
                ratio
            )));
        }

        if self.runner.channel_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "runner.channel_capacity must be at least 1".to_string(),
            ));
        }

        self.logging.max_level()?;
        Ok(())
    }
}

fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
