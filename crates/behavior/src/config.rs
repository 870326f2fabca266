//! Behavior classification configuration

use serde::{Deserialize, Serialize};

use crate::BehaviorError;

/// Head-pose thresholds (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseThresholds {
    /// |pitch| above this flags distraction
    pub distraction_pitch: f64,
    /// |yaw| above this flags distraction
    pub distraction_yaw: f64,
    /// Angle beyond which the look direction leaves Center
    pub direction: f64,
}

impl Default for PoseThresholds {
    fn default() -> Self {
        Self {
            distraction_pitch: 15.0,
            distraction_yaw: 20.0,
            direction: 10.0,
        }
    }
}

/// Look-down latch thresholds (degrees, pitch)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookDownThresholds {
    /// Pitch below this latches "looking down"
    pub enter_pitch: f64,
    /// Pitch above this releases the latch and counts one event
    pub exit_pitch: f64,
}

impl Default for LookDownThresholds {
    fn default() -> Self {
        Self {
            enter_pitch: -20.0,
            exit_pitch: -15.0,
        }
    }
}

/// Behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Mean EAR below this is drowsy
    pub ear_threshold: f64,

    pub pose: PoseThresholds,

    pub look_down: LookDownThresholds,

    /// Continuous absence before the seat counts as empty (milliseconds)
    pub seat_absence_timeout_ms: u64,

    /// Consecutive drowsy frames before a drowsiness episode is counted
    pub drowsy_episode_frames: u32,

    /// Consecutive distracted frames before a distraction episode is counted
    pub distraction_episode_frames: u32,

    /// Emotion model refresh interval (frames)
    pub emotion_refresh_frames: u64,

    /// Label reported when no emotion model runs
    pub default_emotion: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            pose: PoseThresholds::default(),
            look_down: LookDownThresholds::default(),
            seat_absence_timeout_ms: 3000,
            drowsy_episode_frames: 15,
            distraction_episode_frames: 10,
            emotion_refresh_frames: 30,
            default_emotion: "Neutral".to_string(),
        }
    }
}

impl BehaviorConfig {
    /// Create strict config (flags earlier)
    pub fn strict() -> Self {
        Self {
            ear_threshold: 0.28,
            pose: PoseThresholds {
                distraction_pitch: 10.0,
                distraction_yaw: 15.0,
                ..Default::default()
            },
            seat_absence_timeout_ms: 2000,
            drowsy_episode_frames: 10,
            distraction_episode_frames: 5,
            ..Default::default()
        }
    }

    /// Create lenient config (flags later)
    pub fn lenient() -> Self {
        Self {
            ear_threshold: 0.2,
            pose: PoseThresholds {
                distraction_pitch: 25.0,
                distraction_yaw: 30.0,
                ..Default::default()
            },
            seat_absence_timeout_ms: 5000,
            drowsy_episode_frames: 30,
            distraction_episode_frames: 20,
            ..Default::default()
        }
    }

    /// Check thresholds are usable; reports the first problem found
    pub fn validate(&self) -> Result<(), BehaviorError> {
        if !(self.ear_threshold > 0.0) {
            return Err(BehaviorError::Config(format!("ear_threshold must be positive, got {}", self.ear_threshold)));
        }
        if !(self.pose.distraction_pitch >= 0.0 && self.pose.distraction_yaw >= 0.0 && self.pose.direction >= 0.0) {
            return Err(BehaviorError::Config("pose thresholds must be non-negative".to_string()));
        }
        if !(self.look_down.exit_pitch > self.look_down.enter_pitch) {
            return Err(BehaviorError::Config(format!(
                "look_down.exit_pitch ({}) must be above enter_pitch ({})",
                self.look_down.exit_pitch, self.look_down.enter_pitch
            )));
        }
        if self.drowsy_episode_frames == 0 || self.distraction_episode_frames == 0 {
            return Err(BehaviorError::Config("episode frame counts must be at least 1".to_string()));
        }
        if self.emotion_refresh_frames == 0 {
            return Err(BehaviorError::Config("emotion_refresh_frames must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BehaviorConfig::default();
        assert_eq!(config.ear_threshold, 0.25);
        assert_eq!(config.pose.distraction_pitch, 15.0);
        assert_eq!(config.pose.distraction_yaw, 20.0);
        assert_eq!(config.look_down.enter_pitch, -20.0);
        assert_eq!(config.look_down.exit_pitch, -15.0);
        assert_eq!(config.seat_absence_timeout_ms, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        assert!(BehaviorConfig::strict().validate().is_ok());
        assert!(BehaviorConfig::lenient().validate().is_ok());
        assert!(BehaviorConfig::strict().seat_absence_timeout_ms < BehaviorConfig::lenient().seat_absence_timeout_ms);
    }

    #[test]
    fn test_inverted_latch_rejected() {
        let config = BehaviorConfig {
            look_down: LookDownThresholds {
                enter_pitch: -10.0,
                exit_pitch: -20.0,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BehaviorError::Config(_))));
    }

    #[test]
    fn test_zero_episode_frames_rejected() {
        let config = BehaviorConfig {
            drowsy_episode_frames: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            BehaviorError::Config("episode frame counts must be at least 1".to_string())
        );
    }

    #[test]
    fn test_partial_deserialize() {
        let config: BehaviorConfig = serde_json::from_str(r#"{"ear_threshold": 0.3}"#).unwrap();
        assert_eq!(config.ear_threshold, 0.3);
        assert_eq!(config.seat_absence_timeout_ms, 3000);
    }
}
