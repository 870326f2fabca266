//! Records emitted to the dashboard and report renderer

use behavior::{FaceObservation, LookDirection, ScreenPosition};
use chrono::{DateTime, Utc};
use intervention::Intervention;
use serde::Serialize;
use session_analytics::{FrameAggregate, SessionSummary};
use uuid::Uuid;

use crate::EngineError;

/// One student's state in a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceRecord {
    /// Slot index within the frame
    pub id: usize,
    pub drowsy: bool,
    pub ear: f64,
    pub distracted: bool,
    pub looking_at: LookDirection,
    pub emotion: String,
    pub position: ScreenPosition,
}

impl From<&FaceObservation> for FaceRecord {
    fn from(face: &FaceObservation) -> Self {
        Self {
            id: face.slot,
            drowsy: face.drowsy,
            ear: round2(face.ear),
            distracted: face.distracted,
            looking_at: face.looking_direction,
            emotion: face.emotion.clone(),
            position: face.screen_position,
        }
    }
}

/// Per-frame output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub timestamp_ms: u64,
    pub students: Vec<FaceRecord>,
    pub stats: FrameAggregate,
    pub intervention: Option<Intervention>,
    pub seat_empty: bool,
    pub drowsy_episode_active: bool,
    pub distraction_episode_active: bool,
}

impl FrameRecord {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub summary: SessionSummary,
}

impl SessionReport {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
