//! Per-frame aggregation and engagement scoring

use behavior::FrameClassification;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::history::{HistoryEntry, SessionHistory};

/// Score reported for a frame without faces
pub const NEUTRAL_ENGAGEMENT: f64 = 100.0;

/// Aggregation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Engagement below this marks the frame as a distraction event
    pub distraction_event_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            distraction_event_threshold: 70.0,
        }
    }
}

/// Class-wide statistics for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameAggregate {
    pub total: usize,
    #[serde(rename = "distracted")]
    pub distracted_count: usize,
    #[serde(rename = "drowsy")]
    pub drowsy_count: usize,
    #[serde(rename = "engagement")]
    pub engagement_score: f64,
}

impl FrameAggregate {
    /// Aggregate of a frame in which nobody was detected
    pub fn neutral() -> Self {
        Self {
            total: 0,
            distracted_count: 0,
            drowsy_count: 0,
            engagement_score: NEUTRAL_ENGAGEMENT,
        }
    }
}

/// Engagement in [0, 100].
///
/// A face that is both drowsy and distracted is penalized twice.
pub fn engagement_score(total: usize, distracted_count: usize, drowsy_count: usize) -> f64 {
    if total == 0 {
        return NEUTRAL_ENGAGEMENT;
    }
    let flagged = (distracted_count + drowsy_count) as f64;
    (100.0 - flagged / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Owns the session history and folds classified frames into it
#[derive(Debug, Clone, Default)]
pub struct SessionAggregator {
    config: AnalyticsConfig,
    history: SessionHistory,
}

impl SessionAggregator {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            config,
            history: SessionHistory::new(),
        }
    }

    /// Aggregate one frame; frames without faces are neutral and not logged
    pub fn aggregate(&mut self, frame: &FrameClassification) -> FrameAggregate {
        let total = frame.faces.len();
        if total == 0 {
            return FrameAggregate::neutral();
        }

        let distracted_count = frame.distracted_count();
        let drowsy_count = frame.drowsy_count();
        let score = engagement_score(total, distracted_count, drowsy_count);
        let distraction_event = score < self.config.distraction_event_threshold;

        self.history.note_frame_size(frame.width, frame.height);
        self.history.push_entry(HistoryEntry {
            timestamp_ms: frame.timestamp_ms,
            engagement_score: score,
            distraction_event,
        });
        for face in &frame.faces {
            self.history.push_face(&face.emotion, face.screen_position);
        }

        debug!(
            "Frame {}ms: total={} distracted={} drowsy={} engagement={:.1}",
            frame.timestamp_ms, total, distracted_count, drowsy_count, score
        );

        FrameAggregate {
            total,
            distracted_count,
            drowsy_count,
            engagement_score: score,
        }
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }
}
