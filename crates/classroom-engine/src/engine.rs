//! Per-session engine
//!
//! One `SessionEngine` per classroom session. A frame is classified,
//! aggregated and checked against the intervention rules in a single call,
//! and every piece of session state is committed before that call returns.

use std::sync::Arc;

use behavior::{BehaviorCounters, BehaviorModule, EmotionModel, EmotionSource, FrameInput, PoseSolver};
use chrono::{DateTime, Utc};
use intervention::InterventionRules;
use metrics::{counter, gauge};
use session_analytics::{summarize, SessionAggregator, SessionHistory, SessionSummary};
use tracing::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::record::{FaceRecord, FrameRecord, SessionReport};
use crate::telemetry;
use crate::EngineError;

pub struct SessionEngine {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    behavior: BehaviorModule,
    aggregator: SessionAggregator,
    rules: InterventionRules,
}

impl SessionEngine {
    /// Create an engine whose frame clock starts at `started_at_ms`.
    ///
    /// Without an emotion model every face reports the configured default label.
    pub fn new(
        config: &EngineConfig,
        pose_solver: Arc<dyn PoseSolver>,
        emotion_model: Option<Box<dyn EmotionModel>>,
        started_at_ms: u64,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let behavior_config = config.behavior.clone();
        let emotion = match emotion_model {
            Some(model) => EmotionSource::model(
                model,
                behavior_config.emotion_refresh_frames,
                behavior_config.default_emotion.clone(),
            ),
            None => EmotionSource::disabled(behavior_config.default_emotion.clone()),
        };

        let session_id = Uuid::new_v4();
        info!(
            "Session {} started (emotion model: {})",
            session_id,
            emotion.is_enabled()
        );

        Ok(Self {
            session_id,
            started_at: Utc::now(),
            behavior: BehaviorModule::new(behavior_config, pose_solver, emotion, started_at_ms)?,
            aggregator: SessionAggregator::new(config.analytics.clone()),
            rules: InterventionRules::new(config.intervention.clone()),
        })
    }

    /// Classify, aggregate and evaluate one frame
    pub fn process_frame(&mut self, frame: &FrameInput) -> FrameRecord {
        let classification = self.behavior.classify_frame(frame);
        let stats = self.aggregator.aggregate(&classification);
        let intervention = self.rules.evaluate(&stats);

        counter!(telemetry::FRAMES_PROCESSED).increment(1);
        if classification.has_faces() {
            counter!(telemetry::FRAMES_WITH_FACES).increment(1);
        }
        if classification.seat_left {
            counter!(telemetry::SEAT_DEPARTURES).increment(1);
        }
        if classification.look_down_events > 0 {
            counter!(telemetry::LOOK_DOWN_EVENTS).increment(u64::from(classification.look_down_events));
        }
        if intervention.is_some() {
            counter!(telemetry::INTERVENTIONS_SUGGESTED).increment(1);
        }
        gauge!(telemetry::ENGAGEMENT_SCORE).set(stats.engagement_score);

        FrameRecord {
            timestamp_ms: classification.timestamp_ms,
            students: classification.faces.iter().map(FaceRecord::from).collect(),
            stats,
            intervention,
            seat_empty: classification.seat_empty,
            drowsy_episode_active: classification.drowsy_episode_active,
            distraction_episode_active: classification.distraction_episode_active,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        summarize(self.aggregator.history(), &self.behavior.counters())
    }

    /// Snapshot the session into a report
    pub fn report(&self) -> SessionReport {
        let summary = self.summary();
        info!(
            "Report for session {}: {} frames, engagement {:.1}%",
            self.session_id, summary.frames_analyzed, summary.average_engagement
        );

        SessionReport {
            session_id: self.session_id,
            started_at: self.started_at,
            generated_at: Utc::now(),
            summary,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn history(&self) -> &SessionHistory {
        self.aggregator.history()
    }

    pub fn counters(&self) -> BehaviorCounters {
        self.behavior.counters()
    }
}
