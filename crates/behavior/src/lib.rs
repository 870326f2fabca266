//! Behavioral classification for classroom cameras
//!
//! Turns per-frame facial landmarks into behavioral signals:
//! - Eye aspect ratio (drowsiness)
//! - Head pose (distraction and look direction)
//! - Look-down events with hysteresis
//! - Seat occupancy across frames without faces
//! - Sustained drowsiness / distraction episodes

pub mod analysis;
pub mod config;
pub mod ear;
pub mod emotion;
pub mod hysteresis;
pub mod landmarks;
pub mod occupancy;
pub mod pose;
pub mod state;

pub use analysis::{BehaviorCounters, FaceObservation, FrameClassification, FrameInput};
pub use config::{BehaviorConfig, LookDownThresholds, PoseThresholds};
pub use ear::{eye_aspect_ratio, DrowsinessClassifier, EyeReading};
pub use emotion::{EmotionModel, EmotionSource};
pub use landmarks::{EyeContour, Landmark, LandmarkSet, Point2, ScreenPosition};
pub use occupancy::{SeatOccupancy, SeatState};
pub use pose::{
    CameraIntrinsics, DistractionClassifier, HeadPose, LookDirection, PnpProblem, PoseEstimate,
    PoseReading, PoseSolver, UnavailablePoseSolver,
};
pub use state::BehaviorState;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

/// Behavior error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BehaviorError {
    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },

    #[error("Face has {found} landmarks, {required} required")]
    MissingLandmarks { required: usize, found: usize },

    #[error("Landmark {0} has a non-finite coordinate")]
    NonFiniteCoordinate(usize),

    #[error("Face {slot} was detected on a {face_width}x{face_height} frame, expected {width}x{height}")]
    FrameSizeMismatch {
        slot: usize,
        width: u32,
        height: u32,
        face_width: u32,
        face_height: u32,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Per-session behavior classifier
pub struct BehaviorModule {
    config: BehaviorConfig,
    drowsiness: DrowsinessClassifier,
    distraction: DistractionClassifier,
    pose_solver: Arc<dyn PoseSolver>,
    emotion: EmotionSource,
    state: BehaviorState,
}

impl BehaviorModule {
    /// Create a module whose session starts at `started_at_ms`
    pub fn new(
        config: BehaviorConfig,
        pose_solver: Arc<dyn PoseSolver>,
        emotion: EmotionSource,
        started_at_ms: u64,
    ) -> Result<Self, BehaviorError> {
        config.validate()?;

        Ok(Self {
            drowsiness: DrowsinessClassifier::new(config.ear_threshold),
            distraction: DistractionClassifier::new(config.pose),
            state: BehaviorState::new(&config, started_at_ms),
            pose_solver,
            emotion,
            config,
        })
    }

    /// Classify every face in a frame and advance the session's hysteresis
    pub fn classify_frame(&mut self, frame: &FrameInput) -> FrameClassification {
        let emotion = if frame.faces.is_empty() {
            None
        } else {
            Some(self.emotion.label_frame(&frame.faces))
        };

        let mut look_down_events = 0;
        let faces: Vec<FaceObservation> = frame
            .faces
            .iter()
            .enumerate()
            .map(|(slot, face)| {
                let eyes = self.drowsiness.classify(face);
                let pose = self.pose_solver.solve(&PnpProblem::for_face(face));
                let reading = self.distraction.classify(pose);

                match pose.angles() {
                    Some(angles) => {
                        if self.state.look_down.update(angles.pitch) {
                            look_down_events += 1;
                        }
                    }
                    None => debug!("Pose unavailable for face {} at {}ms", slot, frame.timestamp_ms),
                }

                FaceObservation {
                    slot,
                    ear: eyes.ear,
                    drowsy: eyes.drowsy,
                    pose,
                    distracted: reading.distracted,
                    looking_direction: reading.looking_direction,
                    emotion: emotion.clone().unwrap_or_default(),
                    screen_position: face.screen_position(),
                }
            })
            .collect();

        let seat_left = self.state.occupancy.update(frame.timestamp_ms, faces.len());
        if look_down_events > 0 {
            info!(
                "Look-down event completed (count: {})",
                self.state.look_down.count()
            );
        }

        if self.state.drowsy.update(faces.iter().any(|f| f.drowsy)) {
            info!("Sustained drowsiness episode (count: {})", self.state.drowsy.episodes());
        }
        if self.state.distraction.update(faces.iter().any(|f| f.distracted)) {
            info!(
                "Sustained distraction episode (count: {})",
                self.state.distraction.episodes()
            );
        }

        debug!(
            "Classified frame at {}ms: {} faces",
            frame.timestamp_ms,
            faces.len()
        );

        FrameClassification {
            timestamp_ms: frame.timestamp_ms,
            width: frame.width,
            height: frame.height,
            faces,
            seat_empty: self.state.occupancy.is_seat_empty(),
            seat_left,
            look_down_events,
            drowsy_episode_active: self.state.drowsy.is_active(),
            distraction_episode_active: self.state.distraction.is_active(),
        }
    }

    /// Cumulative event counts
    pub fn counters(&self) -> BehaviorCounters {
        self.state.counters()
    }

    pub fn state(&self) -> &BehaviorState {
        &self.state
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Reset hysteresis state (on session restart)
    pub fn reset_state(&mut self, started_at_ms: u64) {
        self.state.reset(&self.config, started_at_ms);
    }
}
