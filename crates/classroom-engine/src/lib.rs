//! Classroom Engagement Engine
//!
//! Runs one classroom session: classifies each frame's faces, aggregates
//! class-wide engagement, suggests interventions, and produces the
//! end-of-session report.

pub mod config;
pub mod engine;
pub mod record;
pub mod runner;
pub mod telemetry;

pub use config::{EngineConfig, LoggingConfig, RunnerConfig};
pub use engine::SessionEngine;
pub use record::{FaceRecord, FrameRecord, SessionReport};
pub use runner::{spawn_session, SessionHandle};
pub use telemetry::init_logging;

pub use behavior::{
    BehaviorError, EmotionModel, FrameInput, HeadPose, LandmarkSet, LookDirection, PnpProblem,
    Point2, PoseEstimate, PoseSolver, UnavailablePoseSolver,
};
pub use intervention::Intervention;
pub use session_analytics::{FrameAggregate, SessionSummary};

use thiserror::Error;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Session closed")]
    SessionClosed,

    #[error("Session task failed: {0}")]
    TaskFailed(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
