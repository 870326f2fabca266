//! Session Analytics
//!
//! Folds classified frames into class-wide engagement statistics, keeps the
//! session history, and reduces it to an end-of-session summary.

mod aggregate;
mod history;
mod report;

pub use aggregate::{engagement_score, AnalyticsConfig, FrameAggregate, SessionAggregator, NEUTRAL_ENGAGEMENT};
pub use history::{HistoryEntry, SessionHistory};
pub use report::{dominant_emotion, summarize, SessionSummary, NO_EMOTION};
