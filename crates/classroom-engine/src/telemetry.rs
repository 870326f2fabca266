//! Logging setup and metric names

use tracing_subscriber::FmtSubscriber;

use crate::config::LoggingConfig;
use crate::EngineError;

pub const FRAMES_PROCESSED: &str = "classroom_frames_processed_total";
pub const FRAMES_WITH_FACES: &str = "classroom_frames_with_faces_total";
pub const SEAT_DEPARTURES: &str = "classroom_seat_departures_total";
pub const LOOK_DOWN_EVENTS: &str = "classroom_look_down_events_total";
pub const INTERVENTIONS_SUGGESTED: &str = "classroom_interventions_total";
pub const ENGAGEMENT_SCORE: &str = "classroom_engagement_score";

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), EngineError> {
    let level = config.max_level()?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| EngineError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_fails() {
        let config = LoggingConfig::default();
        let first = init_logging(&config);
        let second = init_logging(&config);
        // Another test may have installed a subscriber first
        assert!(first.is_ok() || matches!(first, Err(EngineError::Telemetry(_))));
        assert!(matches!(second, Err(EngineError::Telemetry(_))));
    }

    #[test]
    fn test_bad_level_rejected() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            json: false,
        };
        assert!(matches!(init_logging(&config), Err(EngineError::InvalidConfig(_))));
    }
}
