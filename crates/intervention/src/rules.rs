//! Intervention Rule Engine

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use session_analytics::FrameAggregate;
use tracing::debug;

/// Rule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterventionConfig {
    /// Engagement below this suggests a stretch break (default: 70)
    pub engagement_threshold: f64,
    /// Fraction of drowsy faces above which a poll is suggested (default: 0.3)
    pub drowsy_ratio_threshold: f64,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            engagement_threshold: 70.0,
            drowsy_ratio_threshold: 0.3,
        }
    }
}

/// Suggested instructor action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intervention {
    StretchBreak,
    InteractivePoll,
}

impl Intervention {
    /// Message shown on the dashboard
    pub fn message(&self) -> &'static str {
        match self {
            Intervention::StretchBreak => "Attention dropping! Suggest a 2-minute stretch break.",
            Intervention::InteractivePoll => "High drowsiness detected. Try an interactive poll/quiz.",
        }
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Intervention {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Stateless rule evaluation, first matching rule wins
#[derive(Debug, Clone, Default)]
pub struct InterventionRules {
    config: InterventionConfig,
}

impl InterventionRules {
    pub fn new(config: InterventionConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, aggregate: &FrameAggregate) -> Option<Intervention> {
        let suggestion = if aggregate.engagement_score < self.config.engagement_threshold {
            Some(Intervention::StretchBreak)
        } else if aggregate.drowsy_count as f64 > aggregate.total as f64 * self.config.drowsy_ratio_threshold {
            Some(Intervention::InteractivePoll)
        } else {
            None
        };

        if let Some(intervention) = suggestion {
            debug!("Intervention suggested: {:?}", intervention);
        }
        suggestion
    }

    pub fn config(&self) -> &InterventionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(total: usize, distracted: usize, drowsy: usize, engagement: f64) -> FrameAggregate {
        FrameAggregate {
            total,
            distracted_count: distracted,
            drowsy_count: drowsy,
            engagement_score: engagement,
        }
    }

    #[test]
    fn test_stretch_break_takes_precedence() {
        let rules = InterventionRules::default();
        let result = rules.evaluate(&aggregate(10, 0, 4, 60.0));
        assert_eq!(result, Some(Intervention::StretchBreak));
    }

    #[test]
    fn test_poll_when_engaged_but_drowsy() {
        let rules = InterventionRules::default();
        let result = rules.evaluate(&aggregate(3, 0, 1, 70.0));
        assert_eq!(result, Some(Intervention::InteractivePoll));
    }

    #[test]
    fn test_no_suggestion() {
        let rules = InterventionRules::default();
        assert_eq!(rules.evaluate(&aggregate(10, 1, 2, 70.0)), None);
        assert_eq!(rules.evaluate(&FrameAggregate::neutral()), None);
    }

    #[test]
    fn test_drowsy_ratio_is_strict() {
        let rules = InterventionRules::default();
        // Exactly 30% drowsy does not trigger
        assert_eq!(rules.evaluate(&aggregate(10, 0, 3, 80.0)), None);
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&Some(Intervention::StretchBreak)).unwrap();
        assert_eq!(json, "\"Attention dropping! Suggest a 2-minute stretch break.\"");
        assert_eq!(
            Intervention::InteractivePoll.to_string(),
            "High drowsiness detected. Try an interactive poll/quiz."
        );
    }
}
