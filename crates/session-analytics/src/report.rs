//! End-of-session summary

use std::collections::HashMap;

use behavior::BehaviorCounters;
use serde::{Deserialize, Serialize};

use crate::history::SessionHistory;

/// Reported when no emotion was ever logged
pub const NO_EMOTION: &str = "N/A";

/// Everything the report renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Mean engagement over logged frames (percent)
    pub average_engagement: f64,
    pub dominant_emotion: String,
    pub distraction_event_count: usize,
    pub leaving_seat_count: u32,
    pub looking_down_count: u32,
    /// Frames with at least one face
    pub frames_analyzed: usize,
    pub drowsy_episode_count: u32,
    pub distraction_episode_count: u32,
}

/// Most frequent label; ties go to the label seen first
pub fn dominant_emotion(labels: &[String]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for label in labels {
        let count = counts.entry(label.as_str()).or_insert(0);
        if *count == 0 {
            order.push(label.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for label in order {
        let count = counts[label];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

/// Reduce a session's history and counters to its summary
pub fn summarize(history: &SessionHistory, counters: &BehaviorCounters) -> SessionSummary {
    SessionSummary {
        average_engagement: history.average_engagement(),
        dominant_emotion: dominant_emotion(history.emotions())
            .unwrap_or(NO_EMOTION)
            .to_string(),
        distraction_event_count: history.distraction_event_count(),
        leaving_seat_count: counters.leaving_seat_count,
        looking_down_count: counters.looking_down_count,
        frames_analyzed: history.len(),
        drowsy_episode_count: counters.drowsy_episode_count,
        distraction_episode_count: counters.distraction_episode_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;
    use behavior::ScreenPosition;
    use proptest::prelude::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_session() {
        let summary = summarize(&SessionHistory::new(), &BehaviorCounters::default());
        assert_eq!(summary.average_engagement, 0.0);
        assert_eq!(summary.dominant_emotion, "N/A");
        assert_eq!(summary.distraction_event_count, 0);
        assert_eq!(summary.leaving_seat_count, 0);
        assert_eq!(summary.looking_down_count, 0);
        assert_eq!(summary.frames_analyzed, 0);
    }

    #[test]
    fn test_dominant_emotion_mode() {
        let log = labels(&["Neutral", "happy", "happy", "sad", "happy"]);
        assert_eq!(dominant_emotion(&log), Some("happy"));
    }

    #[test]
    fn test_dominant_emotion_tie_first_seen() {
        let log = labels(&["sad", "happy", "happy", "sad"]);
        assert_eq!(dominant_emotion(&log), Some("sad"));
        assert_eq!(dominant_emotion(&[]), None);
    }

    #[test]
    fn test_summary_carries_counters() {
        let mut history = SessionHistory::new();
        history.push_entry(HistoryEntry {
            timestamp_ms: 0,
            engagement_score: 40.0,
            distraction_event: true,
        });
        history.push_entry(HistoryEntry {
            timestamp_ms: 33,
            engagement_score: 100.0,
            distraction_event: false,
        });
        history.push_face("Neutral", ScreenPosition::default());

        let counters = BehaviorCounters {
            leaving_seat_count: 2,
            looking_down_count: 5,
            drowsy_episode_count: 1,
            distraction_episode_count: 3,
        };
        let summary = summarize(&history, &counters);
        assert!((summary.average_engagement - 70.0).abs() < 1e-9);
        assert_eq!(summary.dominant_emotion, "Neutral");
        assert_eq!(summary.distraction_event_count, 1);
        assert_eq!(summary.leaving_seat_count, 2);
        assert_eq!(summary.looking_down_count, 5);
        assert_eq!(summary.frames_analyzed, 2);
        assert_eq!(summary.distraction_episode_count, 3);
    }

    proptest! {
        #[test]
        fn prop_average_within_bounds(scores in prop::collection::vec(0.0..=100.0f64, 0..64)) {
            let mut history = SessionHistory::new();
            for (i, score) in scores.iter().enumerate() {
                history.push_entry(HistoryEntry {
                    timestamp_ms: i as u64,
                    engagement_score: *score,
                    distraction_event: *score < 70.0,
                });
            }
            let summary = summarize(&history, &BehaviorCounters::default());
            prop_assert!(summary.average_engagement >= 0.0);
            prop_assert!(summary.average_engagement <= 100.0 + 1e-9);
            prop_assert!(summary.distraction_event_count <= scores.len());
        }
    }
}
