//! Session-scoped hysteresis state

use crate::analysis::BehaviorCounters;
use crate::config::BehaviorConfig;
use crate::hysteresis::{LookDownLatch, SustainedCondition};
use crate::occupancy::SeatOccupancy;

/// Hysteresis state tracked across the frames of one session
#[derive(Debug, Clone)]
pub struct BehaviorState {
    pub occupancy: SeatOccupancy,
    pub look_down: LookDownLatch,
    pub drowsy: SustainedCondition,
    pub distraction: SustainedCondition,
}

impl BehaviorState {
    pub fn new(config: &BehaviorConfig, started_at_ms: u64) -> Self {
        Self {
            occupancy: SeatOccupancy::new(started_at_ms, config.seat_absence_timeout_ms),
            look_down: LookDownLatch::new(config.look_down),
            drowsy: SustainedCondition::new(config.drowsy_episode_frames),
            distraction: SustainedCondition::new(config.distraction_episode_frames),
        }
    }

    pub fn counters(&self) -> BehaviorCounters {
        BehaviorCounters {
            leaving_seat_count: self.occupancy.leaving_seat_count(),
            looking_down_count: self.look_down.count(),
            drowsy_episode_count: self.drowsy.episodes(),
            distraction_episode_count: self.distraction.episodes(),
        }
    }

    /// Reset state (on session restart)
    pub fn reset(&mut self, config: &BehaviorConfig, started_at_ms: u64) {
        *self = Self::new(config, started_at_ms);
    }
}
