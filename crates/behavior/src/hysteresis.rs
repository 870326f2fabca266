//! Debouncing of transient signals into discrete events

use crate::config::LookDownThresholds;

/// Schmitt trigger on head pitch.
///
/// Latches when pitch drops below the enter threshold and counts one event
/// when pitch rises back above the (less extreme) exit threshold.
#[derive(Debug, Clone, Copy)]
pub struct LookDownLatch {
    thresholds: LookDownThresholds,
    latched: bool,
    count: u32,
}

impl LookDownLatch {
    pub fn new(thresholds: LookDownThresholds) -> Self {
        Self {
            thresholds,
            latched: false,
            count: 0,
        }
    }

    /// Feed one pitch sample; returns true when a look-down event completes
    pub fn update(&mut self, pitch: f64) -> bool {
        if pitch < self.thresholds.enter_pitch {
            self.latched = true;
        } else if self.latched && pitch > self.thresholds.exit_pitch {
            self.latched = false;
            self.count += 1;
            return true;
        }
        false
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Counts an episode once a condition holds for `min_frames` consecutive frames
#[derive(Debug, Clone, Copy)]
pub struct SustainedCondition {
    min_frames: u32,
    run: u32,
    active: bool,
    episodes: u32,
}

impl SustainedCondition {
    pub fn new(min_frames: u32) -> Self {
        Self {
            min_frames: min_frames.max(1),
            run: 0,
            active: false,
            episodes: 0,
        }
    }

    /// Feed one frame; returns true on the frame an episode begins
    pub fn update(&mut self, holds: bool) -> bool {
        if !holds {
            self.run = 0;
            self.active = false;
            return false;
        }

        self.run = self.run.saturating_add(1);
        if self.run >= self.min_frames && !self.active {
            self.active = true;
            self.episodes += 1;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn episodes(&self) -> u32 {
        self.episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event_on_release() {
        let mut latch = LookDownLatch::new(LookDownThresholds::default());
        let fired: Vec<bool> = [-25.0, -25.0, -25.0, -10.0]
            .into_iter()
            .map(|p| latch.update(p))
            .collect();
        assert_eq!(fired, vec![false, false, false, true]);
        assert_eq!(latch.count(), 1);
        assert!(!latch.is_latched());
    }

    #[test]
    fn test_dead_band_holds_latch() {
        let mut latch = LookDownLatch::new(LookDownThresholds::default());
        latch.update(-21.0);
        // Between -20 and -15 nothing changes
        for pitch in [-19.0, -16.0, -15.0, -18.0] {
            assert!(!latch.update(pitch));
            assert!(latch.is_latched());
        }
        assert!(latch.update(-14.9));
        assert_eq!(latch.count(), 1);
    }

    #[test]
    fn test_no_event_without_entering() {
        let mut latch = LookDownLatch::new(LookDownThresholds::default());
        for pitch in [-19.0, -10.0, 5.0, -18.0, 0.0] {
            assert!(!latch.update(pitch));
        }
        assert_eq!(latch.count(), 0);
    }

    #[test]
    fn test_episode_counted_once() {
        let mut condition = SustainedCondition::new(3);
        let fired: Vec<bool> = [true, true, true, true, true]
            .into_iter()
            .map(|h| condition.update(h))
            .collect();
        assert_eq!(fired, vec![false, false, true, false, false]);
        assert_eq!(condition.episodes(), 1);
        assert!(condition.is_active());
    }

    #[test]
    fn test_interrupted_run_resets() {
        let mut condition = SustainedCondition::new(3);
        for holds in [true, true, false, true, true] {
            condition.update(holds);
        }
        assert_eq!(condition.episodes(), 0);

        condition.update(true);
        condition.update(false);
        for _ in 0..3 {
            condition.update(true);
        }
        assert_eq!(condition.episodes(), 2);
    }
}
