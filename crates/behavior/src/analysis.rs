//! Per-frame inputs and classification results

use serde::{Deserialize, Serialize};

use crate::landmarks::{LandmarkSet, ScreenPosition};
use crate::pose::{LookDirection, PoseEstimate};
use crate::BehaviorError;

/// One frame of detector output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Capture timestamp (milliseconds, monotonic within a session)
    pub timestamp_ms: u64,
    pub width: u32,
    pub height: u32,
    /// Detected faces, possibly none
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

impl FrameInput {
    pub fn new(timestamp_ms: u64, width: u32, height: u32, faces: Vec<LandmarkSet>) -> Self {
        Self {
            timestamp_ms,
            width,
            height,
            faces,
        }
    }

    /// A frame in which the detector found nobody
    pub fn empty(timestamp_ms: u64, width: u32, height: u32) -> Self {
        Self::new(timestamp_ms, width, height, Vec::new())
    }

    /// Check the frame has a usable size and every face was detected on it.
    ///
    /// Pose intrinsics come from each face's size while the heatmap uses the
    /// frame's, so the two must agree.
    pub fn validate(&self) -> Result<(), BehaviorError> {
        if self.width == 0 || self.height == 0 {
            return Err(BehaviorError::InvalidFrame {
                width: self.width,
                height: self.height,
            });
        }
        for (slot, face) in self.faces.iter().enumerate() {
            if face.width() != self.width || face.height() != self.height {
                return Err(BehaviorError::FrameSizeMismatch {
                    slot,
                    width: self.width,
                    height: self.height,
                    face_width: face.width(),
                    face_height: face.height(),
                });
            }
        }
        Ok(())
    }
}

/// Classification of one face in one frame.
///
/// `slot` is the face's position in the detector output for this frame only;
/// it carries no identity across frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    pub slot: usize,
    pub ear: f64,
    pub drowsy: bool,
    pub pose: PoseEstimate,
    pub distracted: bool,
    pub looking_direction: LookDirection,
    pub emotion: String,
    pub screen_position: ScreenPosition,
}

/// Classification of a whole frame plus the hysteresis outcome it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameClassification {
    pub timestamp_ms: u64,
    pub width: u32,
    pub height: u32,
    pub faces: Vec<FaceObservation>,
    pub seat_empty: bool,
    /// Seat turned empty on this frame
    pub seat_left: bool,
    /// Look-down events completed on this frame
    pub look_down_events: u32,
    pub drowsy_episode_active: bool,
    pub distraction_episode_active: bool,
}

impl FrameClassification {
    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    pub fn drowsy_count(&self) -> usize {
        self.faces.iter().filter(|f| f.drowsy).count()
    }

    pub fn distracted_count(&self) -> usize {
        self.faces.iter().filter(|f| f.distracted).count()
    }
}

/// Cumulative event counts for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorCounters {
    pub leaving_seat_count: u32,
    pub looking_down_count: u32,
    pub drowsy_episode_count: u32,
    pub distraction_episode_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures;

    #[test]
    fn test_matching_frame_validates() {
        let frame = FrameInput::new(0, 640, 480, vec![fixtures::open_eyed_face()]);
        assert!(frame.validate().is_ok());
        assert!(FrameInput::empty(0, 640, 480).validate().is_ok());
    }

    #[test]
    fn test_zero_sized_frame_rejected() {
        let err = FrameInput::empty(0, 0, 480).validate().unwrap_err();
        assert_eq!(err, BehaviorError::InvalidFrame { width: 0, height: 480 });
    }

    #[test]
    fn test_face_from_other_frame_rejected() {
        let faces = vec![fixtures::open_eyed_face(), fixtures::open_eyed_face()];
        let err = FrameInput::new(0, 1280, 720, faces).validate().unwrap_err();
        assert_eq!(
            err,
            BehaviorError::FrameSizeMismatch {
                slot: 0,
                width: 1280,
                height: 720,
                face_width: 640,
                face_height: 480,
            }
        );
    }
}
