//! Head pose seam and the distraction / look-direction classifier

use serde::{Deserialize, Serialize};

use crate::config::PoseThresholds;
use crate::landmarks::{LandmarkSet, Point2};

/// Head pose (Euler angles, degrees)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Pitch (up-down tilt), negative when looking down
    pub pitch: f64,
    /// Yaw (left-right rotation), negative when looking left
    pub yaw: f64,
}

/// Outcome of a pose solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PoseEstimate {
    Solved(HeadPose),
    /// Solver failed to converge
    Unavailable,
}

impl PoseEstimate {
    pub fn angles(&self) -> Option<HeadPose> {
        match self {
            PoseEstimate::Solved(pose) => Some(*pose),
            PoseEstimate::Unavailable => None,
        }
    }
}

/// 3D point in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Generic face model matching [`crate::Landmark::POSE_POINTS`]
pub const FACE_MODEL: [Point3; 6] = [
    Point3 { x: 0.0, y: 0.0, z: 0.0 },
    Point3 { x: 0.0, y: -330.0, z: -65.0 },
    Point3 { x: -225.0, y: 170.0, z: -135.0 },
    Point3 { x: 225.0, y: 170.0, z: -135.0 },
    Point3 { x: -150.0, y: -150.0, z: -125.0 },
    Point3 { x: 150.0, y: -150.0, z: -125.0 },
];

/// Pinhole camera with no lens distortion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub focal_length: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl CameraIntrinsics {
    /// Focal length approximated by the frame width, principal point at the centre
    pub fn approximate(width: u32, height: u32) -> Self {
        Self {
            focal_length: width as f64,
            center_x: width as f64 / 2.0,
            center_y: height as f64 / 2.0,
        }
    }

    /// Row-major 3x3 camera matrix
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.focal_length, 0.0, self.center_x],
            [0.0, self.focal_length, self.center_y],
            [0.0, 0.0, 1.0],
        ]
    }
}

/// Inputs to a perspective-n-point solve
#[derive(Debug, Clone, PartialEq)]
pub struct PnpProblem {
    pub image_points: [Point2; 6],
    pub model_points: &'static [Point3; 6],
    pub camera: CameraIntrinsics,
}

impl PnpProblem {
    pub fn for_face(face: &LandmarkSet) -> Self {
        Self {
            image_points: face.pose_points(),
            model_points: &FACE_MODEL,
            camera: CameraIntrinsics::approximate(face.width(), face.height()),
        }
    }
}

/// External head-pose solver.
///
/// Implementations return angles in degrees, or `Unavailable` when the solve
/// does not converge.
pub trait PoseSolver: Send + Sync {
    fn solve(&self, problem: &PnpProblem) -> PoseEstimate;
}

impl<F> PoseSolver for F
where
    F: Fn(&PnpProblem) -> PoseEstimate + Send + Sync,
{
    fn solve(&self, problem: &PnpProblem) -> PoseEstimate {
        self(problem)
    }
}

/// Solver used when none is wired in; every face fails open
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePoseSolver;

impl PoseSolver for UnavailablePoseSolver {
    fn solve(&self, _problem: &PnpProblem) -> PoseEstimate {
        PoseEstimate::Unavailable
    }
}

/// Coarse look direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LookDirection {
    #[default]
    Center,
    Up,
    Down,
    Left,
    Right,
}

/// Distraction reading for one face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseReading {
    pub pose: PoseEstimate,
    pub distracted: bool,
    pub looking_direction: LookDirection,
}

/// Maps pose angles to a distraction flag and a look direction.
///
/// The two use independent thresholds; a face can be `Center` and still
/// distracted.
#[derive(Debug, Clone, Copy)]
pub struct DistractionClassifier {
    thresholds: PoseThresholds,
}

impl DistractionClassifier {
    pub fn new(thresholds: PoseThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, pose: PoseEstimate) -> PoseReading {
        let Some(angles) = pose.angles() else {
            return PoseReading {
                pose,
                distracted: false,
                looking_direction: LookDirection::Center,
            };
        };

        PoseReading {
            pose,
            distracted: self.is_distracted(angles),
            looking_direction: self.direction(angles),
        }
    }

    fn is_distracted(&self, angles: HeadPose) -> bool {
        angles.pitch.abs() > self.thresholds.distraction_pitch
            || angles.yaw.abs() > self.thresholds.distraction_yaw
    }

    fn direction(&self, angles: HeadPose) -> LookDirection {
        let limit = self.thresholds.direction;
        if angles.pitch < -limit {
            LookDirection::Down
        } else if angles.pitch > limit {
            LookDirection::Up
        } else if angles.yaw < -limit {
            LookDirection::Left
        } else if angles.yaw > limit {
            LookDirection::Right
        } else {
            LookDirection::Center
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures;

    fn solved(pitch: f64, yaw: f64) -> PoseEstimate {
        PoseEstimate::Solved(HeadPose { pitch, yaw })
    }

    fn classifier() -> DistractionClassifier {
        DistractionClassifier::new(PoseThresholds::default())
    }

    #[test]
    fn test_direction_precedence() {
        let c = classifier();
        assert_eq!(c.classify(solved(-11.0, 30.0)).looking_direction, LookDirection::Down);
        assert_eq!(c.classify(solved(11.0, -30.0)).looking_direction, LookDirection::Up);
        assert_eq!(c.classify(solved(5.0, -11.0)).looking_direction, LookDirection::Left);
        assert_eq!(c.classify(solved(5.0, 11.0)).looking_direction, LookDirection::Right);
        assert_eq!(c.classify(solved(10.0, -10.0)).looking_direction, LookDirection::Center);
    }

    #[test]
    fn test_distraction_thresholds() {
        let c = classifier();
        assert!(!c.classify(solved(15.0, 20.0)).distracted);
        assert!(c.classify(solved(-15.5, 0.0)).distracted);
        assert!(c.classify(solved(0.0, 20.5)).distracted);
    }

    #[test]
    fn test_thresholds_are_independent() {
        let thresholds = PoseThresholds {
            direction: 30.0,
            ..Default::default()
        };
        let reading = DistractionClassifier::new(thresholds).classify(solved(0.0, 25.0));
        assert_eq!(reading.looking_direction, LookDirection::Center);
        assert!(reading.distracted);
    }

    #[test]
    fn test_unavailable_fails_open() {
        let reading = classifier().classify(PoseEstimate::Unavailable);
        assert!(!reading.distracted);
        assert_eq!(reading.looking_direction, LookDirection::Center);
    }

    #[test]
    fn test_problem_uses_frame_geometry() {
        let problem = PnpProblem::for_face(&fixtures::open_eyed_face());
        assert_eq!(problem.camera.focal_length, 640.0);
        assert_eq!(problem.camera.center_x, 320.0);
        assert_eq!(problem.camera.center_y, 240.0);
        assert_eq!(problem.image_points[0], Point2::new(320.4, 250.9));
        assert_eq!(problem.model_points[1].y, -330.0);
    }

    #[test]
    fn test_closure_solver() {
        let solver = |problem: &PnpProblem| {
            if problem.camera.focal_length > 0.0 {
                solved(-12.0, 3.0)
            } else {
                PoseEstimate::Unavailable
            }
        };
        let problem = PnpProblem::for_face(&fixtures::open_eyed_face());
        assert_eq!(solver.solve(&problem), solved(-12.0, 3.0));
        assert_eq!(UnavailablePoseSolver.solve(&problem), PoseEstimate::Unavailable);
    }
}
