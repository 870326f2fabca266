//! Facial landmark sets and the semantic points the classifiers read

use serde::{Deserialize, Serialize};

use crate::BehaviorError;

/// 2D point in pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Semantic landmarks used by the head-pose classifier, as face-mesh indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    NoseTip,
    Chin,
    LeftEyeOuter,
    RightEyeOuter,
    LeftMouth,
    RightMouth,
}

impl Landmark {
    /// Pose points in the order the generic 3D face model lists them
    pub const POSE_POINTS: [Landmark; 6] = [
        Landmark::NoseTip,
        Landmark::Chin,
        Landmark::LeftEyeOuter,
        Landmark::RightEyeOuter,
        Landmark::LeftMouth,
        Landmark::RightMouth,
    ];

    /// Index in the face mesh
    pub const fn mesh_index(self) -> usize {
        match self {
            Landmark::NoseTip => 1,
            Landmark::Chin => 199,
            Landmark::LeftEyeOuter => 33,
            Landmark::RightEyeOuter => 263,
            Landmark::LeftMouth => 61,
            Landmark::RightMouth => 291,
        }
    }
}

/// Six mesh indices outlining one eye: corner, top, top, corner, bottom, bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeContour(pub [usize; 6]);

impl EyeContour {
    pub const FIRST: EyeContour = EyeContour([362, 385, 387, 263, 373, 380]);
    pub const SECOND: EyeContour = EyeContour([33, 160, 158, 133, 153, 144]);
}

/// Minimum number of mesh points a face must carry.
///
/// Highest index read by any classifier is 387 (eye contour).
pub const REQUIRED_POINTS: usize = 388;

/// One detected face in one frame, in pixel coordinates.
///
/// Only constructible through validating constructors, so every semantic
/// lookup afterwards is infallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLandmarkSet", into = "RawLandmarkSet")]
pub struct LandmarkSet {
    points: Vec<Point2>,
    width: u32,
    height: u32,
}

/// Unvalidated wire shape of a landmark set
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLandmarkSet {
    points: Vec<Point2>,
    width: u32,
    height: u32,
}

impl TryFrom<RawLandmarkSet> for LandmarkSet {
    type Error = BehaviorError;

    fn try_from(raw: RawLandmarkSet) -> Result<Self, Self::Error> {
        LandmarkSet::from_pixels(raw.points, raw.width, raw.height)
    }
}

impl From<LandmarkSet> for RawLandmarkSet {
    fn from(set: LandmarkSet) -> Self {
        Self {
            points: set.points,
            width: set.width,
            height: set.height,
        }
    }
}

impl LandmarkSet {
    /// Build from pixel coordinates
    pub fn from_pixels(points: Vec<Point2>, width: u32, height: u32) -> Result<Self, BehaviorError> {
        if width == 0 || height == 0 {
            return Err(BehaviorError::InvalidFrame { width, height });
        }
        if points.len() < REQUIRED_POINTS {
            return Err(BehaviorError::MissingLandmarks {
                required: REQUIRED_POINTS,
                found: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(BehaviorError::NonFiniteCoordinate(index));
        }

        Ok(Self { points, width, height })
    }

    /// Build from detector output normalized to [0, 1]
    pub fn from_normalized(points: &[(f64, f64)], width: u32, height: u32) -> Result<Self, BehaviorError> {
        let w = width as f64;
        let h = height as f64;
        let pixels = points
            .iter()
            .map(|&(x, y)| Point2::new(x * w, y * h))
            .collect();
        Self::from_pixels(pixels, width, height)
    }

    /// Pixel position of a semantic landmark
    pub fn point(&self, landmark: Landmark) -> Point2 {
        self.points[landmark.mesh_index()]
    }

    /// Pixel positions of an eye contour
    pub fn eye(&self, contour: EyeContour) -> [Point2; 6] {
        contour.0.map(|i| self.points[i])
    }

    /// The six pose points in model order
    pub fn pose_points(&self) -> [Point2; 6] {
        Landmark::POSE_POINTS.map(|l| self.point(l))
    }

    /// Nose tip rounded to whole pixels, used as the face's screen position
    pub fn screen_position(&self) -> ScreenPosition {
        let nose = self.point(Landmark::NoseTip);
        ScreenPosition {
            x: nose.x.trunc() as i32,
            y: nose.y.trunc() as i32,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Integer pixel position of a face in the frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPosition {
    pub x: i32,
    pub y: i32,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A frontal face with open eyes on a 640x480 frame
    pub fn open_eyed_face() -> LandmarkSet {
        face_with_eye_opening(12.0)
    }

    /// A face whose eye lids are `opening` pixels apart (eye width is 30 px)
    pub fn face_with_eye_opening(opening: f64) -> LandmarkSet {
        let mut points = vec![Point2::new(320.0, 240.0); REQUIRED_POINTS];
        for (contour, cx) in [(EyeContour::FIRST, 360.0), (EyeContour::SECOND, 280.0)] {
            let [c0, t1, t2, c3, b4, b5] = contour.0;
            points[c0] = Point2::new(cx - 15.0, 200.0);
            points[c3] = Point2::new(cx + 15.0, 200.0);
            points[t1] = Point2::new(cx - 5.0, 200.0 - opening / 2.0);
            points[b5] = Point2::new(cx - 5.0, 200.0 + opening / 2.0);
            points[t2] = Point2::new(cx + 5.0, 200.0 - opening / 2.0);
            points[b4] = Point2::new(cx + 5.0, 200.0 + opening / 2.0);
        }
        points[Landmark::NoseTip.mesh_index()] = Point2::new(320.4, 250.9);
        LandmarkSet::from_pixels(points, 640, 480).unwrap()
    }
}
