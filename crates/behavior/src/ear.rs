//! Eye-aspect-ratio drowsiness classifier

use crate::landmarks::{EyeContour, LandmarkSet, Point2};

/// Eye aspect ratio of one eye contour.
///
/// Zero horizontal width yields 0.0 rather than a division fault.
pub fn eye_aspect_ratio(eye: &[Point2; 6]) -> f64 {
    let vertical_1 = eye[1].distance(&eye[5]);
    let vertical_2 = eye[2].distance(&eye[4]);
    let horizontal = eye[0].distance(&eye[3]);

    if horizontal == 0.0 {
        return 0.0;
    }
    (vertical_1 + vertical_2) / (2.0 * horizontal)
}

/// Drowsiness reading for one face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeReading {
    /// Mean EAR of both eyes
    pub ear: f64,
    pub drowsy: bool,
}

/// Stateless EAR classifier
#[derive(Debug, Clone, Copy)]
pub struct DrowsinessClassifier {
    ear_threshold: f64,
}

impl DrowsinessClassifier {
    pub fn new(ear_threshold: f64) -> Self {
        Self { ear_threshold }
    }

    pub fn classify(&self, face: &LandmarkSet) -> EyeReading {
        let first = eye_aspect_ratio(&face.eye(EyeContour::FIRST));
        let second = eye_aspect_ratio(&face.eye(EyeContour::SECOND));
        let ear = (first + second) / 2.0;

        EyeReading {
            ear,
            drowsy: ear < self.ear_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures;
    use proptest::prelude::*;

    #[test]
    fn test_open_eyes_not_drowsy() {
        let classifier = DrowsinessClassifier::new(0.25);
        let reading = classifier.classify(&fixtures::open_eyed_face());
        assert!((reading.ear - 0.4).abs() < 1e-9);
        assert!(!reading.drowsy);
    }

    #[test]
    fn test_narrow_eyes_drowsy() {
        let classifier = DrowsinessClassifier::new(0.25);
        let reading = classifier.classify(&fixtures::face_with_eye_opening(6.0));
        assert!((reading.ear - 0.2).abs() < 1e-9);
        assert!(reading.drowsy);
    }

    #[test]
    fn test_zero_width_eye() {
        let eye = [Point2::new(10.0, 10.0); 6];
        assert_eq!(eye_aspect_ratio(&eye), 0.0);
    }

    #[test]
    fn test_collapsed_eye_is_drowsy() {
        let classifier = DrowsinessClassifier::new(0.25);
        let reading = classifier.classify(&fixtures::face_with_eye_opening(0.0));
        assert_eq!(reading.ear, 0.0);
        assert!(reading.drowsy);
    }

    fn point() -> impl Strategy<Value = Point2> {
        (-2000.0..2000.0f64, -2000.0..2000.0f64).prop_map(|(x, y)| Point2::new(x, y))
    }

    proptest! {
        #[test]
        fn prop_ear_is_non_negative(eye in prop::array::uniform6(point())) {
            let ear = eye_aspect_ratio(&eye);
            prop_assert!(ear >= 0.0);
            prop_assert!(ear.is_finite());
        }

        #[test]
        fn prop_zero_width_gives_zero(corner in point(), others in prop::array::uniform4(point())) {
            let eye = [corner, others[0], others[1], corner, others[2], others[3]];
            prop_assert_eq!(eye_aspect_ratio(&eye), 0.0);
        }
    }
}
