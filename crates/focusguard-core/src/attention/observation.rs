//! Face observations and the per-frame attention classifier.
//!
//! Detector backends disagree on keypoint layout. Named landmarks are preferred;
//! anonymous meshes fall back to fixed positions in the keypoint list.

use serde::{Deserialize, Serialize};

use super::state::RawAttention;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    LeftEye,
    RightEye,
    LeftPupil,
    RightPupil,
    Nose,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A keypoint in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Landmark>,
}

impl Keypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, name: None }
    }

    pub fn named(x: f64, y: f64, name: Landmark) -> Self {
        Self {
            x,
            y,
            name: Some(name),
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Coarse gaze confidences in `0.0..=1.0`, already maxed over both eyes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GazeSignals {
    #[serde(default)]
    pub look_out: f64,
    #[serde(default)]
    pub look_up: f64,
    #[serde(default)]
    pub look_down: f64,
}

impl GazeSignals {
    /// Build from blendshape categories such as `eyeLookOutLeft`.
    pub fn from_categories<'a, I>(categories: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut gaze = GazeSignals::default();
        for (name, score) in categories {
            let slot = match name {
                "eyeLookOutLeft" | "eyeLookOutRight" => &mut gaze.look_out,
                "eyeLookUpLeft" | "eyeLookUpRight" => &mut gaze.look_up,
                "eyeLookDownLeft" | "eyeLookDownRight" => &mut gaze.look_down,
                _ => continue,
            };
            *slot = slot.max(score);
        }
        gaze
    }

    pub fn max_confidence(&self) -> f64 {
        self.look_out.max(self.look_up).max(self.look_down)
    }
}

/// Axis-aligned face bounds in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One detected face for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceObservation {
    pub keypoints: Vec<Keypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaze: Option<GazeSignals>,
}

impl FaceObservation {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            gaze: None,
        }
    }

    pub fn with_gaze(mut self, gaze: GazeSignals) -> Self {
        self.gaze = Some(gaze);
        self
    }

    pub fn landmark(&self, landmark: Landmark) -> Option<Point> {
        self.keypoints
            .iter()
            .find(|k| k.name == Some(landmark))
            .map(Keypoint::point)
    }

    pub fn left_eye(&self) -> Option<Point> {
        self.landmark(Landmark::LeftEye)
            .or_else(|| self.keypoints.first().map(Keypoint::point))
    }

    pub fn right_eye(&self) -> Option<Point> {
        if let Some(p) = self.landmark(Landmark::RightEye) {
            return Some(p);
        }
        // Anonymous meshes: an eighth of the way into the list, else the second point.
        let idx = self.keypoints.len() / 8;
        let idx = if idx == 0 { 1 } else { idx };
        self.keypoints.get(idx).map(Keypoint::point)
    }

    pub fn nose(&self) -> Option<Point> {
        self.landmark(Landmark::Nose).or_else(|| {
            self.keypoints
                .get(self.keypoints.len() / 2)
                .map(Keypoint::point)
        })
    }

    /// Mean of the eyes and nose, whichever are present.
    pub fn centroid(&self) -> Option<Point> {
        let points: Vec<Point> = [self.left_eye(), self.right_eye(), self.nose()]
            .into_iter()
            .flatten()
            .collect();
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        Some(Point::new(
            points.iter().map(|p| p.x).sum::<f64>() / n,
            points.iter().map(|p| p.y).sum::<f64>() / n,
        ))
    }

    /// Bounds of all keypoints clamped to the frame.
    pub fn bounding_box(&self, frame_width: f64, frame_height: f64) -> Option<BoundingBox> {
        if self.keypoints.is_empty() {
            return None;
        }
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for k in &self.keypoints {
            min_x = min_x.min(k.x);
            min_y = min_y.min(k.y);
            max_x = max_x.max(k.x);
            max_y = max_y.max(k.y);
        }
        Some(BoundingBox {
            min_x: min_x.max(0.0),
            min_y: min_y.max(0.0),
            max_x: max_x.min(frame_width),
            max_y: max_y.min(frame_height),
        })
    }
}

/// Classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeThresholds {
    /// Normalized pupil-to-eye-center offset above which gaze counts as averted.
    pub pupil_offset: f64,
    /// Coarse look-away confidence above which gaze counts as averted.
    pub gaze_confidence: f64,
}

impl Default for GazeThresholds {
    fn default() -> Self {
        Self {
            pupil_offset: 0.4,
            gaze_confidence: 0.6,
        }
    }
}

/// Classify one frame. Only the first face is considered.
///
/// A located face without usable geometry classifies as focused.
pub fn classify(faces: &[FaceObservation], thresholds: &GazeThresholds) -> RawAttention {
    let Some(face) = faces.first() else {
        return RawAttention::Away;
    };

    if let (Some(left_eye), Some(right_eye)) = (face.left_eye(), face.right_eye()) {
        let eye_width = left_eye.distance(&right_eye);
        let pupils = (
            face.landmark(Landmark::LeftPupil),
            face.landmark(Landmark::RightPupil),
        );
        if let (Some(left_pupil), Some(right_pupil)) = pupils {
            if eye_width <= f64::EPSILON {
                return RawAttention::Focused;
            }
            let left = left_pupil.distance(&left_eye) / eye_width;
            let right = right_pupil.distance(&right_eye) / eye_width;
            return if left > thresholds.pupil_offset || right > thresholds.pupil_offset {
                RawAttention::Distracted
            } else {
                RawAttention::Focused
            };
        }
    }

    match face.gaze {
        Some(gaze) if gaze.max_confidence() > thresholds.gaze_confidence => {
            RawAttention::Distracted
        }
        _ => RawAttention::Focused,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_with_pupils(left_offset: f64, right_offset: f64) -> FaceObservation {
        FaceObservation::new(vec![
            Keypoint::named(100.0, 100.0, Landmark::LeftEye),
            Keypoint::named(200.0, 100.0, Landmark::RightEye),
            Keypoint::named(100.0 + left_offset, 100.0, Landmark::LeftPupil),
            Keypoint::named(200.0 + right_offset, 100.0, Landmark::RightPupil),
            Keypoint::named(150.0, 150.0, Landmark::Nose),
        ])
    }

    #[test]
    fn no_face_is_away() {
        assert_eq!(classify(&[], &GazeThresholds::default()), RawAttention::Away);
    }

    #[test]
    fn centered_pupils_are_focused() {
        let face = face_with_pupils(5.0, -5.0);
        assert_eq!(
            classify(&[face], &GazeThresholds::default()),
            RawAttention::Focused
        );
    }

    #[test]
    fn one_averted_pupil_is_distracted() {
        // 41px over a 100px eye distance exceeds 0.4.
        let face = face_with_pupils(0.0, 41.0);
        assert_eq!(
            classify(&[face], &GazeThresholds::default()),
            RawAttention::Distracted
        );
    }

    #[test]
    fn gaze_signals_used_without_pupils() {
        let thresholds = GazeThresholds::default();
        let base = FaceObservation::new(vec![Keypoint::new(10.0, 10.0), Keypoint::new(50.0, 10.0)]);

        let looking_up = base.clone().with_gaze(GazeSignals {
            look_up: 0.7,
            ..Default::default()
        });
        assert_eq!(classify(&[looking_up], &thresholds), RawAttention::Distracted);

        let centered = base.with_gaze(GazeSignals {
            look_out: 0.6,
            ..Default::default()
        });
        assert_eq!(classify(&[centered], &thresholds), RawAttention::Focused);
    }

    #[test]
    fn face_without_geometry_fails_open() {
        let face = FaceObservation::new(vec![Keypoint::new(10.0, 10.0)]);
        assert_eq!(
            classify(&[face], &GazeThresholds::default()),
            RawAttention::Focused
        );
    }

    #[test]
    fn gaze_from_categories_takes_max_per_direction() {
        let gaze = GazeSignals::from_categories([
            ("eyeLookOutLeft", 0.2),
            ("eyeLookOutRight", 0.65),
            ("eyeLookDownLeft", 0.1),
            ("browInnerUp", 0.9),
        ]);
        assert_eq!(gaze.look_out, 0.65);
        assert_eq!(gaze.look_down, 0.1);
        assert_eq!(gaze.look_up, 0.0);
    }

    #[test]
    fn centroid_averages_eyes_and_nose() {
        let face = face_with_pupils(0.0, 0.0);
        let c = face.centroid().unwrap();
        assert!((c.x - 150.0).abs() < 1e-9);
        assert!((c.y - 350.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_clamps_to_frame() {
        let face = FaceObservation::new(vec![Keypoint::new(-10.0, 5.0), Keypoint::new(700.0, 50.0)]);
        let bbox = face.bounding_box(640.0, 480.0).unwrap();
        assert_eq!(bbox.min_x, 0.0);
        assert_eq!(bbox.max_x, 640.0);
        assert_eq!(bbox.width(), 640.0);
    }
}
