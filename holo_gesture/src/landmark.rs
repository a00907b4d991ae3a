//! Hand landmarks in the 21-point hand model.
//!
//! Coordinates are normalised to the camera image: `x` runs 0 (left) → 1
//! (right), `y` runs 0 (top) → 1 (bottom), `z` is depth relative to the wrist.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices.
pub mod index {
    pub const WRIST:             usize = 0;
    pub const THUMB_CMC:         usize = 1;
    pub const THUMB_MCP:         usize = 2;
    pub const THUMB_IP:          usize = 3;
    pub const THUMB_TIP:         usize = 4;
    pub const INDEX_FINGER_MCP:  usize = 5;
    pub const INDEX_FINGER_PIP:  usize = 6;
    pub const INDEX_FINGER_DIP:  usize = 7;
    pub const INDEX_FINGER_TIP:  usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP:   usize = 13;
    pub const RING_FINGER_PIP:   usize = 14;
    pub const RING_FINGER_DIP:   usize = 15;
    pub const RING_FINGER_TIP:   usize = 16;
    pub const PINKY_MCP:         usize = 17;
    pub const PINKY_PIP:         usize = 18;
    pub const PINKY_DIP:         usize = 19;
    pub const PINKY_TIP:         usize = 20;
}

/// Bone connections used to draw the hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("invalid landmark json: {0}")]
    Json(#[from] serde_json::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single tracked point on the hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Distance in the image plane; depth is ignored.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// Exactly [`LANDMARK_COUNT`] points for one detected hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandLandmarks {
    points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Landmark>) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                got:      points.len(),
            });
        }
        Ok(HandLandmarks { points })
    }

    /// Caller guarantees `points.len() == LANDMARK_COUNT`.
    pub(crate) fn from_points(points: Vec<Landmark>) -> Self {
        debug_assert_eq!(points.len(), LANDMARK_COUNT);
        HandLandmarks { points }
    }

    /// Parse a JSON array of `{x, y, z}` objects.
    pub fn from_json(text: &str) -> Result<Self, LandmarkError> {
        let points: Vec<Landmark> = serde_json::from_str(text)?;
        Self::new(points)
    }

    pub fn points(&self) -> &[Landmark] { &self.points }

    pub fn get(&self, idx: usize) -> Landmark { self.points[idx] }

    pub fn wrist(&self) -> Landmark { self.points[index::WRIST] }

    pub fn classify(&self) -> crate::HandSignal {
        crate::classify(Some(self.points.as_slice()))
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<HandLandmarks> for Vec<Landmark> {
    fn from(hand: HandLandmarks) -> Self { hand.points }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 5.0);
        let b = Landmark::new(0.3, 0.4, -5.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rejects_wrong_count() {
        let err = HandLandmarks::new(vec![Landmark::default(); 20]).unwrap_err();
        assert!(matches!(err, LandmarkError::WrongCount { expected: 21, got: 20 }));
    }

    #[test]
    fn parses_json_array() {
        let pts: Vec<String> = (0..21)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, i as f32 / 100.0))
            .collect();
        let hand = HandLandmarks::from_json(&format!("[{}]", pts.join(","))).unwrap();
        assert_eq!(hand.points().len(), 21);
        assert!((hand.get(index::PINKY_TIP).x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn depth_is_optional_in_json() {
        let pts = vec![r#"{"x":0.1,"y":0.2}"#; 21].join(",");
        let hand = HandLandmarks::from_json(&format!("[{}]", pts)).unwrap();
        assert_eq!(hand.wrist().z, 0.0);
    }

    #[test]
    fn json_with_too_few_points_is_an_error() {
        let pts = vec![r#"{"x":0.1,"y":0.2}"#; 3].join(",");
        assert!(HandLandmarks::from_json(&format!("[{}]", pts)).is_err());
    }

    #[test]
    fn connections_reference_valid_indices() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }
}
