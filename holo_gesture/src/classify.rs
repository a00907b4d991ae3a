//! The gesture heuristic.
//!
//! [`classify`] is a pure function of one landmark set: no history, no
//! smoothing, no hidden state. Every frame stands alone, so the label can
//! flicker between `NONE` and a real gesture when the folded-finger count
//! sits on the 2/3 boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::landmark::{index::*, Landmark, LANDMARK_COUNT};

/// Thumb-tip to index-tip distance (normalised units) below which the hand
/// is pinching.
pub const PINCH_THRESHOLD: f32 = 0.05;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gesture {
    #[default]
    None,
    Open,
    Fist,
    Pinch,
    /// Reserved; the classifier never produces it.
    Rotate,
}

impl Gesture {
    pub fn label(self) -> &'static str {
        match self {
            Gesture::None   => "NONE",
            Gesture::Open   => "OPEN",
            Gesture::Fist   => "FIST",
            Gesture::Pinch  => "PINCH",
            Gesture::Rotate => "ROTATE",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSignal
// ════════════════════════════════════════════════════════════════════════════

/// Everything derived from one frame's landmarks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandSignal {
    pub gesture:        Gesture,
    /// Mirrored wrist x: moving the physical hand right increases it.
    pub x:              f32,
    pub y:              f32,
    /// Wrist → middle-knuckle angle in radians, a proxy for wrist tilt.
    pub rotation:       f32,
    pub pinch_distance: f32,
}

impl Default for HandSignal {
    fn default() -> Self {
        HandSignal {
            gesture:        Gesture::None,
            x:              0.5,
            y:              0.5,
            rotation:       0.0,
            pinch_distance: 0.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Finger folds
// ════════════════════════════════════════════════════════════════════════════

/// Per-finger fold state. A finger is folded when its tip is closer to the
/// wrist than its base knuckle is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerFolds {
    /// Unreliable with this heuristic, so [`FingerFolds::counted`] skips it.
    pub thumb:  bool,
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

impl FingerFolds {
    /// Folded non-thumb fingers.
    pub fn counted(&self) -> usize {
        [self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&f| f)
            .count()
    }
}

/// Fold state for all five fingers, or `None` if `points` holds fewer
/// than 21 landmarks.
pub fn finger_folds(points: &[Landmark]) -> Option<FingerFolds> {
    if points.len() < LANDMARK_COUNT {
        return None;
    }
    let wrist = points[WRIST];
    let folded = |tip: usize, base: usize| {
        wrist.planar_distance(&points[tip]) < wrist.planar_distance(&points[base])
    };

    Some(FingerFolds {
        thumb:  folded(THUMB_TIP,         THUMB_MCP),
        index:  folded(INDEX_FINGER_TIP,  INDEX_FINGER_MCP),
        middle: folded(MIDDLE_FINGER_TIP, MIDDLE_FINGER_MCP),
        ring:   folded(RING_FINGER_TIP,   RING_FINGER_MCP),
        pinky:  folded(PINKY_TIP,         PINKY_MCP),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Classify one hand.
///
/// Absent or short (< 21 points) input yields [`HandSignal::default`], as
/// does a non-finite `x` or `y` anywhere among the first 21 points. Points
/// beyond the 21st are ignored.
pub fn classify(landmarks: Option<&[Landmark]>) -> HandSignal {
    let points = match landmarks {
        Some(p) if p.len() >= LANDMARK_COUNT => &p[..LANDMARK_COUNT],
        _ => return HandSignal::default(),
    };
    if !points.iter().all(Landmark::is_finite) {
        return HandSignal::default();
    }

    let wrist       = points[WRIST];
    let middle_base = points[MIDDLE_FINGER_MCP];

    let pinch_distance = points[THUMB_TIP].planar_distance(&points[INDEX_FINGER_TIP]);

    // Pinch short-circuits the fold count.
    let gesture = if pinch_distance < PINCH_THRESHOLD {
        Gesture::Pinch
    } else {
        match finger_folds(points).map(|f| f.counted()) {
            Some(0)              => Gesture::Open,
            Some(n) if n >= 3    => Gesture::Fist,
            _                    => Gesture::None,
        }
    };

    HandSignal {
        gesture,
        x:        1.0 - wrist.x,
        y:        wrist.y,
        rotation: (middle_base.y - wrist.y).atan2(middle_base.x - wrist.x),
        pinch_distance,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose;

    fn approx(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

    #[test]
    fn absent_input_is_exact_default() {
        let expected = HandSignal {
            gesture: Gesture::None, x: 0.5, y: 0.5, rotation: 0.0, pinch_distance: 0.0,
        };
        assert_eq!(classify(None), expected);
        assert_eq!(classify(Some(&[][..])), expected);
    }

    #[test]
    fn short_input_degrades_to_default() {
        let hand = pose::open_hand(0.4, 0.6);
        assert_eq!(classify(Some(&hand.points()[..20])), HandSignal::default());
    }

    #[test]
    fn non_finite_input_degrades_to_default() {
        let mut pts = pose::fist(0.4, 0.6).points().to_vec();
        pts[MIDDLE_FINGER_TIP].x = f32::NAN;
        assert_eq!(classify(Some(pts.as_slice())), HandSignal::default());
    }

    #[test]
    fn non_finite_unread_joint_still_degrades() {
        // PIP joints play no part in the heuristic but are still checked.
        let mut pts = pose::open_hand(0.4, 0.6).points().to_vec();
        pts[RING_FINGER_PIP].y = f32::INFINITY;
        assert_eq!(classify(Some(pts.as_slice())), HandSignal::default());
    }

    #[test]
    fn finger_folds_rejects_short_input() {
        assert_eq!(finger_folds(&[Landmark::default(); 5]), None);
        assert_eq!(finger_folds(&[]), None);
        let hand = pose::fist(0.5, 0.6);
        assert_eq!(finger_folds(hand.points()).map(|f| f.counted()), Some(4));
    }

    #[test]
    fn extra_points_are_ignored() {
        let hand = pose::fist(0.4, 0.6);
        let mut pts = hand.points().to_vec();
        pts.push(Landmark::new(f32::NAN, f32::NAN, 0.0));
        assert_eq!(classify(Some(pts.as_slice())), hand.classify());
    }

    #[test]
    fn open_hand_is_open() {
        let s = pose::open_hand(0.5, 0.6).classify();
        assert_eq!(s.gesture, Gesture::Open);
        assert!(s.pinch_distance >= PINCH_THRESHOLD);
    }

    #[test]
    fn fist_is_fist() {
        let s = pose::fist(0.5, 0.6).classify();
        assert_eq!(s.gesture, Gesture::Fist);
        assert!(s.pinch_distance >= PINCH_THRESHOLD);
    }

    #[test]
    fn three_folded_fingers_is_fist() {
        // Fist with the index finger straightened again.
        let open = pose::open_hand(0.5, 0.6);
        let mut pts = pose::fist(0.5, 0.6).points().to_vec();
        for i in INDEX_FINGER_MCP..=INDEX_FINGER_TIP {
            pts[i] = open.get(i);
        }
        assert_eq!(finger_folds(&pts).unwrap().counted(), 3);
        assert_eq!(classify(Some(pts.as_slice())).gesture, Gesture::Fist);
    }

    #[test]
    fn two_folded_fingers_is_none() {
        let s = pose::partial(0.5, 0.6).classify();
        assert_eq!(s.gesture, Gesture::None);
        assert_eq!(finger_folds(pose::partial(0.5, 0.6).points()).unwrap().counted(), 2);
    }

    #[test]
    fn one_folded_finger_is_none() {
        // Fist with index, middle and ring straightened; only the pinky stays down.
        let open = pose::open_hand(0.5, 0.6);
        let mut pts = pose::fist(0.5, 0.6).points().to_vec();
        for i in INDEX_FINGER_MCP..=RING_FINGER_TIP {
            pts[i] = open.get(i);
        }
        let folds = finger_folds(&pts).unwrap();
        assert!(folds.pinky);
        assert_eq!(folds.counted(), 1);
        assert_eq!(classify(Some(pts.as_slice())).gesture, Gesture::None);
    }

    #[test]
    fn pinch_wins_over_open() {
        let hand = pose::pinch(0.5, 0.6);
        assert_eq!(finger_folds(hand.points()).unwrap().counted(), 0);
        let s = hand.classify();
        assert_eq!(s.gesture, Gesture::Pinch);
        assert!(s.pinch_distance < PINCH_THRESHOLD);
    }

    #[test]
    fn pinch_wins_over_fist() {
        // Fist with the thumb tip pressed onto the folded index tip.
        let mut pts = pose::fist(0.5, 0.6).points().to_vec();
        let tip = pts[INDEX_FINGER_TIP];
        pts[THUMB_TIP] = Landmark::new(tip.x + 0.01, tip.y, 0.0);
        assert!(finger_folds(&pts).unwrap().counted() >= 3);
        assert_eq!(classify(Some(pts.as_slice())).gesture, Gesture::Pinch);
    }

    #[test]
    fn pinch_threshold_is_strict() {
        let mut pts = pose::open_hand(0.5, 0.6).points().to_vec();
        let tip = pts[INDEX_FINGER_TIP];
        pts[THUMB_TIP] = Landmark::new(tip.x + 0.06, tip.y, 0.0);
        assert_eq!(classify(Some(pts.as_slice())).gesture, Gesture::Open);
    }

    #[test]
    fn pinch_distance_equal_to_threshold_is_not_pinch() {
        // Same y and a zero x for the thumb, so the distance is exactly the constant.
        let mut pts = pose::open_hand(0.5, 0.6).points().to_vec();
        let y = pts[INDEX_FINGER_TIP].y;
        pts[INDEX_FINGER_TIP] = Landmark::new(PINCH_THRESHOLD, y, 0.0);
        pts[THUMB_TIP]        = Landmark::new(0.0, y, 0.0);
        let s = classify(Some(pts.as_slice()));
        assert_eq!(s.pinch_distance, PINCH_THRESHOLD);
        assert_ne!(s.gesture, Gesture::Pinch);
    }

    #[test]
    fn thumb_fold_is_not_counted() {
        let mut pts = pose::open_hand(0.5, 0.6).points().to_vec();
        // Tuck the thumb tip next to the wrist, well away from the index tip.
        let wrist = pts[WRIST];
        pts[THUMB_TIP] = Landmark::new(wrist.x - 0.01, wrist.y - 0.01, 0.0);
        let folds = finger_folds(&pts).unwrap();
        assert!(folds.thumb);
        assert_eq!(folds.counted(), 0);
        assert_eq!(classify(Some(pts.as_slice())).gesture, Gesture::Open);
    }

    #[test]
    fn x_signal_is_mirrored_wrist() {
        let s = pose::fist(0.3, 0.25).classify();
        assert!(approx(s.x, 0.7));
        assert!(approx(s.y, 0.25));
    }

    #[test]
    fn rotation_points_at_middle_knuckle() {
        // Upright hand: the middle knuckle is straight above the wrist.
        let s = pose::open_hand(0.5, 0.6).classify();
        assert!(approx(s.rotation, -std::f32::consts::FRAC_PI_2));

        let mut pts = pose::open_hand(0.5, 0.6).points().to_vec();
        pts[MIDDLE_FINGER_MCP] = Landmark::new(0.6, 0.6, 0.0);
        assert!(approx(classify(Some(pts.as_slice())).rotation, 0.0));
    }

    #[test]
    fn classification_is_pure() {
        let hand = pose::partial(0.42, 0.58);
        let first = hand.classify();
        for _ in 0..10 {
            // Interleave other inputs; nothing should leak between calls.
            let _ = pose::pinch(0.1, 0.1).classify();
            let _ = classify(None);
            assert_eq!(hand.classify(), first);
        }
    }

    #[test]
    fn labels_are_upper_case() {
        assert_eq!(Gesture::Pinch.to_string(), "PINCH");
        assert_eq!(Gesture::default(), Gesture::None);
    }

    #[test]
    fn signal_serializes_camel_case() {
        let json = serde_json::to_string(&HandSignal::default()).unwrap();
        assert!(json.contains("\"pinchDistance\":0.0"));
        assert!(json.contains("\"gesture\":\"NONE\""));
    }
}
