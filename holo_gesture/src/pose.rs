//! Synthetic hand poses.
//!
//! Each pose is an upright right hand (fingers pointing toward the top of
//! the image) anchored at the given wrist position. They feed the keyboard
//! simulator and serve as test fixtures.

use crate::landmark::{HandLandmarks, Landmark, LANDMARK_COUNT};

/// Knuckle offsets from the wrist, index → pinky.
const BASES:        [(f32, f32); 4] = [(-0.045, -0.15), (0.0, -0.16), (0.04, -0.15), (0.075, -0.13)];
/// Extended fingertip offsets.
const TIPS:         [(f32, f32); 4] = [(-0.045, -0.30), (0.0, -0.32), (0.04, -0.30), (0.075, -0.24)];
/// Folded fingertip offsets: tucked back toward the palm.
const TUCKED:       [(f32, f32); 4] = [(-0.045, -0.08), (0.0, -0.08), (0.04, -0.08), (0.075, -0.07)];

const THUMB_CMC:    (f32, f32) = (-0.04, -0.03);
const THUMB_MCP:    (f32, f32) = (-0.08, -0.07);
const THUMB_IP:     (f32, f32) = (-0.11, -0.10);
const THUMB_OUT:    (f32, f32) = (-0.14, -0.13);
const THUMB_ACROSS: (f32, f32) = (0.01, -0.12);

/// All four fingers extended, thumb out.
pub fn open_hand(wrist_x: f32, wrist_y: f32) -> HandLandmarks {
    build(wrist_x, wrist_y, [true; 4], None)
}

/// All four fingers folded, thumb across the palm.
pub fn fist(wrist_x: f32, wrist_y: f32) -> HandLandmarks {
    build(wrist_x, wrist_y, [false; 4], Some(THUMB_ACROSS))
}

/// Fingers extended with the thumb tip touching the index tip.
pub fn pinch(wrist_x: f32, wrist_y: f32) -> HandLandmarks {
    let (ix, iy) = TIPS[0];
    build(wrist_x, wrist_y, [true; 4], Some((ix - 0.01, iy + 0.01)))
}

/// Index and middle extended, ring and pinky folded: ambiguous.
pub fn partial(wrist_x: f32, wrist_y: f32) -> HandLandmarks {
    build(wrist_x, wrist_y, [true, true, false, false], None)
}

fn build(
    wx:        f32,
    wy:        f32,
    extended:  [bool; 4],
    thumb_tip: Option<(f32, f32)>,
) -> HandLandmarks {
    let at = |(dx, dy): (f32, f32)| Landmark::new(wx + dx, wy + dy, 0.0);
    let mut pts = Vec::with_capacity(LANDMARK_COUNT);

    pts.push(at((0.0, 0.0)));
    pts.push(at(THUMB_CMC));
    pts.push(at(THUMB_MCP));
    pts.push(at(THUMB_IP));
    pts.push(at(thumb_tip.unwrap_or(THUMB_OUT)));

    for finger in 0..4 {
        let base = BASES[finger];
        let tip  = if extended[finger] { TIPS[finger] } else { TUCKED[finger] };
        pts.push(at(base));
        // PIP and DIP joints sit between base and tip.
        for t in [1.0 / 3.0, 2.0 / 3.0] {
            pts.push(at((base.0 + (tip.0 - base.0) * t, base.1 + (tip.1 - base.1) * t)));
        }
        pts.push(at(tip));
    }

    HandLandmarks::from_points(pts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Gesture;

    #[test]
    fn poses_follow_the_wrist() {
        let a = open_hand(0.2, 0.5);
        let b = open_hand(0.7, 0.5);
        assert!((b.wrist().x - a.wrist().x - 0.5).abs() < 1e-6);
        assert_eq!(a.classify().gesture, b.classify().gesture);
    }

    #[test]
    fn every_pose_classifies_as_named() {
        for (wx, wy) in [(0.2, 0.4), (0.5, 0.6), (0.8, 0.8)] {
            assert_eq!(open_hand(wx, wy).classify().gesture, Gesture::Open);
            assert_eq!(fist(wx, wy).classify().gesture,      Gesture::Fist);
            assert_eq!(pinch(wx, wy).classify().gesture,     Gesture::Pinch);
            assert_eq!(partial(wx, wy).classify().gesture,   Gesture::None);
        }
    }
}
