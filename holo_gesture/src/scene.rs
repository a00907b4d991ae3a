//! Pure per-frame reducer: detector output in, next scene state out.
//!
//! Scheduling frames is somebody else's job. [`SceneState::apply`] only
//! computes what the next frame should show, so it can be driven from a
//! render loop, a test, or a replayed landmark log alike.

use crate::classify::{Gesture, HandSignal};
use crate::landmark::HandLandmarks;
use crate::transition::{ModeMachine, VisualMode};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneState {
    pub machine:       ModeMachine,
    /// Gesture shown in the status badge; `NONE` while no hand is visible.
    pub gesture:       Gesture,
    pub hand_detected: bool,
    /// Last known mirrored wrist x. Held while the hand is out of view.
    pub hand_x:        f32,
    pub signal:        HandSignal,
}

impl Default for SceneState {
    fn default() -> Self {
        SceneState {
            machine:       ModeMachine::new(),
            gesture:       Gesture::None,
            hand_detected: false,
            hand_x:        0.5,
            signal:        HandSignal::default(),
        }
    }
}

impl SceneState {
    pub fn mode(&self) -> VisualMode { self.machine.mode() }

    /// Fold one detector result into the state. Only the first hand counts.
    pub fn apply(&self, hands: &[HandLandmarks]) -> SceneState {
        let mut next = *self;

        match hands.first() {
            Some(hand) => {
                let signal = hand.classify();
                next.hand_detected = true;
                next.signal        = signal;
                next.hand_x        = signal.x;
                next.gesture       = signal.gesture;
                next.machine.observe(signal.gesture);
            }
            None => {
                next.hand_detected = false;
                next.gesture       = Gesture::None;
            }
        }

        next
    }

    pub fn status_label(&self) -> String {
        if self.hand_detected {
            format!("Gesture: {}", self.gesture)
        } else {
            "No Hand Detected".to_string()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose;

    #[test]
    fn initial_state() {
        let s = SceneState::default();
        assert_eq!(s.mode(), VisualMode::Tree);
        assert!(!s.hand_detected);
        assert_eq!(s.hand_x, 0.5);
        assert_eq!(s.status_label(), "No Hand Detected");
    }

    #[test]
    fn open_hand_moves_to_cloud() {
        let s = SceneState::default().apply(&[pose::open_hand(0.3, 0.5)]);
        assert_eq!(s.mode(), VisualMode::Cloud);
        assert!(s.hand_detected);
        assert!((s.hand_x - 0.7).abs() < 1e-6);
        assert_eq!(s.status_label(), "Gesture: OPEN");
    }

    #[test]
    fn apply_does_not_mutate_input_state() {
        let s0 = SceneState::default();
        let _ = s0.apply(&[pose::pinch(0.5, 0.5)]);
        assert_eq!(s0, SceneState::default());
    }

    #[test]
    fn lost_hand_keeps_position_mode_and_memory() {
        let s = SceneState::default()
            .apply(&[pose::fist(0.2, 0.5)])
            .apply(&[pose::open_hand(0.2, 0.5)])
            .apply(&[]);
        assert!(!s.hand_detected);
        assert_eq!(s.gesture, Gesture::None);
        assert_eq!(s.mode(), VisualMode::Cloud);
        assert!((s.hand_x - 0.8).abs() < 1e-6);
        // The machine still remembers OPEN, so reappearing open is a no-op.
        assert_eq!(s.machine.last_gesture(), Gesture::Open);
        let s = s.apply(&[pose::open_hand(0.6, 0.5)]);
        assert_eq!(s.mode(), VisualMode::Cloud);
    }

    #[test]
    fn hand_lost_between_identical_gestures_does_not_refire() {
        let s = SceneState::default()
            .apply(&[pose::pinch(0.5, 0.5)])
            .apply(&[])
            .apply(&[pose::pinch(0.5, 0.5)]);
        assert_eq!(s.mode(), VisualMode::Zoom);
        assert_eq!(s.machine.last_gesture(), Gesture::Pinch);
    }

    #[test]
    fn only_first_hand_counts() {
        let s = SceneState::default()
            .apply(&[pose::pinch(0.5, 0.5), pose::open_hand(0.5, 0.5)]);
        assert_eq!(s.gesture, Gesture::Pinch);
        assert_eq!(s.mode(), VisualMode::Zoom);
    }

    #[test]
    fn ambiguous_hand_is_detected_with_none() {
        let s = SceneState::default()
            .apply(&[pose::open_hand(0.5, 0.5)])
            .apply(&[pose::partial(0.5, 0.5)]);
        assert!(s.hand_detected);
        assert_eq!(s.status_label(), "Gesture: NONE");
        assert_eq!(s.mode(), VisualMode::Cloud);
    }
}
