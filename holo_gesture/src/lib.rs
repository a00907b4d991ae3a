//! # holo_gesture
//!
//! Turns a 21-point hand landmark set into a discrete gesture plus a few
//! continuous control signals, and drives the visual mode of the particle
//! scene from gesture *changes*.
//!
//! ## Gesture → Mode mapping
//!
//! | Gesture | Detected when | Mode |
//! |---|---|---|
//! | `PINCH` | thumb tip within 0.05 of index tip (wins over everything) | `ZOOM` |
//! | `FIST`  | 3 or 4 non-thumb fingers folded | `TREE` |
//! | `OPEN`  | no non-thumb finger folded | `CLOUD` |
//! | `NONE`  | 1–2 fingers folded, or no usable hand | unchanged |
//!
//! Transitions are edge-triggered: holding a gesture fires it once.
//!
//! ## Quick start
//!
//! ```rust
//! use holo_gesture::{pose, Gesture, SceneState, VisualMode};
//!
//! let scene = SceneState::default()
//!     .apply(&[pose::open_hand(0.3, 0.6)]);
//!
//! assert_eq!(scene.gesture, Gesture::Open);
//! assert_eq!(scene.mode(), VisualMode::Cloud);
//! assert!((scene.hand_x - 0.7).abs() < 1e-6);
//! ```

pub mod landmark;
pub mod classify;
pub mod transition;
pub mod scene;
pub mod pose;

pub use landmark::{HandLandmarks, Landmark, LandmarkError, LANDMARK_COUNT};
pub use classify::{classify, finger_folds, FingerFolds, Gesture, HandSignal, PINCH_THRESHOLD};
pub use transition::{ModeMachine, VisualMode};
pub use scene::SceneState;
