//! Edge-triggered visual-mode state machine.
//!
//! Only a *change* of gesture can move the mode. The machine remembers one
//! value, the last gesture it saw, and compares each new gesture against it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::Gesture;

// ════════════════════════════════════════════════════════════════════════════
// VisualMode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VisualMode {
    /// Particles gather into the spiral tree.
    #[default]
    Tree,
    /// Particles scatter into a sphere.
    Cloud,
    /// Same shape as `Cloud`, drawn larger.
    Zoom,
}

impl VisualMode {
    pub fn label(self) -> &'static str {
        match self {
            VisualMode::Tree  => "TREE",
            VisualMode::Cloud => "CLOUD",
            VisualMode::Zoom  => "ZOOM",
        }
    }

    /// Cloud and Zoom share the sphere target.
    pub fn uses_cloud_shape(self) -> bool {
        matches!(self, VisualMode::Cloud | VisualMode::Zoom)
    }

    pub fn target_scale(self) -> f32 {
        match self {
            VisualMode::Tree  => 1.0,
            VisualMode::Cloud => 1.2,
            VisualMode::Zoom  => 1.5,
        }
    }

    /// Mode a gesture switches to, if it switches at all.
    pub fn for_gesture(gesture: Gesture) -> Option<VisualMode> {
        match gesture {
            Gesture::Open  => Some(VisualMode::Cloud),
            Gesture::Fist  => Some(VisualMode::Tree),
            Gesture::Pinch => Some(VisualMode::Zoom),
            Gesture::None | Gesture::Rotate => None,
        }
    }
}

impl fmt::Display for VisualMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ModeMachine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeMachine {
    mode:         VisualMode,
    last_gesture: Gesture,
}

impl ModeMachine {
    pub fn new() -> Self { Self::default() }

    pub fn mode(&self) -> VisualMode { self.mode }

    pub fn last_gesture(&self) -> Gesture { self.last_gesture }

    /// Feed one classified gesture.
    ///
    /// Returns the mode a transition switched to, or `None` when the gesture
    /// is unchanged or carries no mode (`NONE`). A changed gesture is
    /// remembered either way.
    pub fn observe(&mut self, gesture: Gesture) -> Option<VisualMode> {
        if gesture == self.last_gesture {
            return None;
        }
        self.last_gesture = gesture;

        let next = VisualMode::for_gesture(gesture)?;
        self.mode = next;
        Some(next)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
