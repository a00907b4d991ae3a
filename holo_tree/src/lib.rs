//! # holo_tree
//!
//! A hand steers a software-rendered particle field between three
//! formations. Landmarks come from an external detector process (or the
//! keyboard simulator), are classified by `holo_gesture`, and the resulting
//! mode drives 3000 points toward their tree or cloud targets.
//!
//! ## Gesture → Mode mapping
//!
//! | Gesture | Mode | Formation |
//! |---|---|---|
//! | Fist | Tree | Tapering spiral cone, scale 1.0 |
//! | Open hand | Cloud | Drifting sphere, scale 1.2 |
//! | Pinch | Zoom | Still sphere, scale 1.5 |
//! | Move hand left/right | (any) | Turns the field about its vertical axis |
//!
//! Modes change only when the gesture changes, so holding a fist does not
//! keep re-triggering anything.
//!
//! ## Keys
//!
//! | Key | Action |
//! |---|---|
//! | `1`–`4` | Green / Gold / Red / White particles |
//! | `W` | Generate a holiday wish for the colour's theme |
//! | `Q` / `Esc` | Quit |
//!
//! ### Simulation keys (`--sim`, the default)
//!
//! | Key | Hand |
//! |---|---|
//! | `O` / `F` / `P` | Open hand / fist / pinch |
//! | `N` | Two fingers folded (no gesture) |
//! | `H` | Hand out of view |
//! | Arrows | Move the wrist |

pub mod palette;
pub mod particles;
pub mod source;
pub mod detector;
pub mod wish_worker;
pub mod session;
pub mod font;
pub mod canvas;
pub mod visualizer;
pub mod config;
pub mod cli;
pub mod error;
pub mod app;

pub use error::AppError;
