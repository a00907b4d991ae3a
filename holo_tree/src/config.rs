//! Application configuration.

use holo_wish::WishConfig;

use crate::detector::DetectorConfig;
use crate::palette::ColorChoice;
use crate::particles::PARTICLE_COUNT;

pub const WIN_W:      usize = 1024;
pub const WIN_H:      usize = 640;
pub const STAR_COUNT: usize = 1500;

/// Where hand landmarks come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceConfig {
    /// Keyboard simulation, no camera needed.
    Simulated,
    Detector(DetectorConfig),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source:          SourceConfig,
    pub wish:            WishConfig,
    pub particle_count:  usize,
    pub star_count:      usize,
    pub color:           ColorChoice,
    /// Added to the hand-driven Y rotation, in radians.
    pub rotation_offset: f32,
    pub window_width:    usize,
    pub window_height:   usize,
    /// Fixes the cloud and star layout; random when `None`.
    pub seed:            Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source:          SourceConfig::Simulated,
            wish:            WishConfig::default(),
            particle_count:  PARTICLE_COUNT,
            star_count:      STAR_COUNT,
            color:           ColorChoice::default(),
            rotation_offset: 0.0,
            window_width:    WIN_W,
            window_height:   WIN_H,
            seed:            None,
        }
    }
}

impl AppConfig {
    pub fn is_simulated(&self) -> bool { self.source == SourceConfig::Simulated }
}
