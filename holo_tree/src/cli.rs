//! Command-line flags.

use clap::Parser;
use holo_wish::WishConfig;

use crate::config::{AppConfig, SourceConfig, STAR_COUNT, WIN_H, WIN_W};
use crate::detector::DetectorConfig;
use crate::palette::ColorChoice;
use crate::particles::PARTICLE_COUNT;

#[derive(Parser, Debug)]
#[command(
    name = "holo_tree",
    about = "Gesture-controlled 3D particle tree",
    long_about = "Fist gathers the tree, open hand scatters it into a cloud, \
                  pinch zooms in, and horizontal hand position turns it. \
                  Set API_KEY to get generated holiday wishes."
)]
pub struct Cli {
    /// Drive the hand from the keyboard (default).
    #[arg(long, conflicts_with = "detector")]
    pub sim: bool,

    /// Hand-landmark detector command to spawn.
    #[arg(long, value_name = "CMD")]
    pub detector: Option<String>,

    /// Extra argument for the detector (repeatable).
    #[arg(long = "detector-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub detector_args: Vec<String>,

    #[arg(long, default_value_t = PARTICLE_COUNT)]
    pub particles: usize,

    #[arg(long, default_value_t = STAR_COUNT)]
    pub stars: usize,

    /// green, gold, red, white, or a palette hex code.
    #[arg(long, default_value = "green")]
    pub color: ColorChoice,

    /// Added to the hand-driven rotation, in radians.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub rotation_offset: f32,

    /// Text-generation model.
    #[arg(long)]
    pub model: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Seed for the cloud and star layout.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = WIN_W)]
    pub width: usize,

    #[arg(long, default_value_t = WIN_H)]
    pub height: usize,
}

impl Cli {
    /// Merge the flags over `wish` (normally read from the environment).
    pub fn into_config(self, wish: WishConfig) -> AppConfig {
        let source = match self.detector {
            Some(cmd) => SourceConfig::Detector(DetectorConfig::with_command(cmd, self.detector_args)),
            None      => SourceConfig::Simulated,
        };
        let wish = match self.model {
            Some(model) => wish.with_model(model),
            None        => wish,
        };
        AppConfig {
            source,
            wish,
            particle_count:  self.particles,
            star_count:      self.stars,
            color:           self.color,
            rotation_offset: self.rotation_offset,
            window_width:    self.width.max(320),
            window_height:   self.height.max(240),
            seed:            self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let argv = std::iter::once("holo_tree").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().into_config(WishConfig::default())
    }

    #[test]
    fn defaults_match_app_config() {
        let cfg = parse(&[]);
        let def = AppConfig::default();
        assert!(cfg.is_simulated());
        assert_eq!(cfg.particle_count, def.particle_count);
        assert_eq!(cfg.color, ColorChoice::Green);
        assert_eq!((cfg.window_width, cfg.window_height), (WIN_W, WIN_H));
        assert_eq!(cfg.wish, def.wish);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn detector_with_args() {
        let cfg = parse(&["--detector", "python3", "--detector-arg", "hands.py",
                          "--detector-arg", "--camera=1"]);
        match cfg.source {
            SourceConfig::Detector(d) => {
                assert_eq!(d.command, "python3");
                assert_eq!(d.args, vec!["hands.py", "--camera=1"]);
                assert_eq!((d.width, d.height), (640, 480));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn sim_and_detector_conflict() {
        assert!(Cli::try_parse_from(["holo_tree", "--sim", "--detector", "x"]).is_err());
    }

    #[test]
    fn scene_flags() {
        let cfg = parse(&["--particles", "500", "--color", "gold", "--rotation-offset", "-0.5",
                          "--seed", "42", "--model", "other-model"]);
        assert_eq!(cfg.particle_count, 500);
        assert_eq!(cfg.color, ColorChoice::Gold);
        assert_eq!(cfg.rotation_offset, -0.5);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.wish.model, "other-model");
    }

    #[test]
    fn bad_color_is_rejected() {
        assert!(Cli::try_parse_from(["holo_tree", "--color", "purple"]).is_err());
    }
}
