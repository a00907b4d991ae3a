//! Top-level application state.
//!
//! `AppState` owns the scene, the particle field and the UI selections. It
//! consumes `DetectorEvent`s and `UiCommand`s and is ticked once per frame.
//! Anything that has to reach the session comes back out as an [`Effect`].

use std::sync::mpsc;
use std::time::Instant;

use holo_gesture::{HandLandmarks, SceneState, VisualMode};
use holo_wish::WishGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, SourceConfig};
use crate::detector::DetectorLandmarkSource;
use crate::error::AppError;
use crate::palette::ColorChoice;
use crate::particles::{star_field, ParticleField};
use crate::session::Session;
use crate::source::{DetectorEvent, SimLandmarkSource};
use crate::visualizer::Visualizer;
use crate::wish_worker::FinishedWish;

// ════════════════════════════════════════════════════════════════════════════
// UI commands and effects
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    SelectColor(ColorChoice),
    GenerateWish,
    Quit,
}

/// Work the run loop performs on behalf of `AppState`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    RequestWish(String),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    scene:           SceneState,
    field:           ParticleField,
    color:           ColorChoice,
    rotation_offset: f32,

    // ── wish ─────────────────────────────────────────────────────────────
    wish_text:       Option<String>,
    wish_pending:    bool,

    // ── camera preview ───────────────────────────────────────────────────
    hands:           Vec<HandLandmarks>,
    camera_failed:   bool,

    elapsed:         f32,
}

impl AppState {
    pub fn new(cfg: &AppConfig, rng: &mut StdRng) -> Self {
        AppState {
            scene:           SceneState::default(),
            field:           ParticleField::new(cfg.particle_count, rng),
            color:           cfg.color,
            rotation_offset: cfg.rotation_offset,
            wish_text:       None,
            wish_pending:    false,
            hands:           Vec::new(),
            camera_failed:   false,
            elapsed:         0.0,
        }
    }

    // ── process one DetectorEvent ────────────────────────────────────────

    pub fn handle_detector(&mut self, event: DetectorEvent) -> Option<Effect> {
        match event {
            DetectorEvent::Hands(hands) => {
                let before = self.scene.mode();
                self.scene = self.scene.apply(&hands);
                let after = self.scene.mode();
                if after != before {
                    info!(from = %before, to = %after, gesture = %self.scene.gesture, "mode changed");
                }
                self.hands = hands;
                None
            }
            DetectorEvent::CameraFailed(msg) => {
                warn!("continuing without a camera: {}", msg);
                self.camera_failed = true;
                self.hands.clear();
                self.scene = self.scene.apply(&[]);
                None
            }
            DetectorEvent::Quit => Some(Effect::Quit),
        }
    }

    // ── process one UiCommand ────────────────────────────────────────────

    pub fn handle_ui(&mut self, cmd: UiCommand) -> Option<Effect> {
        match cmd {
            UiCommand::SelectColor(c) => {
                debug!(color = %c, "color selected");
                self.color = c;
                None
            }
            UiCommand::GenerateWish => {
                if self.wish_pending {
                    debug!("wish already pending; ignoring request");
                    return None;
                }
                self.wish_pending = true;
                Some(Effect::RequestWish(self.color.wish_theme().to_string()))
            }
            UiCommand::Quit => Some(Effect::Quit),
        }
    }

    pub fn wish_ready(&mut self, wish: FinishedWish) {
        info!(theme = %wish.theme, "wish ready");
        self.wish_text    = Some(wish.text);
        self.wish_pending = false;
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.field.tick(
            dt,
            self.elapsed,
            self.scene.mode(),
            self.scene.hand_x,
            self.rotation_offset,
        );
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn scene(&self)         -> &SceneState        { &self.scene }
    pub fn mode(&self)          -> VisualMode         { self.scene.mode() }
    pub fn field(&self)         -> &ParticleField     { &self.field }
    pub fn color(&self)         -> ColorChoice        { self.color }
    pub fn wish_text(&self)     -> Option<&str>       { self.wish_text.as_deref() }
    pub fn wish_pending(&self)  -> bool               { self.wish_pending }
    pub fn hands(&self)         -> &[HandLandmarks]   { &self.hands }
    pub fn camera_failed(&self) -> bool               { self.camera_failed }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Open the window, start the session and drive the frame loop at ~60 fps
/// until the window closes or a quit is requested.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    };

    let generator = WishGenerator::from_config(&cfg.wish)?;

    // ── Session (landmark source + wish worker) ──────────────────────────
    let mut sim_tx = None;
    let session = match &cfg.source {
        SourceConfig::Simulated => {
            let (tx, rx) = mpsc::channel();
            sim_tx = Some(tx);
            info!("using keyboard hand simulation");
            Session::start(SimLandmarkSource::new(rx), generator)
        }
        SourceConfig::Detector(det) => {
            info!(command = %det.command, "using external hand detector");
            Session::start(DetectorLandmarkSource::new(det.clone()), generator)
        }
    };

    let stars   = star_field(&mut rng, cfg.star_count);
    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height, sim_tx, stars)?;
    let mut app = AppState::new(&cfg, &mut rng);

    let mut last_frame    = Instant::now();
    let mut detector_live = true;

    'frame: while vis.is_open() {
        // 1. Window input
        for cmd in vis.poll_input() {
            match app.handle_ui(cmd) {
                Some(Effect::RequestWish(theme)) => session.request_wish(&theme),
                Some(Effect::Quit)               => break 'frame,
                None                             => {}
            }
        }

        // 2. Drain detector events
        if detector_live {
            let (events, gone) = session.detector_events();
            for ev in events {
                if app.handle_detector(ev) == Some(Effect::Quit) {
                    break 'frame;
                }
            }
            if gone {
                debug!("landmark source finished");
                detector_live = false;
            }
        }

        // 3. Finished wishes
        for wish in session.finished_wishes() {
            app.wish_ready(wish);
        }

        // 4. Per-frame logic
        let now = Instant::now();
        app.tick((now - last_frame).as_secs_f32());
        last_frame = now;

        // 5. Render
        vis.render(&app);
    }

    session.stop();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
