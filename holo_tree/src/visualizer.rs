//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ HOLOTREE                                   (●  GESTURE: OPEN) │
//! │ subtitle / key legend                                         │
//! │ ┌─────────────┐                                               │
//! │ │ GESTURE     │             particle tree                     │
//! │ │ GUIDE       │                                               │
//! │ └─────────────┘               wish text                       │
//! │ [■ ■ ■ ■]  [ GENERATE HOLIDAY WISH ]            ┌──────────┐  │
//! │                                                 │ preview  │  │
//! └─────────────────────────────────────────────────┴──────────┴──┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use holo_gesture::landmark::HAND_CONNECTIONS;
use holo_gesture::HandLandmarks;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::app::{AppState, UiCommand};
use crate::canvas::{blend, dim, Canvas};
use crate::font::{text_width, wrap_words};
use crate::palette::ColorChoice;
use crate::particles::{Projection, Vec3};
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Colours
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:       u32 = 0xFF050505;
const PANEL_BG:       u32 = 0xFF0F172A;
const PANEL_EDGE:     u32 = 0xFF334155;
const TEXT_MAIN:      u32 = 0xFFFFFFFF;
const TEXT_SOFT:      u32 = 0xFFCBD5E1;
const TEXT_MUTED:     u32 = 0xFF94A3B8;
const TEXT_HINT:      u32 = 0xFF64748B;
const OK_GREEN:       u32 = 0xFF22C55E;
const OK_TEXT:        u32 = 0xFF86EFAC;
const BAD_RED:        u32 = 0xFFEF4444;
const BAD_TEXT:       u32 = 0xFFFCA5A5;
const BUTTON_LEFT:    u32 = 0xFF6366F1;
const BUTTON_RIGHT:   u32 = 0xFF9333EA;
const WISH_COLOR:     u32 = 0xFFFDE68A;
const PREVIEW_OK:     u32 = 0xFF10B981;
const PREVIEW_BAD:    u32 = 0xFFF43F5E;
const BONE_COLOR:     u32 = PREVIEW_OK;
const JOINT_COLOR:    u32 = ColorChoice::Gold.argb();
const STAR_COLOR:     u32 = 0xFFFFFFFF;

const PARTICLE_ALPHA: f32 = 0.8;
const STAR_ALPHA:     f32 = 0.35;
/// Wrist movement per arrow-key press, in screen units.
const NUDGE:          f32 = 0.03;
const WISH_WRAP:      usize = 36;

// ════════════════════════════════════════════════════════════════════════════
// Layout: geometry shared by rendering and mouse hit-testing
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub width:  i32,
    pub height: i32,
}

impl Layout {
    const MARGIN: i32 = 24;
    const SWATCH: i32 = 32;
    const GAP:    i32 = 12;

    pub fn new(width: usize, height: usize) -> Self {
        Layout { width: width as i32, height: height as i32 }
    }

    pub fn palette_panel(&self) -> Rect {
        let n = ColorChoice::ALL.len() as i32;
        Rect {
            x: Self::MARGIN,
            y: self.height - Self::MARGIN - Self::SWATCH - 16,
            w: n * (Self::SWATCH + Self::GAP) + Self::GAP,
            h: Self::SWATCH + 16,
        }
    }

    pub fn swatch(&self, i: usize) -> Rect {
        let p = self.palette_panel();
        Rect {
            x: p.x + Self::GAP + i as i32 * (Self::SWATCH + Self::GAP),
            y: p.y + 8,
            w: Self::SWATCH,
            h: Self::SWATCH,
        }
    }

    pub fn wish_button(&self) -> Rect {
        let p = self.palette_panel();
        Rect { x: p.x + p.w + Self::MARGIN, y: p.y + 4, w: 220, h: p.h - 8 }
    }

    /// 192×144 camera preview in the bottom-right corner.
    pub fn preview(&self) -> Rect {
        Rect {
            x: self.width - Self::MARGIN - 192,
            y: self.height - Self::MARGIN - 144,
            w: 192,
            h: 144,
        }
    }

    pub fn guide(&self) -> Rect {
        Rect { x: Self::MARGIN, y: self.height / 2 - 70, w: 180, h: 112 }
    }

    /// UI command for a click at `(x, y)`, if it hit a control.
    pub fn hit(&self, x: i32, y: i32) -> Option<UiCommand> {
        if let Some(i) = (0..ColorChoice::ALL.len()).find(|&i| self.swatch(i).contains(x, y)) {
            return Some(UiCommand::SelectColor(ColorChoice::ALL[i]));
        }
        if self.wish_button().contains(x, y) {
            return Some(UiCommand::GenerateWish);
        }
        None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Key bindings
// ════════════════════════════════════════════════════════════════════════════

/// Keys that act the same in every mode.
pub fn ui_key(key: Key) -> Option<UiCommand> {
    let slot = match key {
        Key::Key1 => 1,
        Key::Key2 => 2,
        Key::Key3 => 3,
        Key::Key4 => 4,
        Key::W    => return Some(UiCommand::GenerateWish),
        Key::Q | Key::Escape => return Some(UiCommand::Quit),
        _ => return None,
    };
    ColorChoice::from_slot(slot).map(UiCommand::SelectColor)
}

/// One-shot simulation keys.
pub fn sim_key(key: Key) -> Option<SimInput> {
    match key {
        Key::O => Some(SimInput::Show(SimPose::Open)),
        Key::F => Some(SimInput::Show(SimPose::Fist)),
        Key::P => Some(SimInput::Show(SimPose::Pinch)),
        Key::N => Some(SimInput::Show(SimPose::Partial)),
        Key::H => Some(SimInput::Hide),
        Key::Q | Key::Escape => Some(SimInput::Quit),
        _ => None,
    }
}

/// Arrow keys, repeating while held.
pub fn sim_nudge(key: Key) -> Option<SimInput> {
    let (dx, dy) = match key {
        Key::Left  => (-NUDGE, 0.0),
        Key::Right => ( NUDGE, 0.0),
        Key::Up    => (0.0, -NUDGE),
        Key::Down  => (0.0,  NUDGE),
        _ => return None,
    };
    Some(SimInput::Nudge { dx, dy })
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    canvas:     Canvas,
    layout:     Layout,
    projection: Projection,
    stars:      Vec<Vec3>,
    /// Present in simulation mode only.
    sim_tx:     Option<Sender<SimInput>>,
    mouse_down: bool,
}

impl Visualizer {
    pub fn new(
        width:  usize,
        height: usize,
        sim_tx: Option<Sender<SimInput>>,
        stars:  Vec<Vec3>,
    ) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "HoloTree",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas:     Canvas::new(width, height, BG_COLOR),
            layout:     Layout::new(width, height),
            projection: Projection::new(width, height),
            stars,
            sim_tx,
            mouse_down: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Translate this frame's keys and clicks. Simulation keys go straight
    /// to the simulator; everything else is returned.
    pub fn poll_input(&mut self) -> Vec<UiCommand> {
        let mut out = Vec::new();
        if !self.window.is_open() {
            out.push(UiCommand::Quit);
            return out;
        }

        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            if let Some(tx) = &self.sim_tx {
                if let Some(input) = sim_key(key) {
                    // Quitting goes through the simulator so it exits first.
                    let _ = tx.send(input);
                    continue;
                }
            }
            if let Some(cmd) = ui_key(key) {
                out.push(cmd);
            }
        }

        if let Some(tx) = &self.sim_tx {
            for key in self.window.get_keys_pressed(KeyRepeat::Yes) {
                if let Some(input) = sim_nudge(key) {
                    let _ = tx.send(input);
                }
            }
        }

        let down = self.window.get_mouse_down(MouseButton::Left);
        if down && !self.mouse_down {
            if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
                out.extend(self.layout.hit(mx as i32, my as i32));
            }
        }
        self.mouse_down = down;

        out
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) {
        self.canvas.clear(BG_COLOR);

        self.draw_stars();
        self.draw_particles(app);
        self.draw_wish(app);
        self.draw_header(app);
        self.draw_guide();
        self.draw_controls(app);
        self.draw_preview(app);

        self.window
            .update_with_buffer(&self.canvas.buf, self.canvas.width, self.canvas.height)
            .ok();
    }

    // ── Scene ─────────────────────────────────────────────────────────────

    fn draw_stars(&mut self) {
        for &star in &self.stars {
            if let Some((sx, sy, _)) = self.projection.project(star) {
                self.canvas.add_pixel(sx as i32, sy as i32, STAR_COLOR, STAR_ALPHA);
            }
        }
    }

    fn draw_particles(&mut self, app: &AppState) {
        let field = app.field();
        let color = app.color().argb();
        for i in 0..field.len() {
            let Some((sx, sy, depth)) = self.projection.project(field.world(i)) else {
                continue;
            };
            // Nearer particles are drawn larger.
            let size = if depth < 7.0 { 3 } else if depth < 11.0 { 2 } else { 1 };
            self.canvas.splat(sx as i32, sy as i32, size, color, PARTICLE_ALPHA);
        }
    }

    fn draw_wish(&mut self, app: &AppState) {
        let Some(text) = app.wish_text() else { return };
        let lines = wrap_words(text, WISH_WRAP);
        let lh    = Canvas::line_height(2);

        let below_tree = self.projection
            .project([0.0, -4.5 * app.field().scale, 0.0])
            .map(|(_, sy, _)| sy as i32)
            .unwrap_or(self.layout.height * 3 / 4);
        let max_y = self.layout.palette_panel().y - 12 - lh * lines.len() as i32;
        let y0    = below_tree.min(max_y);

        let cx = self.layout.width / 2;
        for (i, line) in lines.iter().enumerate() {
            self.canvas.text_centered(line, cx, y0 + i as i32 * lh, 2, WISH_COLOR);
        }
    }

    // ── Chrome ────────────────────────────────────────────────────────────

    fn draw_header(&mut self, app: &AppState) {
        let m = Layout::MARGIN;
        self.canvas.text("HOLOTREE", m, m, 4, TEXT_MAIN);
        self.canvas.text("INTERACTIVE 3D PARTICLE EXPERIENCE", m, m + 38, 1, TEXT_MUTED);
        self.canvas.text("1-4 COLOR   W WISH   Q QUIT", m, m + 54, 1, TEXT_HINT);
        if self.sim_tx.is_some() {
            self.canvas.text("SIM: O/F/P/N POSE   H HIDE   ARROWS MOVE", m, m + 66, 1, TEXT_HINT);
        }

        // Status badge
        let scene  = app.scene();
        let label  = scene.status_label().to_uppercase();
        let (edge, ink) = if scene.hand_detected { (OK_GREEN, OK_TEXT) } else { (BAD_RED, BAD_TEXT) };
        let w = text_width(&label, 1) as i32 + 36;
        let x = self.layout.width - m - w;
        self.canvas.shade_rect(x, m, w, 24, edge, 0.2);
        self.canvas.draw_border(x, m, w, 24, dim(edge, 0.5));
        self.canvas.fill_circle(x + 14, m + 12, 3, edge);
        self.canvas.text(&label, x + 24, m + 9, 1, ink);
    }

    fn draw_guide(&mut self) {
        let r = self.layout.guide();
        self.canvas.shade_rect(r.x, r.y, r.w, r.h, PANEL_BG, 0.5);
        self.canvas.draw_border(r.x, r.y, r.w, r.h, PANEL_EDGE);
        self.canvas.text("GESTURE GUIDE", r.x + 12, r.y + 12, 1, TEXT_MAIN);
        let rows = [
            "FIST:   CLOSE TREE",
            "OPEN:   EXPAND / CLOUD",
            "MOVE X: ROTATE",
            "PINCH:  ZOOM / FOCUS",
        ];
        for (i, row) in rows.iter().enumerate() {
            self.canvas.text(row, r.x + 12, r.y + 34 + i as i32 * 18, 1, TEXT_SOFT);
        }
    }

    fn draw_controls(&mut self, app: &AppState) {
        let p = self.layout.palette_panel();
        self.canvas.shade_rect(p.x, p.y, p.w, p.h, PANEL_BG, 0.6);
        self.canvas.draw_border(p.x, p.y, p.w, p.h, PANEL_EDGE);

        for (i, c) in ColorChoice::ALL.iter().enumerate() {
            let s = self.layout.swatch(i);
            self.canvas.fill_rect(s.x, s.y, s.w, s.h, c.argb());
            if *c == app.color() {
                self.canvas.draw_border(s.x - 2, s.y - 2, s.w + 4, s.h + 4, TEXT_MAIN);
                self.canvas.draw_border(s.x - 3, s.y - 3, s.w + 6, s.h + 6, TEXT_MAIN);
            }
        }

        // Wish button: horizontal gradient, dimmed while a wish is pending.
        let b = self.layout.wish_button();
        let fade = if app.wish_pending() { 0.5 } else { 0.0 };
        for col in 0..b.w {
            let t = col as f32 / (b.w - 1).max(1) as f32;
            let shade = blend(blend(BUTTON_LEFT, BUTTON_RIGHT, t), BG_COLOR, fade);
            self.canvas.fill_rect(b.x + col, b.y, 1, b.h, shade);
        }
        let label = if app.wish_pending() { "WRITING WISH..." } else { "GENERATE HOLIDAY WISH" };
        let ink   = if app.wish_pending() { dim(TEXT_MAIN, 0.6) } else { TEXT_MAIN };
        self.canvas.text_centered(label, b.x + b.w / 2, b.y + (b.h - 7) / 2, 1, ink);
    }

    fn draw_preview(&mut self, app: &AppState) {
        let r = self.layout.preview();
        let detected = app.scene().hand_detected;
        self.canvas.fill_rect(r.x, r.y, r.w, r.h, PANEL_BG);

        for hand in app.hands() {
            self.draw_skeleton(hand, r);
        }

        if !detected {
            self.canvas.shade_rect(r.x, r.y, r.w, r.h, 0xFF000000, 0.6);
            let (msg, ink) = if app.camera_failed() {
                ("CAMERA UNAVAILABLE", PREVIEW_BAD)
            } else {
                ("SHOW HAND", dim(TEXT_MAIN, 0.8))
            };
            self.canvas.text_centered(msg, r.x + r.w / 2, r.y + r.h / 2 - 3, 1, ink);
        }

        let edge = if detected { PREVIEW_OK } else { dim(PREVIEW_BAD, 0.5) };
        self.canvas.draw_border(r.x, r.y, r.w, r.h, edge);
        self.canvas.draw_border(r.x + 1, r.y + 1, r.w - 2, r.h - 2, edge);
    }

    /// Mirrored so the preview reads like a mirror.
    fn draw_skeleton(&mut self, hand: &HandLandmarks, r: Rect) {
        let to_px = |i: usize| {
            let p = hand.get(i);
            let x = r.x + ((1.0 - p.x.clamp(0.0, 1.0)) * (r.w - 1) as f32) as i32;
            let y = r.y + (p.y.clamp(0.0, 1.0) * (r.h - 1) as f32) as i32;
            (x, y)
        };
        for &(a, b) in HAND_CONNECTIONS.iter() {
            let (x0, y0) = to_px(a);
            let (x1, y1) = to_px(b);
            self.canvas.line(x0, y0, x1, y1, BONE_COLOR);
        }
        for i in 0..hand.points().len() {
            let (x, y) = to_px(i);
            self.canvas.fill_circle(x, y, 2, JOINT_COLOR);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
