//! ARGB framebuffer with the few drawing primitives the window needs.
//!
//! Coordinates are signed so callers can draw partly off-screen; every
//! primitive clips.

use crate::font::{glyph, text_width, ADVANCE, GLYPH_H, GLYPH_W};

pub struct Canvas {
    pub width:  usize,
    pub height: usize,
    pub buf:    Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Canvas { width, height, buf: vec![background; width * height] }
    }

    pub fn clear(&mut self, color: u32) { self.buf.fill(color); }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.buf[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.buf[i] = color;
        }
    }

    /// Alpha-blend `color` over the pixel.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            self.buf[i] = blend(self.buf[i], color, alpha);
        }
    }

    /// Add `color × alpha` to the pixel, saturating per channel.
    pub fn add_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            self.buf[i] = add(self.buf[i], color, alpha);
        }
    }

    /// Additive square splat centred on `(x, y)`.
    pub fn splat(&mut self, x: i32, y: i32, size: i32, color: u32, alpha: f32) {
        let half = size / 2;
        for dy in 0..size.max(1) {
            for dx in 0..size.max(1) {
                self.add_pixel(x - half + dx, y - half + dy, color, alpha);
            }
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        for row in y.max(0)..(y + h).min(self.height as i32) {
            for col in x.max(0)..(x + w).min(self.width as i32) {
                self.buf[row as usize * self.width + col as usize] = color;
            }
        }
    }

    /// Translucent panel.
    pub fn shade_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32, alpha: f32) {
        for row in y..y + h {
            for col in x..x + w {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    pub fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        if w <= 0 || h <= 0 { return; }
        for col in x..x + w {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// Bresenham line, endpoints included.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`; each font pixel
    /// becomes a `scale × scale` block.
    pub fn text(&mut self, text: &str, x: i32, y: i32, scale: usize, color: u32) {
        let s = scale.max(1) as i32;
        let mut cx = x;
        for ch in text.chars() {
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.fill_rect(cx + col as i32 * s, y + row as i32 * s, s, s, color);
                    }
                }
            }
            cx += ADVANCE as i32 * s;
            if cx >= self.width as i32 { break; }
        }
    }

    /// Draw `text` horizontally centred on `cx`.
    pub fn text_centered(&mut self, text: &str, cx: i32, y: i32, scale: usize, color: u32) {
        let w = text_width(text, scale.max(1)) as i32;
        self.text(text, cx - w / 2, y, scale, color);
    }

    pub fn line_height(scale: usize) -> i32 { ((GLYPH_H + 3) * scale.max(1)) as i32 }
}

fn channels(c: u32) -> [u32; 3] {
    [(c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF]
}

fn pack([r, g, b]: [u32; 3]) -> u32 {
    0xFF000000 | (r << 16) | (g << 8) | b
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let (ca, cb) = (channels(a), channels(b));
    let mix = |i: usize| (ca[i] as f32 * (1.0 - t) + cb[i] as f32 * t).round() as u32;
    pack([mix(0), mix(1), mix(2)])
}

/// Additive blend, saturating at 255 per channel.
pub fn add(base: u32, color: u32, alpha: f32) -> u32 {
    let alpha = alpha.clamp(0.0, 1.0);
    let (cb, cc) = (channels(base), channels(color));
    let sum = |i: usize| (cb[i] + (cc[i] as f32 * alpha).round() as u32).min(255);
    pack([sum(0), sum(1), sum(2)])
}

/// Scale brightness by `k` in `[0, 1]`.
pub fn dim(color: u32, k: f32) -> u32 {
    blend(0xFF000000, color, k)
}
