//! Particle field state and the camera projection used to draw it.
//!
//! Every particle has two precomputed targets: a slot on a tapering spiral
//! (the tree) and a random point inside a sphere (the cloud). Each frame the
//! current position moves a fraction of the way toward whichever target the
//! visual mode selects, so the field converges without ever snapping.

use std::f32::consts::PI;

use holo_gesture::VisualMode;
use rand::Rng;

pub const PARTICLE_COUNT: usize = 3000;
/// Interpolation rate per second for positions, rotation and scale.
pub const LERP_RATE:      f32   = 6.0;
pub const CLOUD_RADIUS:   f32   = 5.0;
/// Per-frame wobble applied in `Cloud` mode.
pub const DRIFT:          f32   = 0.01;

pub type Vec3 = [f32; 3];

/// Tree slot `i` of `count`: ten turns of a cone, narrow at the top.
pub fn tree_target(i: usize, count: usize) -> Vec3 {
    let t      = i as f32 / count.max(1) as f32;
    let angle  = t * PI * 20.0;
    let radius = 0.1 + t * 4.0;
    let taper  = 1.0 - t * 0.5;
    [
        angle.cos() * radius * taper,
        (1.0 - t) * 8.0 - 4.0,
        angle.sin() * radius * taper,
    ]
}

/// Uniform sample inside a sphere of `radius`.
pub fn sphere_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let r     = radius * rng.gen::<f32>().cbrt();
    let theta = rng.gen::<f32>() * 2.0 * PI;
    let phi   = (2.0 * rng.gen::<f32>() - 1.0).acos();
    [
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    ]
}

fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }

/// Y rotation the field turns toward for a mirrored hand x in `[0, 1]`.
pub fn target_rotation(hand_x: f32, rotation_offset: f32) -> f32 {
    (hand_x - 0.5) * PI * 2.0 + rotation_offset
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ParticleField {
    positions:      Vec<Vec3>,
    tree:           Vec<Vec3>,
    cloud:          Vec<Vec3>,
    pub rotation_y: f32,
    pub scale:      f32,
}

impl ParticleField {
    /// Start gathered as the tree.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let tree: Vec<Vec3>  = (0..count).map(|i| tree_target(i, count)).collect();
        let cloud: Vec<Vec3> = (0..count).map(|_| sphere_point(rng, CLOUD_RADIUS)).collect();
        ParticleField {
            positions:  tree.clone(),
            tree,
            cloud,
            rotation_y: 0.0,
            scale:      1.0,
        }
    }

    pub fn len(&self) -> usize { self.positions.len() }

    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    pub fn positions(&self) -> &[Vec3] { &self.positions }

    pub fn target(&self, mode: VisualMode) -> &[Vec3] {
        if mode.uses_cloud_shape() { &self.cloud } else { &self.tree }
    }

    /// Advance one frame of `dt` seconds; `elapsed` drives the cloud drift.
    pub fn tick(
        &mut self,
        dt:              f32,
        elapsed:         f32,
        mode:            VisualMode,
        hand_x:          f32,
        rotation_offset: f32,
    ) {
        // Clamp so a long frame lands on the target instead of overshooting.
        let k = (LERP_RATE * dt).clamp(0.0, 1.0);

        let target = if mode.uses_cloud_shape() { &self.cloud } else { &self.tree };
        for (i, (pos, goal)) in self.positions.iter_mut().zip(target).enumerate() {
            for axis in 0..3 {
                pos[axis] += (goal[axis] - pos[axis]) * k;
            }
            if mode == VisualMode::Cloud {
                let phase = elapsed + i as f32;
                pos[0] += phase.sin() * DRIFT;
                pos[1] += phase.cos() * DRIFT;
            }
        }

        self.rotation_y = lerp(self.rotation_y, target_rotation(hand_x, rotation_offset), k);
        self.scale      = lerp(self.scale, mode.target_scale(), k);
    }

    /// Particle `i` after the field's rotation and scale.
    pub fn world(&self, i: usize) -> Vec3 {
        let [x, y, z] = self.positions[i];
        let (s, c) = self.rotation_y.sin_cos();
        [
            (x * c + z * s) * self.scale,
            y * self.scale,
            (-x * s + z * c) * self.scale,
        ]
    }

    /// Largest distance of any particle from its target in `mode`.
    pub fn max_error(&self, mode: VisualMode) -> f32 {
        self.positions
            .iter()
            .zip(self.target(mode))
            .map(|(p, t)| {
                let d = [p[0] - t[0], p[1] - t[1], p[2] - t[2]];
                (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
            })
            .fold(0.0, f32::max)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Projection: perspective camera on the +Z axis looking at the origin
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub width:    usize,
    pub height:   usize,
    /// Vertical field of view in radians.
    pub fov_y:    f32,
    pub distance: f32,
    pub near:     f32,
}

impl Projection {
    pub fn new(width: usize, height: usize) -> Self {
        Projection {
            width,
            height,
            fov_y:    60f32.to_radians(),
            distance: 10.0,
            near:     0.1,
        }
    }

    /// Pixels per world unit at depth 1.
    pub fn focal_px(&self) -> f32 {
        (self.height as f32 / 2.0) / (self.fov_y / 2.0).tan()
    }

    /// Screen position and view depth, or `None` behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<(f32, f32, f32)> {
        let depth = self.distance - p[2];
        if depth <= self.near {
            return None;
        }
        let f = self.focal_px();
        let sx = self.width as f32 / 2.0 + p[0] * f / depth;
        let sy = self.height as f32 / 2.0 - p[1] * f / depth;
        Some((sx, sy, depth))
    }
}

/// Dim static points far behind the field.
pub fn star_field<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let [x, y, z] = sphere_point(rng, 1.0);
            let len = (x * x + y * y + z * z).sqrt().max(1e-3);
            let r = rng.gen_range(50.0..100.0) / len;
            [x * r, y * r, z * r]
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
