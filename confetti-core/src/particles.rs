//! Fixed-capacity confetti pool
//!
//! Slots are plain storage: a burst claims the lowest-index free slots in
//! ascending order, and a slot becomes free again once its particle fades out
//! or falls off the bottom of the screen. The pool never grows.

use rand::Rng;

use crate::platform::{Color, SpriteVertex};

/// Upper bound on simultaneous confetti
pub const POOL_CAPACITY: usize = 1000;
/// Particles requested per burst
pub const BURST_SIZE: usize = 20;
/// Edge length of a confetti quad in pixels
pub const PARTICLE_SIZE: f32 = 8.0;
/// Downward acceleration in px/s²
pub const GRAVITY: f32 = 300.0;
/// Life lost per second
pub const LIFE_DECAY: f32 = 0.8;
/// How far below the screen a particle may fall before it is retired
pub const OFFSCREEN_MARGIN: f32 = 50.0;

const SPEED_X: (f32, f32) = (-200.0, 200.0);
const SPEED_Y: (f32, f32) = (-300.0, -100.0);

pub const PALETTE: [Color; 8] = [
    Color::from_rgba8(255, 100, 100, 255),
    Color::from_rgba8(100, 255, 100, 255),
    Color::from_rgba8(100, 100, 255, 255),
    Color::from_rgba8(255, 255, 100, 255),
    Color::from_rgba8(255, 100, 255, 255),
    Color::from_rgba8(100, 255, 255, 255),
    Color::from_rgba8(255, 200, 100, 255),
    Color::from_rgba8(200, 100, 255, 255),
];

/// One confetti slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub color: Color,
    pub active: bool,
}

impl Particle {
    pub const fn dead() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            life: 0.0,
            color: Color::new(0.0, 0.0, 0.0, 0.0),
            active: false,
        }
    }

    /// Advance one step; returns whether the particle is still alive
    fn integrate(&mut self, dt: f32, screen_height: f32) -> bool {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.vy += GRAVITY * dt;
        self.life -= LIFE_DECAY * dt;
        self.life > 0.0 && self.y <= screen_height + OFFSCREEN_MARGIN
    }
}

pub struct ParticlePool {
    slots: Box<[Particle]>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::with_capacity(POOL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: vec![Particle::dead(); capacity].into_boxed_slice() }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|p| p.active)
    }

    /// Launch a burst at (x, y). Returns how many particles were placed.
    ///
    /// Each particle takes the first free slot at or after the previous one,
    /// which is the same slot a scan from index 0 would find. Random draws
    /// (x speed, y speed, colour) are only made for claimed slots.
    pub fn spawn<R: Rng + ?Sized>(&mut self, x: f32, y: f32, rng: &mut R) -> usize {
        let mut cursor = 0;
        let mut placed = 0;

        for _ in 0..BURST_SIZE {
            let Some(offset) = self.slots[cursor..].iter().position(|p| !p.active) else {
                break;
            };
            let index = cursor + offset;
            self.slots[index] = Particle {
                x,
                y,
                vx: rng.gen_range(SPEED_X.0..=SPEED_X.1),
                vy: rng.gen_range(SPEED_Y.0..=SPEED_Y.1),
                life: 1.0,
                color: PALETTE[rng.gen_range(0..PALETTE.len())],
                active: true,
            };
            cursor = index + 1;
            placed += 1;
        }

        if placed < BURST_SIZE {
            log::debug!("Confetti pool full, dropped {} of {}", BURST_SIZE - placed, BURST_SIZE);
        }
        placed
    }

    /// Integrate every active particle and retire the expired ones
    pub fn update(&mut self, dt: f32, screen_height: f32) {
        for p in self.slots.iter_mut().filter(|p| p.active) {
            if !p.integrate(dt, screen_height) {
                p.active = false;
            }
        }
    }

    /// Fill `out` with two triangles per active particle.
    ///
    /// `out` is cleared first, so one buffer can be reused every frame. The
    /// vertex colour is the particle colour with its alpha replaced by life.
    pub fn emit_draw_batch(&self, out: &mut Vec<SpriteVertex>) {
        out.clear();
        let h = PARTICLE_SIZE / 2.0;

        for p in self.slots.iter().filter(|p| p.active) {
            let color = p.color.with_alpha(p.life);
            let corner = |dx: f32, dy: f32, u: f32, v: f32| SpriteVertex {
                position: [p.x + dx, p.y + dy],
                color,
                tex_coord: [u, v],
            };
            out.extend_from_slice(&[
                corner(-h, -h, 0.0, 0.0),
                corner(h, -h, 1.0, 0.0),
                corner(-h, h, 0.0, 1.0),
                corner(h, -h, 1.0, 0.0),
                corner(h, h, 1.0, 1.0),
                corner(-h, h, 0.0, 1.0),
            ]);
        }
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}
