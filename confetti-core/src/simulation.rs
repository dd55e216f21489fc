//! All mutable demo state, owned in one place

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::interaction::{InputEvent, Interaction, Outcome};
use crate::particles::ParticlePool;
use crate::transform::Transform;

/// Seconds between automatic confetti bursts
pub const SPAWN_INTERVAL: f32 = 0.5;

/// Whether the run should keep going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Transform, drag state, confetti and the spawn timer.
///
/// Input handlers and the frame tick both take `&mut Simulation`, so there is
/// exactly one writer at a time.
pub struct Simulation<R: Rng = StdRng> {
    pub transform: Transform,
    pub interaction: Interaction,
    pub particles: ParticlePool,
    spawn_timer: f32,
    rng: R,
}

impl Simulation<StdRng> {
    /// Seeded for reproducible runs, or from OS entropy
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng)
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            transform: Transform::new(),
            interaction: Interaction::new(),
            particles: ParticlePool::new(),
            spawn_timer: 0.0,
            rng,
        }
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Apply one input event
    pub fn handle_event(&mut self, event: &InputEvent) -> Flow {
        match self.interaction.handle(event, &mut self.transform) {
            Outcome::Quit => Flow::Quit,
            Outcome::SpawnConfetti { x, y } => {
                self.particles.spawn(x, y, &mut self.rng);
                Flow::Continue
            }
            Outcome::None => Flow::Continue,
        }
    }

    /// Constant Y spin unless a drag is in progress
    pub fn idle_rotate(&mut self, dt: f32) {
        self.interaction.idle_rotate(&mut self.transform, dt);
    }

    /// Advance the spawn timer and fire one burst per elapsed interval at a
    /// random point of the `width` x `height` viewport.
    ///
    /// Returns the number of bursts fired. Once the pool is full the remaining
    /// whole intervals are dropped, since further bursts could not place
    /// anything.
    pub fn advance_spawn_timer(&mut self, dt: f32, width: u32, height: u32) -> usize {
        self.spawn_timer += dt;
        let mut bursts = 0;
        while self.spawn_timer >= SPAWN_INTERVAL {
            if self.particles.is_full() {
                self.spawn_timer %= SPAWN_INTERVAL;
                break;
            }
            self.spawn_timer -= SPAWN_INTERVAL;
            let x = self.rng.gen_range(0.0..=width as f32);
            let y = self.rng.gen_range(0.0..=height as f32);
            let placed = self.particles.spawn(x, y, &mut self.rng);
            log::debug!("Timed burst at ({x:.0}, {y:.0}): {placed} particles");
            bursts += 1;
        }
        bursts
    }
}
