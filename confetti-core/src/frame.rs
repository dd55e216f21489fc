//! The per-tick scheduler
//!
//! [`FrameLoop::tick`] runs once per display refresh and always in the same
//! order: audio top-up, viewport query, delta time, clear, idle spin, mesh,
//! spawn timer, particle physics, particle draw, present. Inputs are applied
//! between ticks through [`FrameLoop::handle_event`].

use crate::audio::{AudioFeed, AudioSink};
use crate::clock::{FrameClock, TickSource};
use crate::error::Result;
use crate::geometry::Mesh;
use crate::interaction::InputEvent;
use crate::platform::{Canvas, Color, SpriteVertex};
use crate::projection::{project, ScreenPoint};
use crate::simulation::{Flow, Simulation};
use crate::transform::Transform;

pub const BACKGROUND: Color = Color::DARK_GREY;
pub const WIREFRAME: Color = Color::WHITE;

/// What one tick did, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub dt: f32,
    pub lines: usize,
    pub bursts: usize,
    pub sprites: usize,
    pub audio_refilled: bool,
}

/// Everything a running demo owns
pub struct FrameLoop<C: Canvas, S: AudioSink, T: TickSource> {
    pub simulation: Simulation,
    pub(crate) canvas: C,
    pub(crate) sink: S,
    pub(crate) ticks: T,
    pub(crate) clock: FrameClock,
    pub(crate) mesh: Mesh,
    pub(crate) audio: AudioFeed,
    pub(crate) sprite: Option<C::Texture>,
    pub(crate) projected: Vec<ScreenPoint>,
    pub(crate) batch: Vec<SpriteVertex>,
}

impl<C: Canvas, S: AudioSink, T: TickSource> FrameLoop<C, S, T> {
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Apply an input event before the next tick
    pub fn handle_event(&mut self, event: &InputEvent) -> Flow {
        self.simulation.handle_event(event)
    }

    /// Run one frame.
    ///
    /// Draw failures are logged and skipped; only a failed present is
    /// returned as an error.
    pub fn tick(&mut self) -> Result<FrameStats> {
        let audio_refilled = self.audio.refill(&mut self.sink);

        let (width, height) = self.canvas.size();
        let dt = self.clock.advance(self.ticks.ticks());

        self.canvas.clear(BACKGROUND);
        self.simulation.idle_rotate(dt);

        let lines = render_mesh(
            &mut self.canvas,
            &self.mesh,
            &self.simulation.transform,
            (width, height),
            &mut self.projected,
        );

        let bursts = self.simulation.advance_spawn_timer(dt, width, height);
        self.simulation.particles.update(dt, height as f32);
        let sprites = self.draw_particles();

        self.canvas.present()?;

        Ok(FrameStats { dt, lines, bursts, sprites, audio_refilled })
    }

    /// Draw the confetti batch; returns the number of particles drawn
    fn draw_particles(&mut self) -> usize {
        self.simulation.particles.emit_draw_batch(&mut self.batch);
        if self.batch.is_empty() {
            return 0;
        }
        let Some(texture) = self.sprite.as_ref() else {
            return 0;
        };
        match self.canvas.draw_sprites(&self.batch, texture) {
            Ok(()) => self.batch.len() / 6,
            Err(e) => {
                log::warn!("Skipping confetti draw: {e}");
                0
            }
        }
    }
}

/// Draw the wireframe of `mesh` seen through `transform`.
///
/// A triangle is drawn only when all three vertices pass the camera-front
/// test and all its indices are valid; anything else is skipped whole.
/// `projected` is scratch space reused between frames. Returns the number of
/// line segments issued.
pub fn render_mesh<C: Canvas + ?Sized>(
    canvas: &mut C,
    mesh: &Mesh,
    transform: &Transform,
    (width, height): (u32, u32),
    projected: &mut Vec<ScreenPoint>,
) -> usize {
    projected.clear();
    if width == 0 || height == 0 {
        return 0;
    }
    projected.extend(
        mesh.vertices
            .iter()
            .map(|v| project(&transform.apply(v), width, height)),
    );

    let mut lines = 0;
    for triangle in &mesh.triangles {
        let Some([a, b, c]) = triangle.checked(projected.len()) else {
            continue;
        };
        let corners = [projected[a], projected[b], projected[c]];
        if !corners.iter().all(ScreenPoint::is_in_front) {
            continue;
        }
        for i in 0..3 {
            let from = corners[i];
            let to = corners[(i + 1) % 3];
            canvas.draw_line([from.x, from.y], [to.x, to.y], WIREFRAME);
        }
        lines += 3;
    }
    lines
}
