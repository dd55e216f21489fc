use std::cell::{Cell, RefCell};
use std::rc::Rc;

use confetti_core::frame::{render_mesh, BACKGROUND};
use confetti_core::particles::{BURST_SIZE, GRAVITY, LIFE_DECAY, PALETTE, POOL_CAPACITY};
use confetti_core::{
    AudioClip, AudioSink, AudioSpec, Canvas, Color, Error, FrameLoop, InputEvent, Mesh, PointerButton, Result,
    SampleFormat, Simulation, SpriteMask, SpriteVertex, TickSource, Transform,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Segment = ([f32; 2], [f32; 2]);

/// Records every call a frame makes, in order
#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
    clears: Vec<Color>,
    lines: Vec<Segment>,
    sprite_vertices: Vec<usize>,
    fail_present: bool,
    log: Option<Rc<RefCell<Vec<&'static str>>>>,
}

impl Recorder {
    fn note(&mut self, call: &'static str) {
        self.calls.push(call);
        if let Some(log) = &self.log {
            log.borrow_mut().push(call);
        }
    }
}

impl Canvas for Recorder {
    type Texture = usize;

    fn size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn clear(&mut self, color: Color) {
        self.note("clear");
        self.clears.push(color);
    }

    fn draw_line(&mut self, from: [f32; 2], to: [f32; 2], _color: Color) {
        self.lines.push((from, to));
    }

    fn create_texture(&mut self, mask: &SpriteMask) -> Result<usize> {
        Ok(mask.size())
    }

    fn draw_sprites(&mut self, vertices: &[SpriteVertex], texture: &usize) -> Result<()> {
        assert_eq!(*texture, 32);
        assert!(!vertices.is_empty());
        self.note("sprites");
        self.sprite_vertices.push(vertices.len());
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.note("present");
        if self.fail_present {
            return Err(Error::Platform("output closed".to_string()));
        }
        Ok(())
    }
}

/// Sink that never plays anything back
#[derive(Default)]
struct Buffer {
    queued: usize,
    pushes: usize,
    log: Option<Rc<RefCell<Vec<&'static str>>>>,
}

impl AudioSink for Buffer {
    fn queued_bytes(&mut self) -> usize {
        self.queued
    }

    fn queue(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(log) = &self.log {
            log.borrow_mut().push("queue");
        }
        self.queued += bytes.len();
        self.pushes += 1;
        Ok(())
    }
}

/// Tick counter the test advances by hand; one tick is one millisecond
#[derive(Clone, Default)]
struct Ticks(Rc<Cell<u64>>);

impl Ticks {
    fn advance_ms(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl TickSource for Ticks {
    fn ticks(&self) -> u64 {
        self.0.get()
    }

    fn frequency(&self) -> u64 {
        1_000
    }
}

fn clip(len: usize) -> AudioClip {
    AudioClip {
        spec: AudioSpec { format: SampleFormat::S16, channels: 2, sample_rate: 44_100 },
        data: vec![0; len],
    }
}

fn demo(canvas: Recorder, sink: Buffer) -> (FrameLoop<Recorder, Buffer, Ticks>, Ticks) {
    let ticks = Ticks::default();
    let demo = FrameLoop::start(canvas, sink, ticks.clone(), Mesh::cube(1.0), clip(400), Simulation::seeded(Some(7)));
    (demo, ticks)
}

fn click(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerDown { button: PointerButton::Primary, x, y }
}

/// Segments the cube would produce on an 800x600 surface under `transform`
fn cube_wireframe(transform: &Transform) -> Vec<Segment> {
    let mut canvas = Recorder::default();
    render_mesh(&mut canvas, &Mesh::cube(1.0), transform, (800, 600), &mut Vec::new());
    canvas.lines
}

fn assert_close(actual: f32, expected: f32) {
    assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
}

#[test]
fn zero_dt_tick_changes_only_the_frame() {
    let (mut demo, _ticks) = demo(Recorder::default(), Buffer::default());
    demo.handle_event(&click(100.0, 100.0));
    let particles: Vec<_> = demo.simulation.particles.slots().to_vec();

    let stats = demo.tick().unwrap();

    assert_eq!(stats.dt, 0.0);
    assert_eq!(stats.bursts, 0);
    assert_eq!(demo.simulation.transform, Transform::new());
    assert_eq!(demo.simulation.spawn_timer(), 0.0);
    assert_eq!(demo.simulation.particles.slots(), &particles[..]);
    assert_eq!(demo.clock().last_tick(), 0);
}

#[test]
fn audio_is_topped_up_before_drawing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let canvas = Recorder { log: Some(log.clone()), ..Default::default() };
    let sink = Buffer { log: Some(log.clone()), ..Default::default() };
    let (mut demo, ticks) = demo(canvas, sink);

    ticks.advance_ms(16);
    let stats = demo.tick().unwrap();

    assert!(stats.audio_refilled);
    assert_eq!(log.borrow().as_slice(), &["queue", "clear", "present"]);
    assert_eq!(demo.sink().queued, 400);

    // A full clip is still waiting, so the next frame leaves the sink alone
    ticks.advance_ms(16);
    assert!(!demo.tick().unwrap().audio_refilled);
    assert_eq!(demo.sink().pushes, 1);
}

#[test]
fn frames_clear_to_background_and_draw_the_mesh() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    ticks.advance_ms(16);
    let stats = demo.tick().unwrap();

    assert_eq!(demo.canvas().clears, vec![BACKGROUND]);
    assert_eq!(stats.lines, 36);
    assert_eq!(demo.canvas().lines.len(), 36);
}

#[test]
fn empty_pool_skips_sprite_draw() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    ticks.advance_ms(100);
    let stats = demo.tick().unwrap();

    assert_eq!(stats.sprites, 0);
    assert!(demo.canvas().sprite_vertices.is_empty());
    assert_eq!(demo.canvas().calls, vec!["clear", "present"]);
}

#[test]
fn clicked_burst_is_drawn_as_one_batch() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    demo.handle_event(&click(400.0, 300.0));
    ticks.advance_ms(16);
    let stats = demo.tick().unwrap();

    assert_eq!(stats.sprites, BURST_SIZE);
    assert_eq!(demo.canvas().sprite_vertices, vec![BURST_SIZE * 6]);
    assert_eq!(demo.canvas().calls, vec!["clear", "sprites", "present"]);
}

#[test]
fn fifty_first_burst_is_dropped() {
    let (mut demo, _ticks) = demo(Recorder::default(), Buffer::default());
    for _ in 0..50 {
        demo.handle_event(&click(10.0, 10.0));
    }
    assert_eq!(demo.simulation.particles.active_count(), POOL_CAPACITY);

    let before = demo.simulation.particles.slots().to_vec();
    demo.handle_event(&click(500.0, 500.0));
    assert_eq!(demo.simulation.particles.slots(), &before[..]);
}

#[test]
fn timed_bursts_follow_elapsed_time() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    ticks.advance_ms(400);
    assert_eq!(demo.tick().unwrap().bursts, 0);

    ticks.advance_ms(700);
    let stats = demo.tick().unwrap();
    assert_eq!(stats.bursts, 2);
    assert!((demo.simulation.spawn_timer() - 0.1).abs() < 1e-4);
}

#[test]
fn idle_spin_is_applied_before_the_mesh_is_drawn() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    ticks.advance_ms(200);
    demo.tick().unwrap();

    let spun = demo.simulation.transform;
    assert_close(spun.rotation_y, 0.1);
    assert_eq!(demo.canvas().lines, cube_wireframe(&spun));
    assert_ne!(demo.canvas().lines, cube_wireframe(&Transform::new()));
}

#[test]
fn timed_burst_moves_in_the_tick_that_fires_it() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    ticks.advance_ms(500);
    let stats = demo.tick().unwrap();
    assert_eq!(stats.bursts, 1);
    assert_eq!(stats.sprites, BURST_SIZE);

    // Same draws the simulation makes: burst point, then speed and colour per particle
    let mut rng = StdRng::seed_from_u64(7);
    let origin_x: f32 = rng.gen_range(0.0..=800.0);
    let origin_y: f32 = rng.gen_range(0.0..=600.0);

    let active: Vec<_> = demo.simulation.particles.slots().iter().filter(|p| p.active).collect();
    assert_eq!(active.len(), BURST_SIZE);
    for particle in active {
        let vx: f32 = rng.gen_range(-200.0..=200.0);
        let vy: f32 = rng.gen_range(-300.0..=-100.0);
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];

        assert_close(particle.life, 1.0 - LIFE_DECAY * 0.5);
        assert_close(particle.x, origin_x + vx * 0.5);
        assert_close(particle.y, origin_y + vy * 0.5);
        assert_close(particle.vy, vy + GRAVITY * 0.5);
        assert_ne!((particle.x, particle.y), (origin_x, origin_y));
        assert_eq!(particle.color, color);
    }
}

#[test]
fn drag_holds_the_idle_spin_for_whole_ticks() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    demo.handle_event(&InputEvent::PointerDown { button: PointerButton::Secondary, x: 100.0, y: 100.0 });
    demo.handle_event(&InputEvent::PointerMove { x: 110.0, y: 100.0 });
    let dragged = demo.simulation.transform;
    assert_close(dragged.rotation_y, 0.05);

    ticks.advance_ms(200);
    demo.tick().unwrap();
    assert_eq!(demo.simulation.transform, dragged);
    assert_eq!(demo.canvas().lines, cube_wireframe(&dragged));

    demo.handle_event(&InputEvent::PointerUp { button: PointerButton::Secondary, x: 110.0, y: 100.0 });
    ticks.advance_ms(200);
    demo.tick().unwrap();
    assert_close(demo.simulation.transform.rotation_y, 0.15);
}

#[test]
fn failed_present_ends_the_frame_with_an_error() {
    let canvas = Recorder { fail_present: true, ..Default::default() };
    let (mut demo, _ticks) = demo(canvas, Buffer::default());
    assert!(matches!(demo.tick(), Err(Error::Platform(_))));
}

#[test]
fn shutdown_returns_surface_and_sink() {
    let (mut demo, ticks) = demo(Recorder::default(), Buffer::default());
    ticks.advance_ms(16);
    demo.tick().unwrap();
    let (canvas, sink) = demo.shutdown();
    assert_eq!(canvas.calls, vec!["clear", "present"]);
    assert_eq!(sink.pushes, 1);
}
