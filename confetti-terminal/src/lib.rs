//! Terminal frontend for the confetti viewer

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    style::ResetColor,
    terminal::{self, ClearType},
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use confetti_core::{
    AudioClip, Flow, FrameLoop, Mesh, MonotonicClock, Result, Simulation,
};

pub mod audio;
pub mod input;
pub mod renderer;

pub use audio::KiraSink;
pub use input::{translate, Input};
pub use renderer::TerminalCanvas;

/// A demo running on stdout
pub type TerminalDemo = FrameLoop<TerminalCanvas<Stdout>, KiraSink, MonotonicClock>;

/// Main application struct for the terminal confetti viewer
pub struct TerminalApp {
    demo: TerminalDemo,
    target_frame_time: Duration,
    running: bool,
    last_report: Instant,
    frame_count: u32,
}

impl TerminalApp {
    /// Build the demo around the current terminal size
    pub fn new(mesh: Mesh, clip: AudioClip, sink: KiraSink, fps: u32, seed: Option<u64>) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        let canvas = TerminalCanvas::new(stdout(), cols, rows);
        let demo = FrameLoop::start(canvas, sink, MonotonicClock::new(), mesh, clip, Simulation::seeded(seed));

        Ok(Self {
            demo,
            target_frame_time: Duration::from_secs(1) / fps.max(1),
            running: true,
            last_report: Instant::now(),
            frame_count: 0,
        })
    }

    /// Take over the terminal and run until quit.
    ///
    /// The terminal is restored whether the loop ends cleanly or not.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }

        let result = self.main_loop();

        // Cleanup
        let restored = restore_terminal();
        result.and(restored)
    }

    /// Release the demo; the terminal surface and audio device close on drop
    pub fn shutdown(self) {
        let (_canvas, _sink) = self.demo.shutdown();
        log::info!("Audio output and terminal surface closed");
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.running {
            let frame_start = Instant::now();

            self.handle_input()?;
            if !self.running {
                break;
            }

            let stats = self.demo.tick()?;
            log::trace!("{stats:?}");

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // FPS report
            let now = Instant::now();
            if (now - self.last_report).as_secs() >= 1 {
                let fps = self.frame_count as f32 / (now - self.last_report).as_secs_f32();
                log::debug!(
                    "{fps:.1} fps, {} confetti active",
                    self.demo.simulation.particles.active_count()
                );
                self.frame_count = 0;
                self.last_report = now;
            }
        }

        Ok(())
    }

    /// Drain every pending terminal event before the next tick
    fn handle_input(&mut self) -> Result<()> {
        while event::poll(Duration::ZERO)? {
            match translate(&event::read()?) {
                Input::Demo(event) => {
                    if self.demo.handle_event(&event) == Flow::Quit {
                        log::info!("Quit requested");
                        self.running = false;
                    }
                }
                Input::Resize(cols, rows) => self.demo.canvas_mut().resize(cols, rows),
                Input::Ignored => {}
            }
        }
        Ok(())
    }
}

fn restore_terminal() -> Result<()> {
    let mut out = stdout();
    let shown = execute!(
        out,
        DisableMouseCapture,
        ResetColor,
        terminal::Clear(ClearType::All),
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let raw = terminal::disable_raw_mode();
    shown.and(raw)?;
    Ok(())
}
