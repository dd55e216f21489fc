//! Confetti - Rotating wireframe mesh with confetti and looping music
//!
//! Controls:
//!   - Left click: Launch confetti at the pointer
//!   - Right drag: Rotate the mesh
//!   - Wheel / = / -: Zoom
//!   - R: Reset rotation and zoom
//!   - ESC / Ctrl-C: Quit

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use confetti_core::lifecycle::{self, DemoConfig};
use confetti_terminal::{KiraSink, TerminalApp};

#[derive(Parser, Debug)]
#[command(name = "confetti", version, about = "Rotating wireframe mesh with confetti and looping music")]
struct Cli {
    /// Wavefront OBJ mesh to display [default: assets/monke.obj]
    #[arg(requires = "audio")]
    mesh: Option<PathBuf>,

    /// WAV clip to loop [default: assets/hbday.wav]
    audio: Option<PathBuf>,

    /// Target frame rate
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Seed for confetti randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, away from the terminal surface
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let defaults = DemoConfig::default();
    let config = DemoConfig {
        mesh_path: cli.mesh.unwrap_or(defaults.mesh_path),
        audio_path: cli.audio.unwrap_or(defaults.audio_path),
        seed: cli.seed,
    };

    let mesh = lifecycle::load_mesh_or_empty(&config.mesh_path);
    let clip = lifecycle::load_audio(&config.audio_path)
        .with_context(|| format!("Failed to load audio clip {}", config.audio_path.display()))?;
    let sink = KiraSink::open(clip.spec).context("Failed to open audio output")?;

    let mut app = TerminalApp::new(mesh, clip, sink, cli.fps, config.seed)
        .context("Failed to set up the terminal")?;
    let result = app.run();
    app.shutdown();

    result.context("Terminal session failed")
}
