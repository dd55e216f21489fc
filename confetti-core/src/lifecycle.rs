//! Startup and teardown
//!
//! Startup owns the failure policy: a mesh that cannot be loaded degrades to
//! an empty mesh, while a missing audio clip is fatal. Teardown releases the
//! sprite texture and mesh first, then hands the surface and sink back to the
//! frontend, which closes them.

use std::path::{Path, PathBuf};

use crate::audio::{AudioFeed, AudioSink};
use crate::clock::{FrameClock, TickSource};
use crate::error::Result;
use crate::frame::FrameLoop;
use crate::geometry::Mesh;
use crate::obj;
use crate::particles::POOL_CAPACITY;
use crate::platform::{Canvas, SpriteMask};
use crate::simulation::Simulation;
use crate::wav::{self, AudioClip};

/// Edge length of the confetti sprite texture in texels
pub const SPRITE_TEXTURE_SIZE: usize = 32;

pub const DEFAULT_MESH_PATH: &str = "assets/monke.obj";
pub const DEFAULT_AUDIO_PATH: &str = "assets/hbday.wav";

/// Runtime settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub mesh_path: PathBuf,
    pub audio_path: PathBuf,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            mesh_path: PathBuf::from(DEFAULT_MESH_PATH),
            audio_path: PathBuf::from(DEFAULT_AUDIO_PATH),
            seed: None,
        }
    }
}

/// Load the mesh, falling back to an empty one on any failure
pub fn load_mesh_or_empty(path: &Path) -> Mesh {
    match obj::load_obj(path) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::warn!("Failed to load mesh {}: {e}; continuing without it", path.display());
            Mesh::empty()
        }
    }
}

/// Load the looping clip; failure here aborts startup
pub fn load_audio(path: &Path) -> Result<AudioClip> {
    wav::load_wav(path).inspect_err(|e| {
        log::error!("Couldn't load audio clip {}: {e}", path.display());
    })
}

impl<C: Canvas, S: AudioSink, T: TickSource> FrameLoop<C, S, T> {
    /// Assemble a running demo around an opened surface and audio sink.
    ///
    /// The clock starts here, so the first tick's delta covers the time since
    /// startup.
    pub fn start(
        mut canvas: C,
        sink: S,
        ticks: T,
        mesh: Mesh,
        clip: AudioClip,
        simulation: Simulation,
    ) -> Self {
        let sprite = match canvas.create_texture(&SpriteMask::circle(SPRITE_TEXTURE_SIZE)) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("Failed to create confetti texture: {e}; confetti will not be drawn");
                None
            }
        };

        let clock = FrameClock::start(&ticks);
        log::info!(
            "Demo started: {} vertices, {} faces, {} byte clip",
            mesh.vertices.len(),
            mesh.triangles.len(),
            clip.len_bytes()
        );

        Self {
            simulation,
            canvas,
            sink,
            clock,
            ticks,
            projected: Vec::with_capacity(mesh.vertices.len()),
            batch: Vec::with_capacity(POOL_CAPACITY * 6),
            mesh,
            audio: AudioFeed::new(clip),
            sprite,
        }
    }

    /// Release demo resources and return the surface and sink for closing
    pub fn shutdown(self) -> (C, S) {
        let FrameLoop { canvas, sink, sprite, mesh, audio, .. } = self;
        drop(sprite);
        drop(mesh);
        drop(audio);
        log::info!("Demo resources released");
        (canvas, sink)
    }
}
