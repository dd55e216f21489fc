//! Confetti Core Library - simulation and render core of the confetti viewer
//!
//! This library holds everything that does not depend on a particular
//! surface or audio backend: transform and projection math, the mesh model,
//! OBJ/WAV loading, the confetti pool, input handling and the frame loop.

pub mod audio;
pub mod clock;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod lifecycle;
pub mod obj;
pub mod particles;
pub mod platform;
pub mod projection;
pub mod simulation;
pub mod transform;
pub mod wav;

// Re-export commonly used types
pub use audio::{AudioFeed, AudioSink};
pub use clock::{FrameClock, MonotonicClock, TickSource};
pub use error::{Error, Result};
pub use frame::{FrameLoop, FrameStats};
pub use geometry::{Mesh, Triangle, Vertex};
pub use interaction::{InputEvent, Key, PointerButton};
pub use lifecycle::DemoConfig;
pub use particles::ParticlePool;
pub use platform::{Canvas, Color, SpriteMask, SpriteVertex};
pub use projection::{project, ScreenPoint};
pub use simulation::{Flow, Simulation};
pub use transform::Transform;
pub use wav::{AudioClip, AudioSpec, SampleFormat};
