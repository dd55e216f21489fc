//! Error types for the confetti core

use std::io;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading assets or talking to the platform
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A mesh statement could not be parsed
    #[error("OBJ line {line}: {message}")]
    Obj { line: usize, message: String },

    /// The audio container is malformed
    #[error("Invalid WAV data: {0}")]
    Wav(String),

    /// The audio container is valid but its sample layout is not supported
    #[error("Unsupported sample format: tag {format_tag:#06x}, {bits_per_sample} bits")]
    UnsupportedSampleFormat { format_tag: u16, bits_per_sample: u16 },

    /// The audio backend rejected a request
    #[error("Audio backend error: {0}")]
    Audio(String),

    /// The drawing surface rejected a request
    #[error("Platform error: {0}")]
    Platform(String),
}
