//! Error types for sfx-core
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation inside the crate. The public control surface converts these
//! to explicit success/failure returns; nothing in this subsystem is fatal.

use thiserror::Error;

/// Main error type for the sample subsystem
#[derive(Error, Debug)]
pub enum Error {
    /// Sample id outside the loaded range
    #[error("invalid sample id: {0}")]
    InvalidSampleId(usize),

    /// Load batch exceeds the sample store capacity
    #[error("batch of {requested} samples exceeds store capacity {capacity}")]
    BatchTooLarge { requested: usize, capacity: usize },

    /// Container/codec decode errors
    #[error("audio decode error: {0}")]
    Decode(String),

    /// Sample rate conversion errors
    #[error("resample error: {0}")]
    Resample(String),

    /// Audio output device errors
    #[error("audio output error: {0}")]
    AudioOutput(String),

    /// Configuration file errors
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the sfx-core Error
pub type Result<T> = std::result::Result<T, Error>;
