//! Game audio sample subsystem
//!
//! Decodes encoded audio assets into working-format PCM (44.1kHz f32),
//! keeps them resident in a fixed-capacity store, and mixes a fixed pool
//! of playback instances into the platform output stream.
//!
//! The public surface is [`SampleEngine`]: open a device, load a batch of
//! encoded assets, then start instances with per-instance volume, pan,
//! pitch and looping. All control calls are safe to make with no device
//! open; they report failure instead of erroring out.

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;

pub use audio::pool::NO_SOUND;
pub use audio::types::DecodedSample;
pub use audio::{WORKING_CHANNELS, WORKING_SAMPLE_RATE};
pub use config::AudioConfig;
pub use engine::SampleEngine;
pub use error::{Error, Result};
