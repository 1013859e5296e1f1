//! Audio sample subsystem
//!
//! Pipeline: encoded bytes -> [`decode`] -> [`store::SampleStore`] ->
//! [`pool::InstancePool`] -> [`mixer`] -> output device callback.
//!
//! Everything downstream of decode operates on the working format: f32
//! samples at 44.1kHz. Decoded assets keep their source channel count; the
//! mixer downmixes each instance to mono before applying stereo panning.

pub mod decode;
pub mod mixer;
pub mod output;
pub mod pool;
pub mod resampler;
pub mod source;
pub mod store;
pub mod types;

/// Working sample rate for all decoded audio
pub const WORKING_SAMPLE_RATE: u32 = 44100;

/// Output channel count (interleaved stereo)
pub const WORKING_CHANNELS: usize = 2;

pub use pool::NO_SOUND;
pub use types::DecodedSample;
