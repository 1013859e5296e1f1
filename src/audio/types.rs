//! Core audio data types
//!
//! **Format:**
//! - Samples are f32 (floating point -1.0 to 1.0)
//! - Interleaved by channel: [c0, c1, ..., c0, c1, ...]
//! - Sample rate always 44100 Hz after resampling
//! - Channel count matches the source asset (downmix happens in the mixer)

/// A fully decoded, resampled audio asset.
///
/// Immutable once created; shared read-only between the sample store and any
/// number of playing instances.
#[derive(Debug, Clone)]
pub struct DecodedSample {
    /// PCM samples, interleaved across `channels`
    pub samples: Vec<f32>,

    /// Channel count of the source asset
    pub channels: u16,

    /// Number of samples per channel (`samples.len() / channels`)
    pub num_samples: usize,
}

impl DecodedSample {
    /// Create a decoded sample from interleaved PCM data.
    pub fn new(samples: Vec<f32>, channels: u16) -> Self {
        let num_samples = if channels == 0 {
            0
        } else {
            samples.len() / channels as usize
        };
        Self {
            samples,
            channels,
            num_samples,
        }
    }

    /// Duration in seconds at the working sample rate.
    pub fn duration_seconds(&self) -> f32 {
        self.num_samples as f32 / super::WORKING_SAMPLE_RATE as f32
    }
}
