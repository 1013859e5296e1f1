//! Sample rate conversion using rubato
//!
//! Normalizes decoded assets to the 44.1kHz working rate. Conversion happens
//! once per asset at load time, never on the mixing path. The channel count
//! is preserved: stereo placement is computed later by the mixer, so there
//! is no reason to change the layout here.

use crate::audio::WORKING_SAMPLE_RATE;
use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Resample interleaved audio to the working sample rate.
///
/// # Arguments
/// - `input`: Interleaved samples at `input_rate`
/// - `input_rate`: Source sample rate
/// - `channels`: Channel count (preserved in the output)
///
/// Returns interleaved samples at 44.1kHz. Input already at the working rate
/// is returned as a copy without conversion.
pub fn resample(input: &[f32], input_rate: u32, channels: u16) -> Result<Vec<f32>> {
    if channels == 0 {
        return Err(Error::Resample("zero channel count".to_string()));
    }
    if input_rate == WORKING_SAMPLE_RATE {
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        "resampling {}Hz -> {}Hz ({} channels)",
        input_rate, WORKING_SAMPLE_RATE, channels
    );

    // rubato operates on planar data; one whole-asset pass with the chunk
    // size set to the input length, so a single converter handles the asset.
    let planar_input = deinterleave(input, channels);
    let input_frames = planar_input[0].len();

    let mut converter = FastFixedIn::<f32>::new(
        WORKING_SAMPLE_RATE as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input_frames,
        channels as usize,
    )
    .map_err(|e| Error::Resample(format!("failed to create resampler: {}", e)))?;

    let planar_output = converter
        .process(&planar_input, None)
        .map_err(|e| Error::Resample(format!("conversion failed: {}", e)))?;

    Ok(interleave(planar_output))
}

/// [c0, c1, c0, c1, ...] -> [[c0, c0, ...], [c1, c1, ...]]
fn deinterleave(samples: &[f32], channels: u16) -> Vec<Vec<f32>> {
    let num_channels = channels as usize;
    let num_frames = samples.len() / num_channels;

    let mut planar = vec![Vec::with_capacity(num_frames); num_channels];
    for frame_idx in 0..num_frames {
        for ch_idx in 0..num_channels {
            planar[ch_idx].push(samples[frame_idx * num_channels + ch_idx]);
        }
    }
    planar
}

/// [[c0, c0, ...], [c1, c1, ...]] -> [c0, c1, c0, c1, ...]
fn interleave(planar: Vec<Vec<f32>>) -> Vec<f32> {
    if planar.is_empty() {
        return Vec::new();
    }

    let num_channels = planar.len();
    let num_frames = planar[0].len();
    let mut interleaved = Vec::with_capacity(num_frames * num_channels);
    for frame_idx in 0..num_frames {
        for ch_idx in 0..num_channels {
            interleaved.push(planar[ch_idx][frame_idx]);
        }
    }
    interleaved
}
