//! Asset decoding using symphonia
//!
//! Turns a fully buffered encoded asset (WAV, FLAC, Vorbis, MP3, AAC/M4A)
//! into working-format PCM. Assets are decoded in one shot; there is no
//! streaming path. The source channel count survives decode and resampling
//! untouched because the mixer performs its own mono downmix and panning.

use crate::audio::resampler;
use crate::audio::source::ByteCursor;
use crate::audio::types::DecodedSample;
use crate::audio::WORKING_SAMPLE_RATE;
use crate::error::{Error, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Decode an encoded asset to working-format PCM.
///
/// Opens the buffer as a container, decodes the first audio stream it finds
/// and resamples the result to 44.1kHz. End of stream terminates the packet
/// loop normally; any other demux or codec error aborts the asset and all
/// partial output is discarded.
///
/// # Returns
/// A [`DecodedSample`] with `num_samples = samples.len() / channels`. The
/// result is deterministic for a given input buffer.
pub fn decode_asset(bytes: &[u8]) -> Result<DecodedSample> {
    let mss = MediaSourceStream::new(
        Box::new(ByteCursor::new(bytes.to_vec())),
        Default::default(),
    );

    // No file name to hint with; let the probe sniff the container.
    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("failed to probe container: {}", e)))?;

    let mut format = probed.format;

    // First audio stream in the container
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Decode("no audio stream in container".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| Error::Decode("source sample rate unknown".to_string()))?;
    let channels = codec_params
        .channels
        .map(|c| c.count() as u16)
        .ok_or_else(|| Error::Decode("source channel count unknown".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("failed to create decoder: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();
    // Created from the first decoded frame's signal spec, reused after that.
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::Decode(format!("demux error: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| Error::Decode(format!("codec error: {}", e)))?;

        let buf = sample_buf.get_or_insert_with(|| {
            SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec())
        });
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    debug!(
        "decoded {} frames ({} channels at {}Hz)",
        samples.len() / channels.max(1) as usize,
        channels,
        source_rate
    );

    let samples = if source_rate == WORKING_SAMPLE_RATE {
        samples
    } else {
        resampler::resample(&samples, source_rate, channels)?
    };

    Ok(DecodedSample::new(samples, channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_probe() {
        let result = decode_asset(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn empty_buffer_fails() {
        assert!(decode_asset(&[]).is_err());
    }

    // Decoding of real containers is covered by tests/decode_tests.rs using
    // generated WAV fixtures.
}
