//! Audio output using cpal
//!
//! Opens the platform output device and drives the mixer from the device
//! callback. The stream is fixed to the working format: 44.1kHz, stereo,
//! f32. The callback zeroes the device buffer and hands it to the supplied
//! mix closure, which writes additively.

use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use tracing::{debug, error, info, warn};

use super::{WORKING_CHANNELS, WORKING_SAMPLE_RATE};

/// Output device handle.
///
/// Holds the cpal device and, once started, the playback stream. Dropping
/// the handle stops the stream.
pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioOutput {
    /// Open an output device.
    ///
    /// # Arguments
    /// - `device_name`: Optional device name (None = default device). An
    ///   unknown name falls back to the default device with a warning.
    /// - `buffer_size`: Optional callback buffer size in frames.
    pub fn open(device_name: Option<&str>, buffer_size: Option<u32>) -> Result<Self> {
        let host = cpal::default_host();

        let device = match device_name {
            Some(name) => {
                let mut devices = host.output_devices().map_err(|e| {
                    Error::AudioOutput(format!("failed to enumerate devices: {}", e))
                })?;
                match devices.find(|d| d.name().ok().as_deref() == Some(name)) {
                    Some(dev) => {
                        info!("using requested audio device: {}", name);
                        dev
                    }
                    None => {
                        warn!("audio device '{}' not found, using default", name);
                        host.default_output_device().ok_or_else(|| {
                            Error::AudioOutput("no default output device".to_string())
                        })?
                    }
                }
            }
            None => host
                .default_output_device()
                .ok_or_else(|| Error::AudioOutput("no default output device".to_string()))?,
        };

        let mut config = Self::working_format_config(&device)?;
        if let Some(frames) = buffer_size {
            config.buffer_size = cpal::BufferSize::Fixed(frames);
        }

        debug!(
            "audio output config: rate={}, channels={}, buffer={:?}",
            config.sample_rate.0, config.channels, config.buffer_size
        );

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Find a stream configuration matching the working format.
    ///
    /// The mixer produces 44.1kHz stereo f32 and nothing else, so a device
    /// that cannot take that format is treated as unavailable.
    fn working_format_config(device: &Device) -> Result<StreamConfig> {
        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::AudioOutput(format!("failed to query device configs: {}", e)))?
            .find(|c| {
                c.channels() as usize == WORKING_CHANNELS
                    && c.sample_format() == SampleFormat::F32
                    && c.min_sample_rate().0 <= WORKING_SAMPLE_RATE
                    && c.max_sample_rate().0 >= WORKING_SAMPLE_RATE
            })
            .ok_or_else(|| {
                Error::AudioOutput("device does not support 44.1kHz stereo f32".to_string())
            })?;

        Ok(supported
            .with_sample_rate(cpal::SampleRate(WORKING_SAMPLE_RATE))
            .config())
    }

    /// Start the playback stream.
    ///
    /// `mix` runs on the realtime audio thread once per callback tick with a
    /// zeroed interleaved stereo buffer. It must not block on I/O or
    /// allocate; the engine's mix entry point only takes the state lock and
    /// accumulates resident PCM.
    pub fn start<F>(&mut self, mut mix: F) -> Result<()>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // the mixer accumulates, so silence the buffer first
                    data.fill(0.0);
                    mix(data);
                },
                move |err| {
                    error!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("failed to start stream: {}", e)))?;

        self.stream = Some(stream);
        info!("audio stream started on '{}'", self.device_name());
        Ok(())
    }

    /// Stop and drop the playback stream.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                warn!("failed to pause stream during stop: {}", e);
            }
            drop(stream);
            info!("audio stream stopped");
        }
    }

    pub fn device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "unknown".to_string())
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
