//! Sample engine: the public control surface
//!
//! Ties the decode pipeline, sample store, instance pool and output device
//! together behind a single exclusive lock. Control-plane calls (game
//! logic) and the realtime device callback both go through that lock, so a
//! half-updated slot can never be observed by the mixer.
//!
//! Every operation degrades to a harmless failure return while no output
//! device is open; the rest of the engine can call this API unconditionally
//! in headless configurations. Audio is not gameplay-critical: nothing in
//! here escalates beyond a logged error.

use crate::audio::output::AudioOutput;
use crate::audio::pool::{InstancePool, NO_SOUND};
use crate::audio::store::SampleStore;
use crate::audio::{decode, mixer};
use crate::config::AudioConfig;
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// State shared between the control plane and the device callback.
///
/// The surrounding mutex is the device-scoped lock: held only for slot and
/// store reads/writes, never across a decode.
struct EngineState {
    store: SampleStore,
    pool: InstancePool,
}

/// Audio sample engine.
///
/// # Examples
///
/// ```ignore
/// let mut engine = SampleEngine::new(AudioConfig::default());
/// engine.open()?;
/// engine.load_samples(&assets);
/// let id = engine.play(0, 0, 1.0, 0, false);
/// ```
pub struct SampleEngine {
    config: AudioConfig,
    state: Arc<Mutex<EngineState>>,
    output: Option<AudioOutput>,
    open: bool,
}

impl SampleEngine {
    /// Create a closed engine. No operation succeeds until [`open`] does.
    ///
    /// [`open`]: SampleEngine::open
    pub fn new(config: AudioConfig) -> Self {
        let state = EngineState {
            store: SampleStore::new(config.max_samples),
            pool: InstancePool::new(config.max_instances),
        };
        Self {
            config,
            state: Arc::new(Mutex::new(state)),
            output: None,
            open: false,
        }
    }

    /// Open the output device and start the mixing callback.
    ///
    /// Idempotent: opening an already-open engine is a no-op.
    pub fn open(&mut self) -> Result<()> {
        if self.open {
            return Ok(());
        }

        let mut output =
            AudioOutput::open(self.config.device.as_deref(), self.config.buffer_size)?;
        let state = Arc::clone(&self.state);
        output.start(move |data| {
            let mut st = state.lock().unwrap();
            mixer::mix(&mut st.pool, data);
        })?;

        self.output = Some(output);
        self.open = true;
        info!("sample engine opened");
        Ok(())
    }

    /// Stop all playback, clear the store and close the device.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        {
            let mut st = self.state.lock().unwrap();
            st.pool.stop_all();
            st.store.clear();
        }
        if let Some(mut output) = self.output.take() {
            output.stop();
        }
        self.open = false;
        info!("sample engine closed");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Number of samples installed by the most recent successful load.
    pub fn loaded_samples(&self) -> usize {
        self.state.lock().unwrap().store.loaded_count()
    }

    /// Load a batch of encoded assets, replacing everything currently
    /// loaded.
    ///
    /// All-or-nothing: existing instances are stopped and the store cleared
    /// up front; if any asset fails to decode the store stays empty and the
    /// failure is logged with the asset index. Decoding runs outside the
    /// engine lock, so an open stream keeps ticking (over silence) while a
    /// batch decodes.
    pub fn load_samples<A: AsRef<[u8]>>(&self, assets: &[A]) -> bool {
        if !self.open {
            return false;
        }

        let capacity = self.state.lock().unwrap().store.capacity();
        if assets.len() > capacity {
            error!(
                "{}",
                Error::BatchTooLarge {
                    requested: assets.len(),
                    capacity,
                }
            );
            return false;
        }

        {
            let mut st = self.state.lock().unwrap();
            st.pool.stop_all();
            st.store.clear();
        }

        let mut decoded = Vec::with_capacity(assets.len());
        for (sample_id, asset) in assets.iter().enumerate() {
            match decode::decode_asset(asset.as_ref()) {
                Ok(sample) => decoded.push(sample),
                Err(e) => {
                    // store was already cleared; the batch simply never lands
                    error!("failed to decode sample {}: {}", sample_id, e);
                    return false;
                }
            }
        }

        let count = decoded.len();
        let total_seconds: f32 = decoded.iter().map(|s| s.duration_seconds()).sum();
        if let Err(e) = self.state.lock().unwrap().store.publish(decoded) {
            error!("failed to publish sample batch: {}", e);
            return false;
        }
        info!("loaded {} samples ({:.2}s of audio)", count, total_seconds);
        true
    }

    /// Stop every instance and drop all decoded samples.
    pub fn clear_samples(&self) -> bool {
        if !self.open {
            return false;
        }
        let mut st = self.state.lock().unwrap();
        st.pool.stop_all();
        st.store.clear();
        true
    }

    /// Start playback of a loaded sample.
    ///
    /// # Arguments
    /// - `sample_id`: Index into the loaded batch
    /// - `volume`: Hundredths of decibel
    /// - `pitch`: Playback speed multiplier (1.0 = normal)
    /// - `pan`: Hundredths of decibel, negative = left bias
    /// - `looped`: Wrap at end of sample instead of stopping
    ///
    /// # Returns
    /// Instance id, or [`NO_SOUND`] if the engine is closed, the sample id
    /// is invalid, or no playback slot is free.
    pub fn play(&self, sample_id: usize, volume: i32, pitch: f32, pan: i32, looped: bool) -> i32 {
        if !self.open {
            return NO_SOUND;
        }
        let mut st = self.state.lock().unwrap();
        let Some(sample) = st.store.get(sample_id) else {
            debug!("{}", Error::InvalidSampleId(sample_id));
            return NO_SOUND;
        };
        st.pool.play(sample, volume, pitch, pan, looped)
    }

    pub fn is_playing(&self, instance_id: i32) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.is_playing(instance_id)
    }

    pub fn pause(&self, instance_id: i32) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.pause(instance_id)
    }

    pub fn unpause(&self, instance_id: i32) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.unpause(instance_id)
    }

    pub fn stop(&self, instance_id: i32) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.stop(instance_id)
    }

    pub fn set_volume(&self, instance_id: i32, volume: i32) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.set_volume(instance_id, volume)
    }

    pub fn set_pan(&self, instance_id: i32, pan: i32) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.set_pan(instance_id, pan)
    }

    pub fn pause_all(&self) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.pause_all();
        true
    }

    pub fn unpause_all(&self) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.unpause_all();
        true
    }

    pub fn stop_all(&self) -> bool {
        if !self.open {
            return false;
        }
        self.state.lock().unwrap().pool.stop_all();
        true
    }

    /// One mixing tick: accumulate all active instances into `dst`
    /// (interleaved stereo f32). The device callback drives this; callers
    /// are responsible for silencing the buffer first.
    pub fn mix(&self, dst: &mut [f32]) -> bool {
        if !self.open {
            return false;
        }
        let mut st = self.state.lock().unwrap();
        mixer::mix(&mut st.pool, dst);
        true
    }
}

impl Drop for SampleEngine {
    fn drop(&mut self) {
        self.close();
    }
}
