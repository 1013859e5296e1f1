//! Sound instance pool
//!
//! Fixed-capacity arena of playback slots addressed by validated integer
//! index. A slot is claimed by `play`, released by `stop` or by the mixer
//! when non-looped playback runs out of samples. Slot exhaustion is a soft
//! failure: the caller gets [`NO_SOUND`] and playback simply does not start.
//!
//! Volume and pan are stored in hundredths of a decibel (signed; negative
//! pan biases left). The derived per-channel gain multipliers follow the
//! engine's base-2 loudness curve: `2^(db/600)`. A positive pan attenuates
//! the left channel, a negative pan the right one, with volume as the
//! shared baseline.

use crate::audio::types::DecodedSample;
use std::sync::Arc;
use tracing::warn;

/// Sentinel instance id returned when playback could not start.
pub const NO_SOUND: i32 = -1;

/// Convert hundredths of a decibel to a linear gain multiplier.
fn decibel_to_multiplier(db_gain: f64) -> f32 {
    2.0_f64.powf(db_gain / 600.0) as f32
}

/// One playback slot.
#[derive(Default)]
pub struct Instance {
    pub(crate) in_use: bool,
    pub(crate) is_playing: bool,
    pub(crate) is_looped: bool,
    /// volume in hundredths of decibel
    pub(crate) volume: i32,
    /// pan in hundredths of decibel, negative = left bias
    pub(crate) pan: i32,
    pub(crate) pitch: f32,
    /// pitch shift produces non-integer advancement, hence float
    pub(crate) playhead: f32,
    pub(crate) gain_l: f32,
    pub(crate) gain_r: f32,
    pub(crate) sample: Option<Arc<DecodedSample>>,
}

impl Instance {
    fn recalculate_gains(&mut self) {
        self.gain_l = decibel_to_multiplier((self.volume - self.pan.max(0)) as f64);
        self.gain_r = decibel_to_multiplier((self.volume + self.pan.min(0)) as f64);
    }

    /// Free the slot without touching the sample it referenced.
    pub(crate) fn release(&mut self) {
        self.in_use = false;
        self.is_playing = false;
        self.sample = None;
    }
}

pub struct InstancePool {
    slots: Vec<Instance>,
}

impl InstancePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Instance::default()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Instance] {
        &mut self.slots
    }

    fn slot(&self, instance_id: i32) -> Option<&Instance> {
        usize::try_from(instance_id)
            .ok()
            .and_then(|id| self.slots.get(id))
    }

    fn slot_mut(&mut self, instance_id: i32) -> Option<&mut Instance> {
        usize::try_from(instance_id)
            .ok()
            .and_then(|id| self.slots.get_mut(id))
    }

    /// Claim the first free slot and start playback of `sample`.
    ///
    /// Returns the instance id, or [`NO_SOUND`] when every slot is in use.
    pub fn play(
        &mut self,
        sample: Arc<DecodedSample>,
        volume: i32,
        pitch: f32,
        pan: i32,
        looped: bool,
    ) -> i32 {
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if slot.in_use {
                continue;
            }

            slot.in_use = true;
            slot.is_playing = true;
            slot.is_looped = looped;
            slot.volume = volume;
            slot.pitch = pitch;
            slot.pan = pan;
            slot.playhead = 0.0;
            slot.sample = Some(sample);
            slot.recalculate_gains();

            return id as i32;
        }

        warn!("all playback slots are in use");
        NO_SOUND
    }

    pub fn is_playing(&self, instance_id: i32) -> bool {
        self.slot(instance_id)
            .map(|s| s.in_use && s.is_playing)
            .unwrap_or(false)
    }

    /// Suspend playback, keeping the slot and its playhead. Success even if
    /// already paused.
    pub fn pause(&mut self, instance_id: i32) -> bool {
        match self.slot_mut(instance_id) {
            Some(slot) => {
                slot.is_playing = false;
                true
            }
            None => false,
        }
    }

    /// Resume a paused instance. Success even if already playing.
    pub fn unpause(&mut self, instance_id: i32) -> bool {
        match self.slot_mut(instance_id) {
            Some(slot) => {
                slot.is_playing = true;
                true
            }
            None => false,
        }
    }

    /// Release the slot. The decoded sample it referenced is untouched.
    pub fn stop(&mut self, instance_id: i32) -> bool {
        match self.slot_mut(instance_id) {
            Some(slot) => {
                slot.release();
                true
            }
            None => false,
        }
    }

    pub fn set_volume(&mut self, instance_id: i32, volume: i32) -> bool {
        match self.slot_mut(instance_id) {
            Some(slot) => {
                slot.volume = volume;
                slot.recalculate_gains();
                true
            }
            None => false,
        }
    }

    pub fn set_pan(&mut self, instance_id: i32, pan: i32) -> bool {
        match self.slot_mut(instance_id) {
            Some(slot) => {
                slot.pan = pan;
                slot.recalculate_gains();
                true
            }
            None => false,
        }
    }

    pub fn pause_all(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.in_use) {
            slot.is_playing = false;
        }
    }

    pub fn unpause_all(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.in_use) {
            slot.is_playing = true;
        }
    }

    pub fn stop_all(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.in_use) {
            slot.release();
        }
    }

    /// Gain multipliers currently derived for an instance (left, right).
    pub fn gains(&self, instance_id: i32) -> Option<(f32, f32)> {
        self.slot(instance_id)
            .filter(|s| s.in_use)
            .map(|s| (s.gain_l, s.gain_r))
    }
}
