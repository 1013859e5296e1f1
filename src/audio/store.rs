//! Decoded sample store
//!
//! Fixed-capacity table of decoded assets indexed by small integer ids.
//! Loading is an atomic batch: either every asset of the most recent load is
//! present, or the store is empty. Samples are handed out as `Arc` clones so
//! playing instances stay valid even while the store is being repopulated,
//! though load/clear stop all instances first anyway.

use crate::audio::types::DecodedSample;
use crate::error::{Error, Result};
use std::sync::Arc;
use tracing::debug;

pub struct SampleStore {
    slots: Vec<Option<Arc<DecodedSample>>>,
    loaded_count: usize,
}

impl SampleStore {
    /// Create an empty store with a fixed slot capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            loaded_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of samples installed by the most recent successful batch.
    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    /// Look up a loaded sample by id. Ids at or beyond the last batch size
    /// are invalid even if a stale slot exists behind them.
    pub fn get(&self, sample_id: usize) -> Option<Arc<DecodedSample>> {
        if sample_id >= self.loaded_count {
            return None;
        }
        self.slots[sample_id].clone()
    }

    /// Install a fully decoded batch, replacing all previous contents.
    ///
    /// An oversized batch is rejected without modifying the store. The
    /// engine also validates batch size before decoding anything, so in
    /// practice a batch reaching here fits.
    pub fn publish(&mut self, batch: Vec<DecodedSample>) -> Result<()> {
        if batch.len() > self.slots.len() {
            return Err(Error::BatchTooLarge {
                requested: batch.len(),
                capacity: self.slots.len(),
            });
        }
        let count = batch.len();
        self.clear();
        for (slot, sample) in self.slots.iter_mut().zip(batch) {
            *slot = Some(Arc::new(sample));
        }
        self.loaded_count = count;
        debug!("sample store published {} samples", count);
        Ok(())
    }

    /// Drop every decoded sample and reset the valid count. Safe to call
    /// when nothing is loaded.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.loaded_count = 0;
    }
}
