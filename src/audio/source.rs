//! Seekable byte source over an in-memory encoded asset
//!
//! Demuxers do not read linearly: they seek backward to re-read headers and
//! jump to index tables near the end of the container. [`ByteCursor`] gives
//! symphonia pull-style read/seek access to a fully buffered asset, with
//! absolute, relative and end-relative positioning plus a size query.

use std::io::{Read, Seek, SeekFrom};
use symphonia::core::io::MediaSource;

/// Pull-style reader/seeker over an owned encoded byte buffer.
pub struct ByteCursor {
    data: Vec<u8>,
    pos: u64,
}

impl ByteCursor {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl Read for ByteCursor {
    fn read(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.data.len() as u64 - self.pos.min(self.data.len() as u64);
        let count = (dst.len() as u64).min(remaining) as usize;
        if count == 0 {
            // end of stream
            return Ok(0);
        }
        let start = self.pos as usize;
        dst[..count].copy_from_slice(&self.data[start..start + count]);
        self.pos += count as u64;
        Ok(count)
    }
}

impl Seek for ByteCursor {
    fn seek(&mut self, from: SeekFrom) -> std::io::Result<u64> {
        let target = match from {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
            SeekFrom::End(offset) => self.data.len() as i64 + offset,
        };
        if target < 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start of buffer",
            ));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}

impl MediaSource for ByteCursor {
    fn is_seekable(&self) -> bool {
        true
    }

    fn byte_len(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}
