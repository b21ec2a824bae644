//! Growable in-memory byte sink.
//!
//! [`GrowableSink`] accumulates encoder output written at arbitrary
//! offsets without knowing the final size in advance. [`WriteAt`] is the
//! hook an open session hands to the compression backend — the only
//! callback the core implements for it.

use alloc::vec::Vec;

/// Capacity floor for the first growth (64 KiB).
const INITIAL_CAPACITY: usize = 64 * 1024;

/// Errors from sink writes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SinkError {
    #[error("write offset arithmetic overflowed")]
    OffsetOverflow,

    #[error("sink allocation of {needed} bytes failed")]
    OutOfMemory { needed: usize },

    #[error("sink would grow to {needed} bytes, limit is {limit}")]
    LimitExceeded { needed: u64, limit: u64 },
}

/// Destination for encoded bytes, addressed by absolute offset.
///
/// The Rust rendition of a C-style stream write callback
/// `(context, user_data, buffer, length, offset) -> bytes_written`.
/// Writes may arrive out of order and may overlap previously written
/// ranges; later writes win.
pub trait WriteAt {
    /// Write `buf` at `offset`, returning the number of bytes written.
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize, SinkError>;
}

/// Append/overwrite-at-offset memory buffer with geometric growth.
///
/// Capacity grows by doubling from a 64 KiB floor, dropping to the exact
/// requirement if doubling would overflow, so repeated appends stay
/// amortized linear. `len()` is the high-water mark of bytes written.
/// Gaps left by sparse writes read back as zero.
#[derive(Debug, Default)]
pub struct GrowableSink {
    data: Vec<u8>,
    max_bytes: Option<u64>,
}

impl GrowableSink {
    /// Create an empty sink with no byte budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sink that refuses to grow past `max_bytes`.
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            data: Vec::new(),
            max_bytes: Some(max_bytes),
        }
    }

    /// High-water mark of bytes written.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Currently reserved capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Borrow the accumulated bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the sink, returning an exact-size buffer of the
    /// accumulated bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.shrink_to_fit();
        self.data
    }

    /// Grow storage so bytes `..need` are addressable, doubling capacity
    /// until it suffices.
    fn grow_to(&mut self, need: usize) -> Result<(), SinkError> {
        if let Some(limit) = self.max_bytes {
            if need as u64 > limit {
                return Err(SinkError::LimitExceeded {
                    needed: need as u64,
                    limit,
                });
            }
        }
        if need > self.data.capacity() {
            let mut cap = self.data.capacity().max(INITIAL_CAPACITY);
            while cap < need {
                match cap.checked_mul(2) {
                    Some(next) => cap = next,
                    None => {
                        cap = need;
                        break;
                    }
                }
            }
            self.data
                .try_reserve_exact(cap - self.data.len())
                .map_err(|_| SinkError::OutOfMemory { needed: cap })?;
        }
        // New bytes up to the write position read back as zero.
        self.data.resize(need, 0);
        Ok(())
    }
}

impl WriteAt for GrowableSink {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize, SinkError> {
        let offset = usize::try_from(offset).map_err(|_| SinkError::OffsetOverflow)?;
        let end = offset
            .checked_add(buf.len())
            .ok_or(SinkError::OffsetOverflow)?;
        if end > self.data.len() {
            self.grow_to(end)?;
        }
        self.data[offset..end].copy_from_slice(buf);
        Ok(buf.len())
    }
}
