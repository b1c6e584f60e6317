//! Shared memory layout and fixed-width records

use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicU32};

use crate::error::{Error, Result};

/// Number of slots in the circular buffer.
pub const BUF_LEN: usize = 64;

/// Width of one slot in bytes, including the NUL terminator.
pub const MAX_LINE: usize = 50;

/// Longest text a record can carry.
pub const RECORD_CAPACITY: usize = MAX_LINE - 1;

/// Layout of the shared memory object.
///
/// `state` is written only by the supervisor; `write_pos` only by a generator
/// holding the write mutex. Slot contents are ordered by the semaphores.
#[repr(C)]
pub struct SharedLayout {
    pub state: AtomicI32,
    pub write_pos: AtomicU32,
    pub slots: [[u8; MAX_LINE]; BUF_LEN],
}

/// Size of the shared memory object in bytes.
pub const fn shm_size() -> usize {
    std::mem::size_of::<SharedLayout>()
}

/// Text that fits in one slot: at most `RECORD_CAPACITY` bytes, no NUL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(String);

impl Record {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.len() > RECORD_CAPACITY || text.contains('\0') {
            return Err(Error::RecordTooLong { len: text.len() });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn into_string(self) -> String {
        self.0
    }

    /// Copy into a slot, zero-filling the remainder.
    pub(crate) fn encode(&self, slot: &mut [u8; MAX_LINE]) {
        let bytes = self.0.as_bytes();
        slot[..bytes.len()].copy_from_slice(bytes);
        slot[bytes.len()..].fill(0);
    }

    /// Read the text up to the first NUL (or the whole slot).
    pub(crate) fn decode(slot: &[u8; MAX_LINE]) -> Self {
        let end = slot.iter().position(|&b| b == 0).unwrap_or(RECORD_CAPACITY);
        Self(String::from_utf8_lossy(&slot[..end]).into_owned())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
