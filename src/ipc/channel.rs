//! Circular buffer of records in shared memory
//!
//! The channel itself does no blocking or locking. Callers must follow the
//! semaphore protocol in [`crate::ipc::sync`]: writes happen only while
//! holding the write mutex and a free slot, reads only while holding a used
//! slot.

use std::ptr;
use std::sync::atomic::Ordering;

use crate::error::Result;
use crate::ipc::layout::{shm_size, Record, SharedLayout, BUF_LEN, MAX_LINE};
use crate::ipc::shm::SharedRegion;

/// Value of the shared termination flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Running,
    Stopping,
}

impl ChannelState {
    pub fn from_raw(raw: i32) -> Self {
        if raw == 0 {
            ChannelState::Running
        } else {
            ChannelState::Stopping
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            ChannelState::Running => 0,
            ChannelState::Stopping => 1,
        }
    }
}

/// Read position, private to the single consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCursor(usize);

impl ReadCursor {
    #[cfg(test)]
    pub(crate) fn position(&self) -> usize {
        self.0
    }
}

/// The ring buffer mapped from a [`SharedRegion`].
pub struct SharedChannel {
    region: SharedRegion,
}

impl SharedChannel {
    /// Create the backing object exclusively.
    pub fn create(name: &str) -> Result<Self> {
        Ok(Self {
            region: SharedRegion::create(name, shm_size())?,
        })
    }

    /// Attach to an existing backing object.
    pub fn open(name: &str) -> Result<Self> {
        Ok(Self {
            region: SharedRegion::open(name, shm_size())?,
        })
    }

    fn layout(&self) -> *mut SharedLayout {
        self.region.as_ptr().cast()
    }

    fn shared(&self) -> &SharedLayout {
        // SAFETY: the region is at least shm_size() bytes and page aligned.
        // Only the atomic fields are accessed through this reference.
        unsafe { &*self.layout() }
    }

    pub fn name(&self) -> &str {
        self.region.name()
    }

    pub fn state(&self) -> ChannelState {
        ChannelState::from_raw(self.shared().state.load(Ordering::SeqCst))
    }

    pub fn set_state(&self, state: ChannelState) {
        self.shared().state.store(state.as_raw(), Ordering::SeqCst);
    }

    pub fn write_position(&self) -> usize {
        self.shared().write_pos.load(Ordering::Relaxed) as usize
    }

    /// Reset the flag to running and the write cursor to slot 0.
    pub fn reset(&self) {
        self.set_state(ChannelState::Running);
        self.shared().write_pos.store(0, Ordering::Relaxed);
    }

    /// Store `record` at the write cursor and advance it. Returns the slot.
    pub fn write(&self, record: &Record) -> usize {
        let pos = self.write_position() % BUF_LEN;
        // SAFETY: pos < BUF_LEN; the caller holds a free slot and the write
        // mutex, so no other process touches this slot.
        unsafe {
            let slot: *mut [u8; MAX_LINE] = ptr::addr_of_mut!((*self.layout()).slots[pos]);
            record.encode(&mut *slot);
        }
        self.shared()
            .write_pos
            .store(((pos + 1) % BUF_LEN) as u32, Ordering::Relaxed);
        pos
    }

    /// Copy the record at `cursor` out and advance the cursor.
    pub fn read(&self, cursor: &mut ReadCursor) -> Record {
        let pos = cursor.0 % BUF_LEN;
        // SAFETY: pos < BUF_LEN; the caller holds a used slot, so the writer
        // of this slot has finished and no writer reuses it until released.
        let record = unsafe {
            let slot: *const [u8; MAX_LINE] = ptr::addr_of!((*self.layout()).slots[pos]);
            Record::decode(&*slot)
        };
        cursor.0 = (pos + 1) % BUF_LEN;
        record
    }
}
