//! The three semaphores guarding the shared channel
//!
//! - `free` counts empty slots (starts at `BUF_LEN`)
//! - `used` counts unread records (starts at 0)
//! - `mutex` serializes writers and their check of the termination flag
//!
//! At rest `free + used == BUF_LEN`.

use crate::config::ChannelConfig;
use crate::error::Result;
use crate::ipc::layout::BUF_LEN;
use crate::ipc::semaphore::NamedSemaphore;

pub struct SyncTriple {
    pub free: NamedSemaphore,
    pub used: NamedSemaphore,
    pub mutex: NamedSemaphore,
}

impl SyncTriple {
    /// Create all three semaphores exclusively.
    ///
    /// On failure, semaphores created so far are dropped and unlinked.
    pub fn create(config: &ChannelConfig) -> Result<Self> {
        let used = NamedSemaphore::create(&config.used_name, 0)?;
        let free = NamedSemaphore::create(&config.free_name, BUF_LEN as u32)?;
        let mutex = NamedSemaphore::create(&config.mutex_name, 1)?;
        Ok(Self { free, used, mutex })
    }

    /// Open all three existing semaphores.
    pub fn open(config: &ChannelConfig) -> Result<Self> {
        let used = NamedSemaphore::open(&config.used_name)?;
        let free = NamedSemaphore::open(&config.free_name)?;
        let mutex = NamedSemaphore::open(&config.mutex_name)?;
        Ok(Self { free, used, mutex })
    }

    /// Snapshot of `(free, used)` counts.
    #[cfg(test)]
    pub(crate) fn counts(&self) -> Result<(i32, i32)> {
        Ok((self.free.value()?, self.used.value()?))
    }
}
