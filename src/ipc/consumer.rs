//! Reader side of the channel protocol and resource ownership

use std::time::Duration;

use crate::config::ChannelConfig;
use crate::error::Result;
use crate::ipc::channel::{ChannelState, ReadCursor, SharedChannel};
use crate::ipc::layout::Record;
use crate::ipc::semaphore::WaitOutcome;
use crate::ipc::sync::SyncTriple;

/// Result of waiting for the next record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Record(Record),
    /// A signal interrupted the wait; nothing was consumed.
    Interrupted,
}

/// The supervisor's side of the channel.
///
/// Owns every named resource: they are created together in
/// [`ConsumerLink::create`] and unlinked when the link is dropped.
pub struct ConsumerLink {
    channel: SharedChannel,
    sync: SyncTriple,
    cursor: ReadCursor,
}

impl ConsumerLink {
    /// Create the shared memory and semaphores exclusively and initialize
    /// the flag and write cursor.
    pub fn create(config: &ChannelConfig) -> Result<Self> {
        let channel = SharedChannel::create(&config.shm_name)?;
        let sync = SyncTriple::create(config)?;

        sync.mutex.acquire()?;
        channel.reset();
        sync.mutex.post()?;

        tracing::info!(
            "channel {} ready ({} x {} byte slots)",
            channel.name(),
            crate::ipc::layout::BUF_LEN,
            crate::ipc::layout::MAX_LINE
        );
        Ok(Self {
            channel,
            sync,
            cursor: ReadCursor::default(),
        })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> ChannelState {
        self.channel.state()
    }

    /// Snapshot of `(free, used)` semaphore counts.
    #[cfg(test)]
    pub(crate) fn counts(&self) -> Result<(i32, i32)> {
        self.sync.counts()
    }

    /// Block for the next record. An interrupted wait consumes nothing.
    #[cfg(test)]
    pub(crate) fn receive(&mut self) -> Result<Delivery> {
        let outcome = self.sync.used.wait()?;
        self.deliver(outcome)
    }

    /// Wait up to `timeout` for the next record; `None` if none arrived.
    pub fn receive_timeout(&mut self, timeout: Duration) -> Result<Option<Delivery>> {
        match self.sync.used.wait_timeout(timeout)? {
            Some(outcome) => self.deliver(outcome).map(Some),
            None => Ok(None),
        }
    }

    fn deliver(&mut self, outcome: WaitOutcome) -> Result<Delivery> {
        match outcome {
            WaitOutcome::Interrupted => Ok(Delivery::Interrupted),
            WaitOutcome::Acquired => {
                let record = self.channel.read(&mut self.cursor);
                self.sync.free.post()?;
                Ok(Delivery::Record(record))
            }
        }
    }

    /// Take the next record if one is already available.
    #[cfg(test)]
    pub(crate) fn try_receive(&mut self) -> Result<Option<Record>> {
        if !self.sync.used.try_acquire()? {
            return Ok(None);
        }
        let record = self.channel.read(&mut self.cursor);
        self.sync.free.post()?;
        Ok(Some(record))
    }

    /// Set the termination flag and wake a generator blocked on `free`.
    ///
    /// The flag is stored without taking the write mutex: a generator may be
    /// holding it while blocked on a full buffer.
    pub fn announce_stop(&self) -> Result<()> {
        self.channel.set_state(ChannelState::Stopping);
        self.sync.free.post()
    }
}
