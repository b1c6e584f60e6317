//! Writer side of the channel protocol
//!
//! A publish takes the write mutex, checks the termination flag, and only
//! then waits for a free slot. A generator therefore never blocks on a full
//! buffer after it has seen the stop request: it either observes the flag
//! under the mutex and leaves, or it was already past the check and is woken
//! by the supervisor's extra `free` post. A woken publisher checks the flag
//! again and hands the slot back instead of writing.

use crate::config::ChannelConfig;
use crate::error::Result;
use crate::ipc::channel::{ChannelState, SharedChannel};
use crate::ipc::layout::Record;
use crate::ipc::sync::SyncTriple;

/// Result of one publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The record was stored in `slot`.
    Published { slot: usize },
    /// The supervisor asked generators to stop; nothing was written.
    Stopped,
}

/// A generator's attachment to the channel. Dropping it detaches without
/// destroying anything.
pub struct ProducerLink {
    channel: SharedChannel,
    sync: SyncTriple,
}

impl ProducerLink {
    /// Attach to the resources created by a running supervisor.
    pub fn attach(config: &ChannelConfig) -> Result<Self> {
        let channel = SharedChannel::open(&config.shm_name)?;
        let sync = SyncTriple::open(config)?;
        Ok(Self { channel, sync })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> ChannelState {
        self.channel.state()
    }

    /// Publish one record, blocking while the buffer is full.
    pub fn publish(&self, record: &Record) -> Result<PublishOutcome> {
        self.sync.mutex.acquire()?;

        let outcome = self.publish_locked(record);
        let released = self.sync.mutex.post();

        let outcome = outcome?;
        released?;
        Ok(outcome)
    }

    fn publish_locked(&self, record: &Record) -> Result<PublishOutcome> {
        if self.channel.state() != ChannelState::Running {
            return Ok(PublishOutcome::Stopped);
        }

        self.sync.free.acquire()?;
        // Woken by the stop announcement rather than a consumed record
        if self.channel.state() != ChannelState::Running {
            self.sync.free.post()?;
            return Ok(PublishOutcome::Stopped);
        }
        let slot = self.channel.write(record);
        self.sync.used.post()?;
        Ok(PublishOutcome::Published { slot })
    }
}
