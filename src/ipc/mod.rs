//! Inter-process channel between the supervisor and its generators
//!
//! # Architecture
//!
//! - [`layout`]: the `#[repr(C)]` shared memory layout and fixed-width records
//! - [`shm`] / [`semaphore`]: RAII handles for the named OS objects
//! - [`channel`]: the circular buffer itself, with no synchronization
//! - [`sync`]: the free/used/mutex semaphores
//! - [`producer`] / [`consumer`]: the two halves of the blocking protocol
//!
//! The supervisor creates everything through [`ConsumerLink::create`] and
//! removes it when the link is dropped; generators attach through
//! [`ProducerLink::attach`] and only detach.

pub mod channel;
pub mod consumer;
pub mod layout;
pub mod producer;
pub mod semaphore;
pub mod shm;
pub mod sync;

pub use channel::{ChannelState, ReadCursor, SharedChannel};
pub use consumer::{ConsumerLink, Delivery};
pub use layout::{Record, BUF_LEN, MAX_LINE, RECORD_CAPACITY};
pub use producer::{ProducerLink, PublishOutcome};
pub use semaphore::{NamedSemaphore, WaitOutcome};
pub use sync::SyncTriple;
