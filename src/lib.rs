//! threecol - randomized 3-coloring search across cooperating processes
//!
//! One supervisor process creates a POSIX shared-memory ring buffer guarded
//! by three named semaphores. Any number of generator processes attach to
//! it, color the input graph at random, and publish the list of conflicting
//! edges of each attempt. The supervisor prints every strict improvement and
//! stops all generators once a conflict-free coloring arrives or it receives
//! SIGINT/SIGTERM.

pub mod coloring;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod ipc;
pub mod logging;
pub mod signals;
pub mod supervisor;

pub use error::{Error, Result};
