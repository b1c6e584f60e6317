//! Error types shared by the supervisor and generator processes

use std::io;
use thiserror::Error;

use crate::ipc::layout::MAX_LINE;

/// Errors raised while parsing input or driving the shared channel.
#[derive(Debug, Error)]
pub enum Error {
    /// An edge argument did not have the form `U-V`.
    #[error("failed to parse edge '{token}': {reason}")]
    InvalidEdge { token: String, reason: String },

    /// Creating, attaching or mapping a named resource failed.
    #[error("{op} failed for {name}: {source}")]
    Resource {
        op: &'static str,
        name: String,
        #[source]
        source: io::Error,
    },

    /// A semaphore wait or post failed for a reason other than interruption.
    #[error("{op} failed on {name}: {source}")]
    Sync {
        op: &'static str,
        name: String,
        #[source]
        source: io::Error,
    },

    /// A record does not fit into a channel slot.
    #[error("record of {len} bytes does not fit in a {max}-byte slot", max = MAX_LINE)]
    RecordTooLong { len: usize },

    /// Writing coordination output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    pub(crate) fn resource(op: &'static str, name: &str, source: impl Into<io::Error>) -> Self {
        Error::Resource {
            op,
            name: name.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn sync(op: &'static str, name: &str, source: io::Error) -> Self {
        Error::Sync {
            op,
            name: name.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_edge(token: &str, reason: impl Into<String>) -> Self {
        Error::InvalidEdge {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
