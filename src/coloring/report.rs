//! Conflict reports: the payload carried through the shared channel

use std::fmt;

/// Space-separated list of conflicting edges from one coloring attempt.
///
/// An empty report means the attempt produced a valid 3-coloring.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConflictReport {
    text: String,
    count: usize,
}

impl ConflictReport {
    pub(crate) fn from_parts(text: String, count: usize) -> Self {
        Self { text, count }
    }

    /// Rebuild a report from record text, counting its edge tokens.
    pub fn parse(text: &str) -> Self {
        let count = text.split(' ').filter(|t| !t.is_empty()).count();
        Self {
            text: text.to_string(),
            count,
        }
    }

    /// Number of conflicting edges.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
