//! Graph input parsing
//!
//! A graph is given as a list of `U-V` edge tokens, one per command-line
//! argument. Node identifiers may be sparse; every distinct identifier is
//! given a dense index in order of first appearance, so the per-node state
//! of a coloring attempt only grows with the number of nodes actually used.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// An undirected edge, remembering the token it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub u: u32,
    pub v: u32,
    token: String,
}

impl Edge {
    /// The edge exactly as it was written on the command line.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Parse a node identifier: a non-empty run of ASCII digits.
fn parse_node(token: &str, s: &str, side: &str) -> Result<u32> {
    if s.is_empty() {
        return Err(Error::invalid_edge(token, format!("missing {} node", side)));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_edge(
            token,
            format!("{} node '{}' is not a non-negative integer", side, s),
        ));
    }
    s.parse::<u32>()
        .map_err(|e| Error::invalid_edge(token, format!("{} node '{}': {}", side, s, e)))
}

/// Parse one edge of the form `U-V`.
pub fn parse_edge(token: &str) -> Result<Edge> {
    let (u, v) = token
        .split_once('-')
        .ok_or_else(|| Error::invalid_edge(token, "expected the form U-V"))?;

    Ok(Edge {
        u: parse_node(token, u, "first")?,
        v: parse_node(token, v, "second")?,
        token: token.to_string(),
    })
}

/// An immutable edge list plus the dense index of each endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    edges: Vec<Edge>,
    endpoints: Vec<(usize, usize)>,
    node_count: usize,
}

impl Graph {
    pub fn new(edges: Vec<Edge>) -> Self {
        let mut index: HashMap<u32, usize> = HashMap::new();
        let mut dense = |id: u32| {
            let next = index.len();
            *index.entry(id).or_insert(next)
        };
        let endpoints = edges.iter().map(|e| (dense(e.u), dense(e.v))).collect();

        Self {
            edges,
            endpoints,
            node_count: index.len(),
        }
    }

    /// Parse every token, stopping at the first malformed one.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let edges = tokens
            .iter()
            .map(|t| parse_edge(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(edges))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Dense `(u, v)` indices, parallel to [`Graph::edges`].
    pub fn endpoints(&self) -> &[(usize, usize)] {
        &self.endpoints
    }

    /// Number of distinct node identifiers.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
