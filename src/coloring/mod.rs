//! Randomized 3-coloring attempts
//!
//! Each attempt walks the edges in input order, lazily assigning a random
//! color to every endpoint that has none yet, and collects the edges whose
//! endpoints ended up with the same color. Attempts are independent: the
//! color array is cleared before every run.

pub mod report;

pub use report::ConflictReport;

use rand::Rng;

use crate::graph::Graph;
use crate::ipc::layout::RECORD_CAPACITY;

/// One of the three colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];
}

/// Source of color draws for the engine.
///
/// Every `rand::Rng` is a color source drawing uniformly from the three
/// colors; tests substitute scripted sequences.
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

impl<R: Rng + ?Sized> ColorSource for R {
    fn next_color(&mut self) -> Color {
        Color::ALL[self.random_range(0..Color::ALL.len())]
    }
}

/// Result of a single coloring attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// The attempt finished; the report may be empty (a valid coloring).
    Report(ConflictReport),
    /// The conflict list would not fit in one channel record.
    Discarded,
}

/// Per-graph coloring engine holding a reusable color array.
pub struct ColoringEngine<'g> {
    graph: &'g Graph,
    colors: Vec<Option<Color>>,
    max_len: usize,
}

impl<'g> ColoringEngine<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_max_len(graph, RECORD_CAPACITY)
    }

    /// Engine whose reports are limited to `max_len` bytes.
    pub fn with_max_len(graph: &'g Graph, max_len: usize) -> Self {
        Self {
            graph,
            colors: vec![None; graph.node_count()],
            max_len,
        }
    }

    /// Colors assigned by the most recent attempt, by dense node index
    /// (`None` = never touched).
    #[cfg(test)]
    pub(crate) fn colors(&self) -> &[Option<Color>] {
        &self.colors
    }

    /// Run one attempt.
    pub fn attempt<S: ColorSource + ?Sized>(&mut self, source: &mut S) -> Attempt {
        self.colors.fill(None);
        let mut text = String::with_capacity(self.max_len);
        let mut count = 0;

        for (edge, &(u, v)) in self.graph.edges().iter().zip(self.graph.endpoints()) {
            let u = *self.colors[u].get_or_insert_with(|| source.next_color());
            let v = *self.colors[v].get_or_insert_with(|| source.next_color());

            if u != v {
                continue;
            }

            let separator = usize::from(!text.is_empty());
            if text.len() + separator + edge.token().len() > self.max_len {
                return Attempt::Discarded;
            }
            if separator == 1 {
                text.push(' ');
            }
            text.push_str(edge.token());
            count += 1;
        }

        Attempt::Report(ConflictReport::from_parts(text, count))
    }
}
