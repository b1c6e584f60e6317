//! Producer loop
//!
//! A generator attaches to the supervisor's channel, then repeatedly colors
//! the graph at random and publishes every attempt whose conflict list fits
//! in a record, until the supervisor announces the stop.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::coloring::{Attempt, ColorSource, ColoringEngine};
use crate::config::{ChannelConfig, GeneratorConfig};
use crate::error::Result;
use crate::graph::Graph;
use crate::ipc::{ProducerLink, PublishOutcome, Record};

/// Lifecycle of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Attaching,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorStatistics {
    /// Coloring attempts made
    pub attempts: u64,
    /// Attempts whose report did not fit in a record
    pub discarded: u64,
    /// Records written to the channel
    pub published: u64,
}

/// RNG for the generator running as `pid`: seeded from the config if a base
/// seed is set, otherwise from OS entropy.
pub fn seeded_rng(config: &GeneratorConfig, pid: u32) -> ChaCha8Rng {
    match config.seed_for(pid) {
        Some(seed) => {
            tracing::debug!("using seed {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_os_rng(),
    }
}

pub struct Generator<'g, S: ColorSource> {
    engine: ColoringEngine<'g>,
    source: S,
    link: ProducerLink,
    state: GeneratorState,
    statistics: GeneratorStatistics,
}

impl<'g, S: ColorSource> Generator<'g, S> {
    /// Attach to the channel described by `config`. Fails if no supervisor
    /// has created it.
    pub fn attach(config: &ChannelConfig, graph: &'g Graph, source: S) -> Result<Self> {
        tracing::debug!("generator state: {:?}", GeneratorState::Attaching);
        let link = ProducerLink::attach(config)?;
        tracing::debug!(
            "attached to {} ({} edges, {} nodes)",
            config.shm_name,
            graph.edges().len(),
            graph.node_count()
        );
        Ok(Self {
            engine: ColoringEngine::new(graph),
            source,
            link,
            state: GeneratorState::Running,
            statistics: GeneratorStatistics::default(),
        })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> GeneratorState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn statistics(&self) -> &GeneratorStatistics {
        &self.statistics
    }

    /// Run one attempt and publish it if it fits. Returns `None` for a
    /// discarded attempt.
    pub fn step(&mut self) -> Result<Option<PublishOutcome>> {
        self.statistics.attempts += 1;

        let report = match self.engine.attempt(&mut self.source) {
            Attempt::Report(report) => report,
            Attempt::Discarded => {
                self.statistics.discarded += 1;
                return Ok(None);
            }
        };

        let record = Record::new(report.as_str())?;
        let outcome = self.link.publish(&record)?;
        match outcome {
            PublishOutcome::Published { slot } => {
                self.statistics.published += 1;
                tracing::debug!("slot {}: '{}'", slot, record);
            }
            PublishOutcome::Stopped => {
                tracing::debug!(
                    "generator state: {:?} -> {:?}",
                    self.state,
                    GeneratorState::Stopped
                );
                self.state = GeneratorState::Stopped;
            }
        }
        Ok(Some(outcome))
    }

    /// Generate and publish until the supervisor announces the stop.
    pub fn run(&mut self) -> Result<GeneratorStatistics> {
        while self.state == GeneratorState::Running {
            self.step()?;
        }

        tracing::info!(
            "generator stopped: {} attempts, {} discarded, {} published",
            self.statistics.attempts,
            self.statistics.discarded,
            self.statistics.published
        );
        Ok(self.statistics.clone())
    }
}
