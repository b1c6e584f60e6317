//! Coordinator loop
//!
//! The supervisor owns the channel: it creates every named resource, reads
//! conflict reports until one is empty or a stop is requested, tells the
//! generators to stop, and removes the resources on the way out.

pub mod best;

pub use best::BestSolution;

use std::io::Write;
use std::time::{Duration, Instant};

use crate::coloring::ConflictReport;
use crate::config::ChannelConfig;
use crate::error::Result;
use crate::ipc::{ConsumerLink, Delivery};
use crate::signals::StopRequest;

/// Longest time a stop request can go unnoticed while no records arrive.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Initializing,
    Accepting,
    AnnouncingStop,
    Terminated,
}

/// How the coordinator loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorOutcome {
    /// A generator reported a conflict-free coloring.
    Colorable,
    /// A stop was requested; carries the best report seen so far.
    Stopped { best: Option<ConflictReport> },
}

#[derive(Debug, Clone, Default)]
pub struct SupervisorStatistics {
    /// Records consumed from the channel
    pub records_read: u64,
    /// Times the best solution improved
    pub improvements: u64,
    pub elapsed_time: Duration,
}

pub struct Supervisor {
    link: Option<ConsumerLink>,
    best: BestSolution,
    statistics: SupervisorStatistics,
    state: SupervisorState,
}

impl Supervisor {
    /// Create all named resources. Fails if any of them already exists.
    pub fn create(config: &ChannelConfig) -> Result<Self> {
        tracing::debug!("supervisor state: {:?}", SupervisorState::Initializing);
        let link = ConsumerLink::create(config)?;
        Ok(Self {
            link: Some(link),
            best: BestSolution::default(),
            statistics: SupervisorStatistics::default(),
            state: SupervisorState::Accepting,
        })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> SupervisorState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn statistics(&self) -> &SupervisorStatistics {
        &self.statistics
    }

    fn transition(&mut self, next: SupervisorState) {
        tracing::debug!("supervisor state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Consume reports until success or a stop request, then announce the
    /// stop to the generators. Improvements and success go to `out`.
    pub fn run<S, W>(&mut self, stop: &S, out: &mut W) -> Result<SupervisorOutcome>
    where
        S: StopRequest + ?Sized,
        W: Write,
    {
        let start = Instant::now();
        let outcome = self.accept(stop, out);
        self.statistics.elapsed_time += start.elapsed();

        // Generators must be released even when accepting failed
        self.transition(SupervisorState::AnnouncingStop);
        if let Some(link) = &self.link {
            link.announce_stop()?;
        }
        outcome
    }

    fn accept<S, W>(&mut self, stop: &S, out: &mut W) -> Result<SupervisorOutcome>
    where
        S: StopRequest + ?Sized,
        W: Write,
    {
        let Some(link) = self.link.as_mut() else {
            return Ok(SupervisorOutcome::Stopped { best: None });
        };

        loop {
            if stop.is_requested() {
                tracing::info!("stop requested");
                break;
            }

            let record = match link.receive_timeout(POLL_INTERVAL)? {
                None => continue,
                Some(Delivery::Record(record)) => record,
                Some(Delivery::Interrupted) => {
                    tracing::info!("wait interrupted, stopping");
                    break;
                }
            };
            self.statistics.records_read += 1;

            let report = ConflictReport::parse(record.as_str());
            if report.is_empty() {
                writeln!(out, "The graph is 3-colorable!")?;
                out.flush()?;
                return Ok(SupervisorOutcome::Colorable);
            }

            if self.best.offer(&report) {
                self.statistics.improvements += 1;
                writeln!(out, "Solution with {} edges: {}", report.count(), report)?;
                out.flush()?;
            }
        }

        Ok(SupervisorOutcome::Stopped {
            best: self.best.report().cloned(),
        })
    }

    /// Remove every named resource and return the final statistics.
    pub fn shutdown(mut self) -> SupervisorStatistics {
        self.terminate();
        std::mem::take(&mut self.statistics)
    }

    fn terminate(&mut self) {
        if self.link.take().is_some() {
            self.transition(SupervisorState::Terminated);
            tracing::info!(
                "supervisor terminated: {} records read, {} improvements",
                self.statistics.records_read,
                self.statistics.improvements
            );
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.terminate();
    }
}
