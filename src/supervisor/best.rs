//! Best-so-far tracking for the coordinator

use crate::coloring::ConflictReport;

/// The report with the fewest conflicting edges seen so far.
///
/// Empty reports are never stored: they end the search instead.
#[derive(Debug, Clone, Default)]
pub struct BestSolution {
    best: Option<ConflictReport>,
}

impl BestSolution {
    /// Keep `report` if it has conflicts and strictly fewer than the current
    /// best. Returns true if it became the new best.
    pub fn offer(&mut self, report: &ConflictReport) -> bool {
        if report.is_empty() {
            return false;
        }
        match &self.best {
            Some(current) if report.count() >= current.count() => false,
            _ => {
                self.best = Some(report.clone());
                true
            }
        }
    }

    /// Conflict count of the best report (None if nothing was recorded).
    #[cfg(test)]
    pub(crate) fn count(&self) -> Option<usize> {
        self.best.as_ref().map(ConflictReport::count)
    }

    pub fn report(&self) -> Option<&ConflictReport> {
        self.best.as_ref()
    }
}
