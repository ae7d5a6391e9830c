//! Aggregate result types returned by batch and task bodies.

use serde::{Deserialize, Serialize};

/// Aggregate outcome of a batch recheck run.
///
/// Callers receive counts only, never a list of per-domain errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecheckSummary {
    /// Domains resolved and written back successfully.
    pub updated: usize,
    /// Domains whose resolution failed (their `last_check` is still updated).
    pub failed: usize,
}

impl RecheckSummary {
    /// Total domains accounted for in this run.
    #[must_use]
    pub const fn total(self) -> usize {
        self.updated + self.failed
    }
}

/// Typed outcome of a notification task body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyOutcome {
    /// Messages handed to delivery successfully.
    pub sent: usize,
    /// Messages that failed delivery (picked up by the hourly retry sweep).
    pub failed: usize,
}

/// Reporting period of a summary sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Daily,
    Weekly,
}
