//! Per-excerpt extraction outcomes

use crate::record::PartialRecord;

/// The result of one oracle adapter call for one excerpt.
///
/// Exactly one outcome exists per excerpt after dispatch completes. A
/// failure carries the excerpt index it belongs to so the reducer can report
/// it by position even though the reasons travel separately from the
/// excerpts themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The oracle produced a parseable structured record
    Success(PartialRecord),

    /// The call or its response handling failed; the excerpt contributes
    /// nothing to the aggregate
    Failure {
        /// 0-based index of the excerpt this outcome belongs to
        index: usize,
        /// Human-readable failure classification
        reason: String,
    },
}

impl ExtractionOutcome {
    /// True for the `Failure` variant.
    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractionOutcome::Failure { .. })
    }

    /// The partial record, if this outcome is a success.
    pub fn record(&self) -> Option<&PartialRecord> {
        match self {
            ExtractionOutcome::Success(record) => Some(record),
            ExtractionOutcome::Failure { .. } => None,
        }
    }
}
