//! The whole-document summary record

use crate::record::{ExceptionEntry, StatusCounts};

/// The single output of a pipeline run.
///
/// Same shape as [`PartialRecord`](crate::record::PartialRecord) plus run
/// bookkeeping. `failed_excerpts <= total_excerpts` always holds, and
/// `error` is present exactly when at least one excerpt failed — with one
/// exception: [`AggregateRecord::document_unreadable`], the fatal
/// upstream-failure record, which sets `error` with zero excerpts because no
/// segmentation ever happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateRecord {
    /// Auditor name and firm (first non-empty value across excerpts)
    pub auditor: String,

    /// Audit time period (first non-empty value across excerpts)
    pub time_period: String,

    /// Report scope (first non-empty value across excerpts)
    pub scope: String,

    /// Every exception from every excerpt, in excerpt order, no de-duplication
    pub exceptions: Vec<ExceptionEntry>,

    /// De-duplicated union of tags across excerpts
    pub tags: Vec<String>,

    /// De-duplicated union of system description bullets
    pub system_description: Vec<String>,

    /// Elementwise sum of status tallies across successful excerpts
    pub status_counts: StatusCounts,

    /// Number of excerpts the segmenter produced, successes and failures alike
    pub total_excerpts: usize,

    /// Number of excerpts whose extraction failed
    pub failed_excerpts: usize,

    /// Newline-joined roster of per-excerpt failures, absent when none failed
    pub error: Option<String>,
}

impl AggregateRecord {
    /// The fatal record for a document the upstream text extractor could not
    /// read. No excerpts were produced, so the failure is whole-run.
    pub fn document_unreadable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(format!("document unreadable: {}", reason.into())),
            ..Default::default()
        }
    }

    /// True when the run produced no usable data at all.
    pub fn is_total_failure(&self) -> bool {
        self.error.is_some() && self.failed_excerpts == self.total_excerpts
    }
}
