//! Per-excerpt structured extraction results

/// One control exception reported by the auditor, with the management
/// response attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionEntry {
    /// Control identifier (e.g., "CC6.1")
    pub control: String,

    /// Description of the exception the auditor noted
    pub exception: String,

    /// Management's response to the exception
    pub response: String,
}

/// Fixed-key tally of control test statuses.
///
/// The three keys are fixed by the report format; an excerpt that mentions
/// none of them contributes all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Controls that passed testing
    pub passed: u64,

    /// Controls that passed with a noted exception
    pub passed_with_exception: u64,

    /// Controls excluded from testing
    pub excluded: u64,
}

impl StatusCounts {
    /// Add another tally into this one, elementwise.
    pub fn merge(&mut self, other: &StatusCounts) {
        self.passed = self.passed.saturating_add(other.passed);
        self.passed_with_exception = self
            .passed_with_exception
            .saturating_add(other.passed_with_exception);
        self.excluded = self.excluded.saturating_add(other.excluded);
    }

    /// Total controls counted across all three statuses.
    pub fn total(&self) -> u64 {
        self.passed + self.passed_with_exception + self.excluded
    }
}

/// The structured data one excerpt yields.
///
/// Every field defaults to empty/zero: an oracle reply that omits a field is
/// treated as having found nothing for it, which is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord {
    /// Auditor name and firm
    pub auditor: String,

    /// Audit time period covered by the report
    pub time_period: String,

    /// Report scope
    pub scope: String,

    /// Control exceptions found in this excerpt
    pub exceptions: Vec<ExceptionEntry>,

    /// Free-text tags (control areas, themes)
    pub tags: Vec<String>,

    /// System description bullets
    pub system_description: Vec<String>,

    /// Control status tally for this excerpt
    pub status_counts: StatusCounts,
}

impl PartialRecord {
    /// True when the excerpt yielded nothing at all.
    pub fn is_empty(&self) -> bool {
        self.auditor.is_empty()
            && self.time_period.is_empty()
            && self.scope.is_empty()
            && self.exceptions.is_empty()
            && self.tags.is_empty()
            && self.system_description.is_empty()
            && self.status_counts == StatusCounts::default()
    }
}
