//! Error types for the pipeline

use thiserror::Error;

/// Errors that can abort a run before it starts.
///
/// Per-excerpt problems (oracle failures, malformed replies, cancellation)
/// are never errors at this level — they travel as
/// `ExtractionOutcome::Failure` values and end up tallied in the aggregate.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid pipeline configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from parsing an oracle reply into a partial record.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The reply contains no `{` at all
    #[error("no JSON object found in response")]
    MissingObject,

    /// The candidate object is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(String),

    /// A field is present but has the wrong shape
    #[error("field '{field}' {problem}")]
    Field {
        /// Name of the offending field
        field: String,
        /// What was wrong with it
        problem: String,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Json(e.to_string())
    }
}
