//! Run lifecycle state machine
//!
//! The pipeline itself is stateless between invocations; whether a run has
//! started, is in progress, or finished is presentation-layer state and is
//! modeled explicitly here.

use crate::error::CliError;

/// Lifecycle of one analyze invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing started yet
    Idle,
    /// The pipeline is executing
    Running,
    /// The run finished and produced usable data (possibly partial)
    Completed,
    /// The run produced no usable data at all
    Failed,
}

impl RunState {
    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(self, next: RunState) -> Result<RunState, CliError> {
        let legal = matches!(
            (self, next),
            (RunState::Idle, RunState::Running)
                | (RunState::Running, RunState::Completed)
                | (RunState::Running, RunState::Failed)
                | (RunState::Idle, RunState::Failed)
        );

        if legal {
            Ok(next)
        } else {
            Err(CliError::State(format!("{:?} -> {:?}", self, next)))
        }
    }
}
