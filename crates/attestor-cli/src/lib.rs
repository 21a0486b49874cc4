//! Attestor CLI library.
//!
//! The thin presentation harness over the summarization pipeline: argument
//! parsing, run lifecycle state, and output formatting. The pipeline itself
//! lives in `attestor-pipeline` and stays stateless; everything
//! session-shaped is here.

pub mod analyze;
pub mod cli;
pub mod error;
pub mod output;
pub mod state;

pub use cli::{Cli, CliFormat, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use state::RunState;
