//! Attestor Pipeline
//!
//! Turns the extracted text of a long audit report into one structured
//! summary by delegating semantic extraction to an external
//! text-understanding oracle, one bounded-size excerpt at a time.
//!
//! # Architecture
//!
//! ```text
//! Text → Segmenter → Dispatcher (bounded fan-out to Oracle Adapter calls)
//!      → Reducer → AggregateRecord
//! ```
//!
//! The ledger observes the dispatcher without participating in merge logic.
//! Data flows strictly one way; the pipeline keeps no state between runs.
//!
//! # Key Properties
//!
//! - **Deterministic segmentation**: identical input and parameters yield
//!   identical overlapping excerpts
//! - **Failure isolation**: one excerpt's oracle failure never aborts or
//!   blocks the others; it is counted and reported in the aggregate
//! - **Defensive parsing**: oracle replies are stripped and parsed with a
//!   strict JSON parser, never evaluated as code
//! - **Order-independent merge** for set-like fields, first-wins in excerpt
//!   order for scalar fields
//!
//! # Example Usage
//!
//! ```no_run
//! use attestor_pipeline::{Pipeline, PipelineConfig};
//! use attestor_oracle::OllamaOracle;
//!
//! # async fn example() {
//! let oracle = OllamaOracle::default_endpoint("llama3");
//! let pipeline = Pipeline::new(oracle, PipelineConfig::default()).unwrap();
//!
//! let aggregate = pipeline.run("...report text...").await;
//!
//! println!("auditor: {}", aggregate.auditor);
//! println!(
//!     "{} of {} excerpts failed",
//!     aggregate.failed_excerpts, aggregate.total_excerpts
//! );
//! # }
//! ```

#![warn(missing_docs)]

mod adapter;
mod config;
mod dispatcher;
mod error;
mod parser;
mod pipeline;
mod progress;
mod prompt;
mod reducer;
mod segmenter;

#[cfg(test)]
mod tests;

pub use adapter::OracleAdapter;
pub use config::PipelineConfig;
pub use dispatcher::{dispatch, CancelToken, ProgressFn};
pub use error::{ParseError, PipelineError};
pub use parser::parse_oracle_response;
pub use pipeline::{Pipeline, RunOptions};
pub use progress::{ProgressLedger, ProgressSnapshot};
pub use prompt::{ExtractionPrompt, PROMPT_VERSION};
pub use reducer::reduce;
pub use segmenter::{reassemble, segment};
