//! The pipeline entry point: segment, dispatch, reduce

use crate::adapter::OracleAdapter;
use crate::config::PipelineConfig;
use crate::dispatcher::{dispatch, CancelToken, ProgressFn};
use crate::error::PipelineError;
use crate::progress::ProgressLedger;
use crate::reducer::reduce;
use crate::segmenter::segment;
use attestor_domain::{AggregateRecord, Oracle};
use std::sync::Arc;
use tracing::info;

/// Optional knobs for a single run.
#[derive(Default, Clone)]
pub struct RunOptions {
    /// Invoked with `(completed_count, total_count)` after each excerpt
    /// resolves
    pub progress: Option<ProgressFn>,

    /// Cooperative early-termination flag
    pub cancel: CancelToken,

    /// Caller-owned ledger to observe during the run; the pipeline resets
    /// it when the run starts
    pub ledger: Option<Arc<ProgressLedger>>,
}

/// The document summarization pipeline.
///
/// Stateless between invocations: each run segments the document, fans the
/// excerpts out to the oracle, and reduces the outcomes. Nothing is
/// retained once [`Pipeline::run`] returns.
pub struct Pipeline<O> {
    oracle: Arc<O>,
    config: PipelineConfig,
}

impl<O> Pipeline<O>
where
    O: Oracle + 'static,
    O::Error: std::fmt::Display,
{
    /// Create a pipeline over an oracle.
    ///
    /// The configuration is validated here so the run methods are
    /// infallible: every later problem is per-excerpt data, not an error.
    pub fn new(oracle: O, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            oracle: Arc::new(oracle),
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline over a document with default options.
    pub async fn run(&self, document_text: &str) -> AggregateRecord {
        self.run_with(document_text, RunOptions::default()).await
    }

    /// Run the pipeline over a document.
    ///
    /// An empty document yields an empty aggregate with zero excerpts; a
    /// document the upstream text extractor could not read never reaches
    /// this method (see [`AggregateRecord::document_unreadable`]).
    pub async fn run_with(&self, document_text: &str, options: RunOptions) -> AggregateRecord {
        let excerpts = segment(
            document_text,
            self.config.max_excerpt_size,
            self.config.overlap,
        );

        info!(
            excerpts = excerpts.len(),
            chars = document_text.chars().count(),
            concurrency = self.config.concurrency,
            "starting extraction run"
        );

        let ledger = match options.ledger {
            Some(ledger) => {
                ledger.begin(excerpts.len());
                ledger
            }
            None => Arc::new(ProgressLedger::new(excerpts.len())),
        };

        let adapter = Arc::new(OracleAdapter::new(Arc::clone(&self.oracle), &self.config));

        let outcomes = dispatch(
            adapter,
            excerpts,
            self.config.concurrency,
            ledger,
            options.cancel,
            options.progress,
        )
        .await;

        let aggregate = reduce(outcomes);

        info!(
            total = aggregate.total_excerpts,
            failed = aggregate.failed_excerpts,
            "extraction run complete"
        );

        aggregate
    }
}
