//! The analyze command: run the pipeline over one report.

use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::state::RunState;
use attestor_domain::AggregateRecord;
use attestor_oracle::OllamaOracle;
use attestor_pipeline::{CancelToken, Pipeline, PipelineConfig, ProgressFn, RunOptions};
use std::fs;
use std::sync::Arc;
use std::time::Instant;

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, formatter: &Formatter) -> Result<()> {
    let state = RunState::Idle;
    let config = load_config(&args)?;

    // The upstream text extractor either produced text or the whole run is
    // fatal: no excerpts, error set.
    let document = match read_document(&args) {
        Ok(text) => text,
        Err(reason) => {
            let state = state.advance(RunState::Failed)?;
            let aggregate = AggregateRecord::document_unreadable(&reason);
            println!("{}", formatter.format_aggregate(&aggregate)?);
            eprintln!("{}", formatter.error(&format!("run {:?}: {}", state, reason)));
            return Ok(());
        }
    };

    let oracle = OllamaOracle::new(&args.endpoint, &args.model);
    let pipeline = Pipeline::new(oracle, config).map_err(|e| CliError::Config(e.to_string()))?;

    let state = state.advance(RunState::Running)?;
    eprintln!(
        "{}",
        formatter.info(&format!(
            "analyzing {} with model {}",
            args.file.display(),
            args.model
        ))
    );

    // Ctrl-C requests cancellation; in-flight oracle calls are allowed to
    // finish and undispatched excerpts resolve as failures.
    let cancel = CancelToken::new();
    let stop_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("stop requested; letting in-flight excerpts finish");
            stop_token.cancel();
        }
    });

    let progress: ProgressFn = Arc::new(|done, total| {
        eprintln!("analyzed excerpt {}/{}", done, total);
    });

    let started = Instant::now();
    let aggregate = pipeline
        .run_with(
            &document,
            RunOptions {
                progress: Some(progress),
                cancel,
                ledger: None,
            },
        )
        .await;
    let elapsed = started.elapsed();

    let state = state.advance(if aggregate.is_total_failure() {
        RunState::Failed
    } else {
        RunState::Completed
    })?;

    println!("{}", formatter.format_aggregate(&aggregate)?);

    let (minutes, seconds) = (elapsed.as_secs() / 60, elapsed.as_secs() % 60);
    let summary = format!("run {:?} in {} min {} sec", state, minutes, seconds);
    match state {
        RunState::Completed => eprintln!("{}", formatter.success(&summary)),
        _ => eprintln!("{}", formatter.error(&summary)),
    }

    Ok(())
}

/// Load the pipeline configuration, applying CLI overrides on top.
fn load_config(args: &AnalyzeArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            PipelineConfig::from_toml(&raw).map_err(CliError::Config)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(size) = args.max_excerpt_size {
        config.max_excerpt_size = size;
    }
    if let Some(overlap) = args.overlap {
        config.overlap = overlap;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    Ok(config)
}

/// Read the already-extracted report text.
///
/// An unreadable or empty file is the upstream collaborator's typed
/// failure, not an I/O error of ours.
fn read_document(args: &AnalyzeArgs) -> std::result::Result<String, String> {
    let text = fs::read_to_string(&args.file)
        .map_err(|e| format!("{}: {}", args.file.display(), e))?;
    if text.trim().is_empty() {
        return Err(format!(
            "{}: document produced no text",
            args.file.display()
        ));
    }
    Ok(text)
}
