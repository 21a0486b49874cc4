//! Concurrent fan-out of excerpts to the oracle
//!
//! Runs adapter calls over all excerpts under a bounded concurrency limit
//! and reassembles the outcomes into excerpt order. One excerpt's failure
//! never aborts or blocks the others; slot-by-index writes and the shared
//! progress counters are the only synchronized mutations.

use crate::adapter::OracleAdapter;
use crate::progress::ProgressLedger;
use attestor_domain::{Excerpt, ExtractionOutcome, Oracle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Cooperative cancellation flag for a run.
///
/// Cancelling lets in-flight oracle calls finish but stops new excerpts
/// from being dispatched; excerpts that never ran resolve as
/// `Failure("cancelled")` so the reducer still sees one outcome per
/// excerpt.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request early termination.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Progress callback: `(completed_count, total_count)` after each outcome
/// lands. Advisory only.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Run adapter calls over all excerpts with at most `concurrency` in
/// flight, returning one outcome per excerpt in excerpt order.
pub async fn dispatch<O>(
    adapter: Arc<OracleAdapter<O>>,
    excerpts: Vec<Excerpt>,
    concurrency: usize,
    ledger: Arc<ProgressLedger>,
    cancel: CancelToken,
    progress: Option<ProgressFn>,
) -> Vec<ExtractionOutcome>
where
    O: Oracle + 'static,
    O::Error: std::fmt::Display,
{
    let total = excerpts.len();
    if total == 0 {
        return Vec::new();
    }

    debug!(total, concurrency, "dispatching excerpts");

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut join_set = JoinSet::new();

    for excerpt in excerpts {
        let adapter = Arc::clone(&adapter);
        let semaphore = Arc::clone(&semaphore);
        let ledger = Arc::clone(&ledger);
        let cancel = cancel.clone();

        join_set.spawn(async move {
            let index = excerpt.index;

            // The semaphore is never closed; an acquire error can only mean
            // the run is being torn down.
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return (
                        index,
                        ExtractionOutcome::Failure {
                            index,
                            reason: "cancelled".to_string(),
                        },
                    )
                }
            };

            if cancel.is_cancelled() {
                return (
                    index,
                    ExtractionOutcome::Failure {
                        index,
                        reason: "cancelled".to_string(),
                    },
                );
            }

            ledger.record_dispatched();
            let outcome = adapter.extract(&excerpt).await;
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<ExtractionOutcome>> = (0..total).map(|_| None).collect();

    while let Some(joined) = join_set.join_next().await {
        let (index, outcome) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                // A worker panic loses its index; the slot backfill below
                // turns it into a per-excerpt failure.
                warn!(error = %e, "extraction worker died");
                continue;
            }
        };

        let completed = ledger.record_outcome(outcome.is_failure());
        slots[index] = Some(outcome);

        if let Some(callback) = &progress {
            callback(completed, total);
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                ledger.record_outcome(true);
                ExtractionOutcome::Failure {
                    index,
                    reason: "oracle call failed: extraction worker died".to_string(),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use attestor_oracle::MockOracle;
    use std::sync::Mutex;
    use std::time::Duration;

    fn make_excerpts(markers: &[&str]) -> Vec<Excerpt> {
        markers
            .iter()
            .enumerate()
            .map(|(i, marker)| Excerpt::new(i, format!("excerpt about {}", marker), 0))
            .collect()
    }

    // Terse mock replies must not trip the short-reply retry.
    fn test_config() -> PipelineConfig {
        PipelineConfig {
            min_response_len: 2,
            ..Default::default()
        }
    }

    fn adapter_with(oracle: MockOracle) -> Arc<OracleAdapter<MockOracle>> {
        Arc::new(OracleAdapter::new(Arc::new(oracle), &test_config()))
    }

    #[tokio::test]
    async fn test_outcomes_return_in_excerpt_order() {
        let oracle = MockOracle::new("{}");
        oracle.respond_when("ALPHA", r#"{"Auditor": "Alpha LLP"}"#);
        oracle.respond_when("BETA", r#"{"Auditor": "Beta LLP"}"#);
        oracle.respond_when("GAMMA", r#"{"Auditor": "Gamma LLP"}"#);

        let excerpts = make_excerpts(&["ALPHA", "BETA", "GAMMA"]);
        let ledger = Arc::new(ProgressLedger::new(3));
        let outcomes = dispatch(
            adapter_with(oracle),
            excerpts,
            2,
            ledger,
            CancelToken::new(),
            None,
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].record().unwrap().auditor, "Alpha LLP");
        assert_eq!(outcomes[1].record().unwrap().auditor, "Beta LLP");
        assert_eq!(outcomes[2].record().unwrap().auditor, "Gamma LLP");
    }

    #[tokio::test]
    async fn test_one_failure_never_blocks_the_rest() {
        let oracle = MockOracle::new(r#"{"Tags": ["fine"]}"#);
        oracle.fail_when("BETA", "injected outage");

        let excerpts = make_excerpts(&["ALPHA", "BETA", "GAMMA"]);
        let ledger = Arc::new(ProgressLedger::new(3));
        let outcomes = dispatch(
            adapter_with(oracle),
            excerpts,
            3,
            Arc::clone(&ledger),
            CancelToken::new(),
            None,
        )
        .await;

        assert!(!outcomes[0].is_failure());
        assert!(outcomes[1].is_failure());
        assert!(!outcomes[2].is_failure());

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.completed, 3);
        assert_eq!(snapshot.failed, 1);
    }

    #[tokio::test]
    async fn test_progress_events_fire_for_every_outcome() {
        let oracle = MockOracle::new("{}");
        let excerpts = make_excerpts(&["A", "B", "C", "D"]);
        let ledger = Arc::new(ProgressLedger::new(4));

        let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let progress: ProgressFn = Arc::new(move |done, total| {
            seen_clone.lock().unwrap().push((done, total));
        });

        dispatch(
            adapter_with(oracle),
            excerpts,
            2,
            ledger,
            CancelToken::new(),
            Some(progress),
        )
        .await;

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(*events.last().unwrap(), (4, 4));
        for pair in events.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[tokio::test]
    async fn test_cancel_spares_in_flight_and_fails_the_rest() {
        use async_trait::async_trait;
        use attestor_domain::Oracle;
        use attestor_oracle::OracleError;

        // Whichever call runs first cancels the run, then answers normally.
        struct CancellingOracle {
            token: CancelToken,
        }

        #[async_trait]
        impl Oracle for CancellingOracle {
            type Error = OracleError;

            async fn complete(&self, _prompt: &str) -> Result<String, Self::Error> {
                self.token.cancel();
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(r#"{"Tags": ["made it"]}"#.to_string())
            }
        }

        let token = CancelToken::new();
        let adapter = Arc::new(OracleAdapter::new(
            Arc::new(CancellingOracle {
                token: token.clone(),
            }),
            &test_config(),
        ));

        let excerpts = make_excerpts(&["A", "B", "C"]);
        let ledger = Arc::new(ProgressLedger::new(3));
        let outcomes = dispatch(adapter, excerpts, 1, ledger, token, None).await;

        // Concurrency 1: exactly one excerpt was in flight when the token
        // flipped; it finishes, the other two never dispatch.
        assert_eq!(outcomes.len(), 3);
        let successes = outcomes.iter().filter(|o| !o.is_failure()).count();
        assert_eq!(successes, 1);
        let cancelled = outcomes
            .iter()
            .filter(|o| {
                matches!(o, ExtractionOutcome::Failure { reason, .. } if reason == "cancelled")
            })
            .count();
        assert_eq!(cancelled, 2);
    }

    #[tokio::test]
    async fn test_empty_excerpt_list() {
        let oracle = MockOracle::new("{}");
        let ledger = Arc::new(ProgressLedger::new(0));
        let outcomes = dispatch(
            adapter_with(oracle),
            Vec::new(),
            4,
            ledger,
            CancelToken::new(),
            None,
        )
        .await;
        assert!(outcomes.is_empty());
    }
}
