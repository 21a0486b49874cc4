//! Oracle adapter: one excerpt in, one outcome out
//!
//! The adapter owns the full response-handling path for a single excerpt:
//! build the fixed prompt, call the oracle under a deadline, classify a
//! raised error, strip fences, retry exactly once on an empty or truncated
//! reply, then parse strictly. Every way the call can go wrong becomes a
//! typed `ExtractionOutcome::Failure`; nothing escapes as a panic or an
//! `Err` that could abort sibling excerpts.

use crate::config::PipelineConfig;
use crate::parser::{parse_oracle_response, strip_code_fences};
use crate::prompt::ExtractionPrompt;
use attestor_domain::{Excerpt, ExtractionOutcome, Oracle};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Turns one excerpt into one extraction outcome via the oracle.
pub struct OracleAdapter<O> {
    oracle: Arc<O>,
    min_response_len: usize,
    call_timeout: Duration,
}

impl<O> OracleAdapter<O>
where
    O: Oracle,
    O::Error: std::fmt::Display,
{
    /// Create an adapter over a shared oracle.
    pub fn new(oracle: Arc<O>, config: &PipelineConfig) -> Self {
        Self {
            oracle,
            min_response_len: config.min_response_len,
            call_timeout: config.oracle_timeout(),
        }
    }

    /// Extract a partial record from one excerpt.
    ///
    /// Side effects: the one outbound oracle call, plus at most one retry
    /// for the empty-response class. No shared state is touched.
    pub async fn extract(&self, excerpt: &Excerpt) -> ExtractionOutcome {
        let index = excerpt.index;
        let prompt = ExtractionPrompt::new(excerpt.text.as_str()).build();

        let mut reply = match self.call(&prompt).await {
            Ok(reply) => reply,
            Err(reason) => {
                warn!(excerpt = index, %reason, "oracle call raised");
                return ExtractionOutcome::Failure { index, reason };
            }
        };

        // Empty or truncated replies get exactly one more attempt; any
        // other failure class does not.
        if strip_code_fences(&reply).chars().count() < self.min_response_len {
            debug!(excerpt = index, "reply too short, retrying once");
            reply = match self.call(&prompt).await {
                Ok(reply) => reply,
                Err(reason) => {
                    warn!(excerpt = index, %reason, "oracle retry raised");
                    return ExtractionOutcome::Failure { index, reason };
                }
            };
            if strip_code_fences(&reply).chars().count() < self.min_response_len {
                return ExtractionOutcome::Failure {
                    index,
                    reason: "oracle call failed: empty response after retry".to_string(),
                };
            }
        }

        match parse_oracle_response(&reply) {
            Ok(record) => ExtractionOutcome::Success(record),
            Err(e) => {
                warn!(excerpt = index, error = %e, "unparseable oracle reply");
                ExtractionOutcome::Failure {
                    index,
                    reason: format!("malformed structured response: {}", e),
                }
            }
        }
    }

    async fn call(&self, prompt: &str) -> Result<String, String> {
        match timeout(self.call_timeout, self.oracle.complete(prompt)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(format!("oracle call failed: {}", e)),
            Err(_) => Err(format!(
                "oracle call failed: timed out after {}s",
                self.call_timeout.as_secs()
            )),
        }
    }
}
