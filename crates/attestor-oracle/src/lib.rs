//! Attestor Oracle Layer
//!
//! Implementations of the `Oracle` trait from `attestor-domain`.
//!
//! # Providers
//!
//! - `MockOracle`: deterministic scripted double for testing
//! - `OllamaOracle`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use attestor_oracle::MockOracle;
//! use attestor_domain::Oracle;
//!
//! # tokio_test::block_on(async {
//! let oracle = MockOracle::new("{\"Auditor\": \"Example LLP\"}");
//! let reply = oracle.complete("any prompt").await.unwrap();
//! assert!(reply.contains("Example LLP"));
//! # });
//! ```

#![warn(missing_docs)]

pub mod ollama;

use async_trait::async_trait;
use attestor_domain::Oracle;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaOracle;

/// Errors that can occur during oracle operations
#[derive(Error, Debug)]
pub enum OracleError {
    /// Network or API communication error
    #[error("communication error: {0}")]
    Communication(String),

    /// Invalid response from the oracle service
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available on the oracle service
    #[error("model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("oracle error: {0}")]
    Other(String),
}

/// One scripted reply for [`MockOracle`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Fail the call with this message
    Error(String),
}

/// Mock oracle for deterministic testing.
///
/// Replies are resolved in priority order: a scripted FIFO queue first (each
/// entry consumed once — the natural way to exercise retry behavior), then
/// substring-matched rules, then the default reply. No network calls are
/// made.
///
/// # Examples
///
/// ```
/// use attestor_oracle::MockOracle;
/// use attestor_domain::Oracle;
///
/// # tokio_test::block_on(async {
/// let oracle = MockOracle::new("{}");
/// oracle.push_reply("");              // first call: empty
/// oracle.push_reply("{\"Tags\": []}"); // second call: real payload
///
/// assert_eq!(oracle.complete("p").await.unwrap(), "");
/// assert_eq!(oracle.complete("p").await.unwrap(), "{\"Tags\": []}");
/// assert_eq!(oracle.complete("p").await.unwrap(), "{}");
/// assert_eq!(oracle.call_count(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockOracle {
    default_reply: MockReply,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockOracle {
    /// Create a mock that returns a fixed reply for every prompt.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Text(reply.into()),
            rules: Arc::new(Mutex::new(Vec::new())),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock whose every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Error(message.into()),
            rules: Arc::new(Mutex::new(Vec::new())),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a reply to be consumed by the next unanswered call.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(MockReply::Text(reply.into()));
    }

    /// Queue a failure to be consumed by the next unanswered call.
    pub fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(MockReply::Error(message.into()));
    }

    /// Reply with `reply` whenever the prompt contains `needle`.
    ///
    /// Rules are checked in insertion order after the script queue is empty.
    pub fn respond_when(&self, needle: impl Into<String>, reply: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Text(reply.into())));
    }

    /// Fail with `message` whenever the prompt contains `needle`.
    pub fn fail_when(&self, needle: impl Into<String>, message: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Error(message.into())));
    }

    /// Number of times `complete` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn resolve(&self, prompt: &str) -> MockReply {
        if let Some(reply) = self.script.lock().unwrap().pop_front() {
            return reply;
        }
        let rules = self.rules.lock().unwrap();
        for (needle, reply) in rules.iter() {
            if prompt.contains(needle.as_str()) {
                return reply.clone();
            }
        }
        self.default_reply.clone()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl Oracle for MockOracle {
    type Error = OracleError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        match self.resolve(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(OracleError::Other(message)),
        }
    }
}
