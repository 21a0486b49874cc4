//! Ollama Provider Implementation
//!
//! Integration with Ollama's local LLM API for running the extraction
//! oracle against a local model.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff on transport failures
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use attestor_oracle::OllamaOracle;
//!
//! let oracle = OllamaOracle::new("http://localhost:11434", "llama3");
//! ```

use crate::OracleError;
use async_trait::async_trait;
use attestor_domain::Oracle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of transport retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API oracle for local LLM inference.
pub struct OllamaOracle {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaOracle {
    /// Create a new Ollama oracle.
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create an oracle against the default local endpoint.
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of transport retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate text for a prompt via the Ollama API.
    ///
    /// # Errors
    ///
    /// Returns an error if Ollama is unreachable, the model is not
    /// available, or the response body is not the expected shape.
    pub async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return match response.json::<OllamaGenerateResponse>().await {
                            Ok(body) => Ok(body.response),
                            Err(e) => Err(OracleError::InvalidResponse(format!(
                                "failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(OracleError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "unknown error".to_string());
                        last_error = Some(OracleError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error =
                        Some(OracleError::Communication(format!("request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| OracleError::Communication("max retries exceeded".to_string())))
    }
}

#[async_trait]
impl Oracle for OllamaOracle {
    type Error = OracleError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_creation() {
        let oracle = OllamaOracle::new("http://localhost:11434", "llama3");
        assert_eq!(oracle.endpoint, "http://localhost:11434");
        assert_eq!(oracle.model, "llama3");
        assert_eq!(oracle.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_default_endpoint() {
        let oracle = OllamaOracle::default_endpoint("mistral");
        assert_eq!(oracle.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(oracle.model, "mistral");
    }

    #[test]
    fn test_with_max_retries() {
        let oracle = OllamaOracle::new("http://localhost:11434", "llama3").with_max_retries(5);
        assert_eq!(oracle.max_retries, 5);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        // Port 9 (discard) should refuse the connection
        let oracle = OllamaOracle::new("http://127.0.0.1:9", "llama3").with_max_retries(1);

        let result = oracle.complete("test").await;
        match result {
            Err(OracleError::Communication(_)) => {}
            other => panic!("expected Communication error, got {:?}", other.map(|_| ())),
        }
    }
}
