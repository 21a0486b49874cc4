//! Configuration for the pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum excerpt size (characters)
    pub max_excerpt_size: usize,

    /// Trailing window duplicated into the next excerpt (characters)
    pub overlap: usize,

    /// Maximum concurrent oracle calls
    pub concurrency: usize,

    /// Replies shorter than this (after fence stripping) trigger the single
    /// permitted retry
    pub min_response_len: usize,

    /// Deadline for one oracle call (seconds)
    pub oracle_timeout_secs: u64,
}

impl PipelineConfig {
    /// Get the per-call oracle deadline as a Duration.
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_excerpt_size == 0 {
            return Err("max_excerpt_size must be greater than 0".to_string());
        }
        if self.overlap >= self.max_excerpt_size {
            return Err("overlap must be smaller than max_excerpt_size".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        if self.oracle_timeout_secs == 0 {
            return Err("oracle_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_excerpt_size: 2_500,
            overlap: 400,
            concurrency: 4,
            min_response_len: 24,
            oracle_timeout_secs: 60,
        }
    }
}

impl PipelineConfig {
    /// Swift preset: smaller excerpts, more parallel calls, short deadline.
    pub fn swift() -> Self {
        Self {
            max_excerpt_size: 2_000,
            overlap: 200,
            concurrency: 6,
            min_response_len: 16,
            oracle_timeout_secs: 30,
        }
    }

    /// Thorough preset: larger excerpts with a wider overlap window and a
    /// generous deadline for slower models.
    pub fn thorough() -> Self {
        Self {
            max_excerpt_size: 3_000,
            overlap: 500,
            concurrency: 4,
            min_response_len: 24,
            oracle_timeout_secs: 120,
        }
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::swift().validate().is_ok());
        assert!(PipelineConfig::thorough().validate().is_ok());
    }

    #[test]
    fn test_zero_excerpt_size_rejected() {
        let mut config = PipelineConfig::default();
        config.max_excerpt_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_excerpt_size() {
        let mut config = PipelineConfig::default();
        config.overlap = config.max_excerpt_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = PipelineConfig::default();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::thorough();
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_excerpt_size, parsed.max_excerpt_size);
        assert_eq!(config.overlap, parsed.overlap);
        assert_eq!(config.concurrency, parsed.concurrency);
        assert_eq!(config.oracle_timeout_secs, parsed.oracle_timeout_secs);
    }
}
