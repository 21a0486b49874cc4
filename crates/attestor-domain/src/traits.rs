//! Trait definitions for external interactions
//!
//! These traits define the boundary between the pipeline and infrastructure.
//! Implementations live in other crates (attestor-oracle).

use async_trait::async_trait;

/// The external text-understanding oracle.
///
/// The oracle is untrusted for format and trusted only for best-effort
/// content: callers must treat the returned text as arbitrary prose that is
/// merely expected to contain one structured object. A call may take seconds
/// and may fail transiently.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Error type for oracle operations
    type Error;

    /// Send one prompt and return the oracle's raw textual reply.
    async fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}
