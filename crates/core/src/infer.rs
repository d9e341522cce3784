//! InferenceProvider trait — the abstraction over the downstream model.
//!
//! The runtime treats inference as an opaque function
//! `infer(prompt, context) -> text`. It is responsible only for what goes
//! into `context`; latency, retries, and caching are the caller's concern.

use async_trait::async_trait;
use crate::error::InferenceError;

/// The inference collaborator.
///
/// Implementations: OpenAI-compatible HTTP endpoints, a deterministic stub
/// for offline use and tests.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai-compat", "stub").
    fn name(&self) -> &str;

    /// Run one inference call. A failure is surfaced verbatim — no retry
    /// logic exists at this layer.
    async fn infer(
        &self,
        prompt: &str,
        context: &str,
    ) -> std::result::Result<String, InferenceError>;
}
