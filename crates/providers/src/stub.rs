//! Deterministic stub provider for offline use and tests.

use async_trait::async_trait;
use polymath_core::InferenceProvider;
use polymath_core::error::InferenceError;

/// Responds without any model behind it.
///
/// With a fixed reply configured it returns that verbatim; otherwise it
/// produces a deterministic acknowledgement derived from the inputs, so
/// tests can assert that both prompt and context reached the provider.
pub struct StubProvider {
    reply: Option<String>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self { reply: None }
    }

    /// Always answer with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn infer(&self, prompt: &str, context: &str) -> Result<String, InferenceError> {
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }
        let context_lines = if context.is_empty() {
            0
        } else {
            context.lines().count()
        };
        Ok(format!(
            "[stub] prompt: {prompt} (context: {context_lines} lines)"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_reply_is_verbatim() {
        let provider = StubProvider::with_reply("canned answer");
        let out = provider.infer("anything", "ctx").await.unwrap();
        assert_eq!(out, "canned answer");
    }

    #[tokio::test]
    async fn default_reply_is_deterministic() {
        let provider = StubProvider::new();
        let a = provider.infer("hello", "line1\nline2").await.unwrap();
        let b = provider.infer("hello", "line1\nline2").await.unwrap();
        assert_eq!(a, b);
        assert!(a.contains("hello"));
        assert!(a.contains("2 lines"));
    }
}
