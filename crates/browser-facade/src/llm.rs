use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("language model requires authentication: {0}")]
    AuthRequired(String),
    #[error("language model request failed: {0}")]
    RequestFailed(String),
    #[error("language model not configured")]
    NotConfigured,
}

/// The language model backend the planner falls through to once its guard
/// rules are exhausted. `generate` takes the system and user prompt halves
/// separately so implementations can route them to distinct chat-message
/// roles without the planner needing to know the wire format.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Best-effort warmup/auth check performed once before the session
    /// starts; the default no-op suits models with no cold-start cost.
    async fn warmup(&self) -> Result<(), LlmError> {
        Ok(())
    }
}
