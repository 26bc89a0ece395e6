use async_trait::async_trait;

use crate::errors::CoreError;

/// Text-generation backend used for financial advice.
///
/// The advice service owns prompt construction and failure recovery;
/// a provider only turns a prompt into text.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Generate a reply for `prompt`. An empty string is a valid reply.
    async fn generate(&self, prompt: &str) -> Result<String, CoreError>;
}
