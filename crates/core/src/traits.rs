use crate::GenerationError;
use async_trait::async_trait;

/// External text-generation provider. Implementations make a single
/// attempt; retries live in [`crate::generation::generate_with_retry`].
#[async_trait]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}
