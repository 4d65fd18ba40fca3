//! Text-generation provider interface.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ProviderError;

/// A final prompt plus sampling temperature, ready for a text generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}
