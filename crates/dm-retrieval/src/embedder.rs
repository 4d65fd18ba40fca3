//! Embedding provider interface and the offline hashing embedder.

use std::hash::Hasher;
use std::time::Duration;

use async_trait::async_trait;
use dm_vectordb::distance::normalize_vector;
use twox_hash::XxHash64;

use crate::error::{ProviderError, Result, RetrievalError};

/// Provider interface for embedding generation.
///
/// Implementations must return vectors of `dimension()` length for every input.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier, used in logs and errors.
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError>;
}

/// Run one embedding call under `timeout`. Nothing is retained on expiry.
pub(crate) async fn embed_with_timeout(
    embedder: &dyn Embedder,
    text: &str,
    timeout: Duration,
) -> Result<Vec<f32>> {
    match tokio::time::timeout(timeout, embedder.embed(text)).await {
        Ok(Ok(vector)) => Ok(vector),
        Ok(Err(e)) => {
            tracing::warn!(provider = embedder.name(), error = %e, "embedding failed");
            Err(RetrievalError::Provider(e))
        }
        Err(_) => {
            let timeout_ms = timeout.as_millis() as u64;
            tracing::warn!(provider = embedder.name(), timeout_ms, "embedding timed out");
            Err(RetrievalError::EmbeddingTimeout { timeout_ms })
        }
    }
}

/// Deterministic feature-hashing embedder.
///
/// Lower-cased alphanumeric tokens and adjacent-token bigrams are hashed into
/// `dimension` signed buckets, then L2-normalized. Text without tokens yields
/// the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

const BIGRAM_WEIGHT: f32 = 0.5;

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let mut v = vec![0f32; self.dimension];
        for token in &tokens {
            self.accumulate(&mut v, token.as_bytes(), 1.0);
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.accumulate(&mut v, bigram.as_bytes(), BIGRAM_WEIGHT);
        }
        normalize_vector(&mut v);
        v
    }

    fn accumulate(&self, v: &mut [f32], feature: &[u8], weight: f32) {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(feature);
        let h = hasher.finish();
        let bucket = (h % self.dimension as u64) as usize;
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        v[bucket] += sign * weight;
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError> {
        Ok(self.embed_sync(text))
    }
}
