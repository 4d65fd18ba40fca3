use dm_vectordb::VectorDbError;
use thiserror::Error;

/// Failure reported by an external embedding or text-generation provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{provider} provider error: {message}")]
pub struct ProviderError {
    pub provider: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error(transparent)]
    Index(VectorDbError),
    #[error("Embedding timed out after {timeout_ms} ms")]
    EmbeddingTimeout { timeout_ms: u64 },
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("No results: no grounding records were retrieved")]
    NoResults,
    #[error("Ingest error at line {line}: {message}")]
    Ingest { line: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<VectorDbError> for RetrievalError {
    fn from(err: VectorDbError) -> Self {
        match err {
            VectorDbError::NoResults => RetrievalError::NoResults,
            other => RetrievalError::Index(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
