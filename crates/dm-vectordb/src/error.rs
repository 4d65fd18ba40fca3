use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Cannot build an index from an empty record set")]
    EmptyInput,
    #[error("Invalid k: must be at least 1")]
    InvalidK,
    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),
    #[error("No results: index is empty or not loaded")]
    NoResults,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dm_core::CoreError> for VectorDbError {
    fn from(err: dm_core::CoreError) -> Self {
        VectorDbError::InvalidRecord(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VectorDbError>;
