use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
