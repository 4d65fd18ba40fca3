use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted index. `None` keeps the index in memory only.
    pub index_dir: Option<PathBuf>,
    /// Optional CSV or JSONL knowledge base used instead of the built-in catalog.
    pub records_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dimension: usize,
    pub provider: String,
}

/// What to do when retrieval yields nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoResultsPolicy {
    /// Surface the error to the caller.
    #[default]
    Fail,
    /// Answer from the full catalog without grounding.
    Ungrounded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub embed_timeout_ms: u64,
    /// Matches scoring below this are dropped before prompt assembly.
    pub min_score: Option<f32>,
    pub no_results: NoResultsPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            provider: "hashing".into(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 2,
            embed_timeout_ms: 5_000,
            min_score: None,
            no_results: NoResultsPolicy::Fail,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.1 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl AdvisorConfig {
    /// Read a JSON config file; missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        tracing::info!(path = %path.display(), "loaded advisor config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimension == 0 {
            return Err(CoreError::InvalidConfig("embedding.dimension must be > 0".into()));
        }
        if self.retrieval.top_k == 0 {
            return Err(CoreError::InvalidConfig("retrieval.top_k must be > 0".into()));
        }
        if self.retrieval.embed_timeout_ms == 0 {
            return Err(CoreError::InvalidConfig("retrieval.embed_timeout_ms must be > 0".into()));
        }
        if let Some(min) = self.retrieval.min_score {
            if !(-1.0..=1.0).contains(&min) {
                return Err(CoreError::InvalidConfig(format!(
                    "retrieval.min_score must be within [-1, 1], got {min}"
                )));
            }
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(CoreError::InvalidConfig(format!(
                "generation.temperature must be within [0, 2], got {}",
                self.generation.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AdvisorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.retrieval.top_k, 2);
        assert_eq!(cfg.retrieval.no_results, NoResultsPolicy::Fail);
        assert!((cfg.generation.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"retrieval": {{"top_k": 4, "no_results": "ungrounded"}}}}"#).unwrap();
        let cfg = AdvisorConfig::from_file(f.path()).unwrap();
        assert_eq!(cfg.retrieval.top_k, 4);
        assert_eq!(cfg.retrieval.no_results, NoResultsPolicy::Ungrounded);
        assert_eq!(cfg.retrieval.embed_timeout_ms, 5_000);
        assert_eq!(cfg.embedding.dimension, 256);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut cfg = AdvisorConfig::default();
        cfg.retrieval.top_k = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AdvisorConfig::default();
        cfg.retrieval.min_score = Some(1.5);
        assert!(cfg.validate().is_err());

        let mut cfg = AdvisorConfig::default();
        cfg.embedding.dimension = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(matches!(
            AdvisorConfig::from_file(f.path()),
            Err(CoreError::Serialization(_))
        ));
    }
}
