//! Application state shared across all handlers.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dm_core::catalog::catalog_records;
use dm_core::{AdvisorConfig, CoreError, Record};
use dm_retrieval::{
    read_records, Advisor, Embedder, HashingEmbedder, IndexBuilder, RetrievalError,
    RetrievalPromptAssembler, TextGenerator,
};
use dm_vectordb::{IndexInfo, SharedIndex, INDEX_FILE};
use tokio::sync::Mutex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AdvisorConfig>,
    pub assembler: RetrievalPromptAssembler,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
    /// Serializes rebuilds so the persisted file and the live index agree.
    rebuild_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: AdvisorConfig, embedder: Arc<dyn Embedder>) -> Self {
        let assembler =
            RetrievalPromptAssembler::from_config(SharedIndex::new(), embedder, &config.retrieval);
        Self {
            config: Arc::new(config),
            assembler,
            generator: None,
            start_time: Instant::now(),
            started_at: Utc::now(),
            rebuild_lock: Arc::new(Mutex::new(())),
        }
    }

    /// State wired to the embedding provider named in `config`.
    pub fn from_config(config: AdvisorConfig) -> Result<Self, CoreError> {
        let embedder: Arc<dyn Embedder> = match config.embedding.provider.as_str() {
            "hashing" => Arc::new(HashingEmbedder::new(config.embedding.dimension)),
            other => {
                return Err(CoreError::InvalidConfig(format!(
                    "unknown embedding provider '{other}'"
                )))
            }
        };
        Ok(Self::new(config, embedder))
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn index(&self) -> &SharedIndex {
        self.assembler.index()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Advisor over the live index, if a text generator is configured.
    pub fn advisor(&self) -> Option<Advisor> {
        self.generator
            .as_ref()
            .map(|g| Advisor::new(self.assembler.clone(), Arc::clone(g), &self.config))
    }

    /// Embed `records`, persist the new index when a storage directory is
    /// configured, then swap it in. On any failure the live index is untouched.
    pub async fn rebuild(&self, records: Vec<Record>) -> Result<IndexInfo, RetrievalError> {
        let _guard = self.rebuild_lock.lock().await;
        let builder = IndexBuilder::new(
            Arc::clone(self.assembler.embedder()),
            self.assembler.embed_timeout(),
        );
        let index = builder.build(records).await?;
        if let Some(dir) = &self.config.storage.index_dir {
            index.persist(dir)?;
        }
        let info = index.info();
        self.index().replace(index);
        Ok(info)
    }

    /// Install the startup index: a persisted one if present, otherwise built
    /// from the configured records file or the built-in catalog.
    pub async fn bootstrap(&self) -> Result<IndexInfo, RetrievalError> {
        if let Some(dir) = &self.config.storage.index_dir {
            if dir.join(INDEX_FILE).exists() {
                return self.load_persisted(dir);
            }
        }
        let records = match &self.config.storage.records_path {
            Some(path) => read_records(path)?,
            None => catalog_records(),
        };
        self.rebuild(records).await
    }

    fn load_persisted(&self, dir: &Path) -> Result<IndexInfo, RetrievalError> {
        let info = self.index().load_from(dir, self.assembler.embedder().dimension())?;
        tracing::info!(dir = %dir.display(), count = info.count, "loaded persisted index");
        Ok(info)
    }
}
