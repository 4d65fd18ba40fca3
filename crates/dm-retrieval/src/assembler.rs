//! Turns a query into a grounded prompt over the current index snapshot.

use std::sync::Arc;
use std::time::Duration;

use dm_core::config::RetrievalConfig;
use dm_vectordb::{QueryResult, ScoredRecord, SharedIndex, VectorDbError};
use serde::Serialize;

use crate::embedder::{embed_with_timeout, Embedder};
use crate::error::{Result, RetrievalError};

pub const CONTEXT_HEADING: &str = "Retrieved Knowledge Base:";
pub const QUERY_HEADING: &str = "Query:";
/// Line between record blocks; every block already ends in a newline.
pub const BLOCK_SEPARATOR: &str = "---\n";

const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(5);

/// A record that grounded a prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub id: String,
    pub score: f32,
}

/// Final prompt text and the records it was grounded on, best match first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPayload {
    pub text: String,
    pub sources: Vec<Source>,
}

#[derive(Clone)]
pub struct RetrievalPromptAssembler {
    index: SharedIndex,
    embedder: Arc<dyn Embedder>,
    embed_timeout: Duration,
    min_score: Option<f32>,
}

impl RetrievalPromptAssembler {
    pub fn new(index: SharedIndex, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            index,
            embedder,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            min_score: None,
        }
    }

    pub fn from_config(index: SharedIndex, embedder: Arc<dyn Embedder>, cfg: &RetrievalConfig) -> Self {
        Self::new(index, embedder)
            .with_timeout(Duration::from_millis(cfg.embed_timeout_ms))
            .with_min_score(cfg.min_score)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn embed_timeout(&self) -> Duration {
        self.embed_timeout
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        embed_with_timeout(self.embedder.as_ref(), text, self.embed_timeout).await
    }

    /// Embed `query_text` and rank the top `k` records of the current snapshot.
    pub async fn retrieve(&self, query_text: &str, k: usize) -> Result<QueryResult> {
        if k == 0 {
            return Err(VectorDbError::InvalidK.into());
        }
        // Pin the snapshot first so a concurrent rebuild cannot change what
        // this call searches.
        let index = self.index.snapshot().ok_or(RetrievalError::NoResults)?;
        let vector = self.embed(query_text).await?;
        let mut result = index.search(&vector, k)?;
        if let Some(min) = self.min_score {
            let before = result.len();
            result.retain_min_score(min);
            tracing::debug!(min_score = min, before, after = result.len(), "applied score floor");
        }
        tracing::debug!(k, hits = result.len(), "retrieved grounding records");
        Ok(result)
    }

    /// Retrieve the top `k` records and render the grounded prompt.
    pub async fn compose(&self, instructions: &str, query_text: &str, k: usize) -> Result<PromptPayload> {
        let result = self.retrieve(query_text, k).await?;
        if result.is_empty() {
            return Err(RetrievalError::NoResults);
        }
        Ok(render_prompt(instructions, query_text, &result))
    }
}

/// One retrieved record: a header line, then its metadata in insertion order,
/// or its text when it carries no metadata.
pub fn render_block(rank: usize, hit: &ScoredRecord) -> String {
    let mut block = format!("[{}] id: {} (score: {:.4})\n", rank, hit.record.id, hit.score);
    if hit.record.metadata.is_empty() {
        block.push_str(hit.record.text.trim_end());
        block.push('\n');
    } else {
        for (k, v) in hit.record.metadata.iter() {
            block.push_str(k);
            block.push_str(": ");
            block.push_str(v);
            block.push('\n');
        }
    }
    block
}

pub fn render_prompt(instructions: &str, query_text: &str, result: &QueryResult) -> PromptPayload {
    let blocks: Vec<String> = result
        .iter()
        .enumerate()
        .map(|(i, hit)| render_block(i + 1, hit))
        .collect();
    let text = format!(
        "{}\n\n{}\n{}\n{}\n{}\n",
        instructions.trim_end(),
        CONTEXT_HEADING,
        blocks.join(BLOCK_SEPARATOR),
        QUERY_HEADING,
        query_text.trim_end(),
    );
    PromptPayload {
        text,
        sources: result
            .iter()
            .map(|h| Source {
                id: h.record.id.clone(),
                score: h.score,
            })
            .collect(),
    }
}
