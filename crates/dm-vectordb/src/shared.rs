//! Swap-on-snapshot handle to the live index.
//!
//! Readers clone an `Arc` to the current index and search it without holding
//! the lock, so replacing the index never interleaves with a running search:
//! in-flight queries finish against the snapshot they started with.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, VectorDbError};
use crate::index::{IndexInfo, QueryResult, VectorIndex};

#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    current: Arc<RwLock<Option<Arc<VectorIndex>>>>,
}

impl SharedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(index: VectorIndex) -> Self {
        let shared = Self::new();
        shared.replace(index);
        shared
    }

    /// Current index, if one is installed.
    pub fn snapshot(&self) -> Option<Arc<VectorIndex>> {
        self.current.read().clone()
    }

    /// Install a new index, returning the one it displaced.
    pub fn replace(&self, index: VectorIndex) -> Option<Arc<VectorIndex>> {
        let info = index.info();
        let previous = self.current.write().replace(Arc::new(index));
        tracing::info!(dimension = info.dimension, count = info.count, "installed vector index");
        previous
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn info(&self) -> Option<IndexInfo> {
        self.current.read().as_ref().map(|idx| idx.info())
    }

    /// Search the current snapshot; `NoResults` when nothing is installed.
    pub fn search(&self, query: &[f32], k: usize) -> Result<QueryResult> {
        let index = self.snapshot().ok_or(VectorDbError::NoResults)?;
        index.search(query, k)
    }

    /// Load from disk and swap in, requiring vectors of `dimension` length.
    /// The live index is untouched on failure.
    pub fn load_from(&self, dir: &Path, dimension: usize) -> Result<IndexInfo> {
        let index = VectorIndex::load(dir)?;
        if index.dimension() != dimension {
            return Err(VectorDbError::DimensionMismatch {
                expected: dimension,
                got: index.dimension(),
            });
        }
        let info = index.info();
        self.replace(index);
        Ok(info)
    }
}
