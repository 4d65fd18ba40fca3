//! Exact (brute-force) cosine index and its query results.

mod flat;

pub use flat::{VectorIndex, INDEX_FILE};

use dm_core::Record;
use serde::Serialize;

/// A matched record and its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: Record,
    pub score: f32,
}

/// Search result: records sorted by descending score, ties in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub hits: Vec<ScoredRecord>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredRecord> {
        self.hits.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.record.id.as_str()).collect()
    }

    pub fn scores(&self) -> Vec<f32> {
        self.hits.iter().map(|h| h.score).collect()
    }

    /// Drop hits scoring below `min_score`. Order is preserved.
    pub fn retain_min_score(&mut self, min_score: f32) {
        self.hits.retain(|h| h.score >= min_score);
    }
}

impl IntoIterator for QueryResult {
    type Item = ScoredRecord;
    type IntoIter = std::vec::IntoIter<ScoredRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

/// Shape of an index, reported without exposing its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub dimension: usize,
    pub count: usize,
}
