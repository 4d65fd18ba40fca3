use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use dm_core::Record;

use super::{IndexInfo, QueryResult, ScoredRecord};
use crate::distance;
use crate::error::{Result, VectorDbError};
use crate::store::{codec, FileStore};

/// File name of the persisted index inside its directory.
pub const INDEX_FILE: &str = "index.dmvi";

/// Brute-force vector index.
/// Exact nearest-neighbor search by scanning all vectors. Immutable once
/// built; a rebuild produces a new index.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<Entry>,
    id_to_idx: HashMap<String, usize>,
}

#[derive(Debug)]
struct Entry {
    record: Record,
    vector: Vec<f32>,
    norm: f32,
}

impl VectorIndex {
    /// Build an index from records paired with their embeddings.
    /// Insertion order is the tie-break order for equal scores.
    pub fn build(records: Vec<(Record, Vec<f32>)>) -> Result<Self> {
        let dimension = match records.first() {
            Some((_, v)) => v.len(),
            None => return Err(VectorDbError::EmptyInput),
        };
        if dimension == 0 {
            return Err(VectorDbError::DegenerateVector("vectors must have at least one component".into()));
        }

        let mut entries = Vec::with_capacity(records.len());
        let mut id_to_idx = HashMap::with_capacity(records.len());
        for (record, vector) in records {
            record.validate()?;
            if vector.len() != dimension {
                return Err(VectorDbError::DimensionMismatch {
                    expected: dimension,
                    got: vector.len(),
                });
            }
            let norm = distance::usable_norm(&vector).ok_or_else(|| {
                VectorDbError::DegenerateVector(format!(
                    "record {} has a zero or non-finite vector",
                    record.id
                ))
            })?;
            if id_to_idx.contains_key(&record.id) {
                return Err(VectorDbError::DuplicateId(record.id));
            }
            id_to_idx.insert(record.id.clone(), entries.len());
            entries.push(Entry { record, vector, norm });
        }

        tracing::info!(dimension, count = entries.len(), "built vector index");
        Ok(Self {
            dimension,
            entries,
            id_to_idx,
        })
    }

    /// Search for the top-k records by cosine similarity.
    /// `k` larger than the index returns every record, ranked.
    pub fn search(&self, query: &[f32], k: usize) -> Result<QueryResult> {
        if k == 0 {
            return Err(VectorDbError::InvalidK);
        }
        if query.len() != self.dimension {
            return Err(VectorDbError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }
        let query_norm = distance::usable_norm(query).ok_or_else(|| {
            VectorDbError::DegenerateVector("query vector has zero norm or non-finite components".into())
        })?;
        if self.entries.is_empty() {
            return Err(VectorDbError::NoResults);
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (pos, distance::cosine_with_norms(query, query_norm, &e.vector, e.norm)))
            .collect();

        // Score descending, then insertion position ascending: a total order,
        // so the unstable partial selection stays deterministic.
        let rank = |a: &(usize, f32), b: &(usize, f32)| -> Ordering {
            b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
        };
        let k = k.min(scored.len());
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, rank);
            scored.truncate(k);
        }
        scored.sort_unstable_by(rank);

        tracing::debug!(k, hits = scored.len(), "vector search");
        Ok(QueryResult {
            hits: scored
                .into_iter()
                .map(|(pos, score)| ScoredRecord {
                    record: self.entries[pos].record.clone(),
                    score,
                })
                .collect(),
        })
    }

    /// Write the index into `dir`, replacing any previous file atomically.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        let bytes = codec::encode(self)?;
        FileStore::new(dir).put(INDEX_FILE, &bytes)?;
        tracing::info!(path = %dir.display(), bytes = bytes.len(), count = self.len(), "persisted vector index");
        Ok(())
    }

    /// Read an index previously written by [`VectorIndex::persist`].
    /// Any malformed content fails the whole load with `CorruptIndex`.
    pub fn load(dir: &Path) -> Result<Self> {
        let bytes = FileStore::new(dir).get(INDEX_FILE)?;
        match codec::decode(&bytes) {
            Ok(index) => {
                tracing::info!(path = %dir.display(), dimension = index.dimension, count = index.len(), "loaded vector index");
                Ok(index)
            }
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "rejected persisted index");
                Err(e)
            }
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self) -> IndexInfo {
        IndexInfo {
            dimension: self.dimension,
            count: self.entries.len(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.id_to_idx.get(id).map(|&i| &self.entries[i].record)
    }

    pub fn vector(&self, id: &str) -> Option<&[f32]> {
        self.id_to_idx.get(id).map(|&i| self.entries[i].vector.as_slice())
    }

    /// Records with their vectors, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Record, &[f32])> {
        self.entries.iter().map(|e| (&e.record, e.vector.as_slice()))
    }
}
