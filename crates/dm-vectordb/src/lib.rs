//! Exact nearest-neighbour vector index over immutable records.
//!
//! Provides a brute-force cosine index, its checksummed on-disk format with
//! atomic persistence, and a swap-on-snapshot handle for concurrent readers.

pub mod distance;
pub mod error;
pub mod index;
pub mod shared;
pub mod store;

pub use error::{Result, VectorDbError};
pub use index::{IndexInfo, QueryResult, ScoredRecord, VectorIndex, INDEX_FILE};
pub use shared::SharedIndex;
