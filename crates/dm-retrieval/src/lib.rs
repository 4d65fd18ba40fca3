//! Retrieval-augmented prompt assembly.
//!
//! Embeds a query through an [`Embedder`], ranks knowledge-base records in the
//! shared vector index, and renders the matches into a grounded prompt. The
//! [`Advisor`] layers the delivery-method recommendation on top, with a
//! grounded and an ungrounded prompt path.

pub mod advisor;
pub mod assembler;
pub mod embedder;
pub mod error;
pub mod generator;
pub mod ingest;

pub use advisor::{Advisor, Recommendation, RecommendMode};
pub use assembler::{PromptPayload, RetrievalPromptAssembler, Source};
pub use embedder::{Embedder, HashingEmbedder};
pub use error::{ProviderError, Result, RetrievalError};
pub use generator::{GenerationRequest, TextGenerator};
pub use ingest::{read_records, read_records_csv, read_records_jsonl, IndexBuilder};
