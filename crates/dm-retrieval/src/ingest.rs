//! Knowledge-base ingestion: read records, embed them, build the index.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use dm_core::{Metadata, Record};
use dm_vectordb::{VectorDbError, VectorIndex};

use crate::embedder::{embed_with_timeout, Embedder};
use crate::error::{Result, RetrievalError};

/// Embeds records with the configured provider and builds a fresh index.
pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    timeout: Duration,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<dyn Embedder>, timeout: Duration) -> Self {
        Self { embedder, timeout }
    }

    /// Embed every record's `text` in order and build the index. The first
    /// failing record aborts the build; no partial index is returned.
    pub async fn build(&self, records: Vec<Record>) -> Result<VectorIndex> {
        if records.is_empty() {
            return Err(VectorDbError::EmptyInput.into());
        }
        tracing::info!(provider = self.embedder.name(), count = records.len(), "embedding records");
        let mut pairs = Vec::with_capacity(records.len());
        for record in records {
            record.validate().map_err(VectorDbError::from)?;
            let vector = embed_with_timeout(self.embedder.as_ref(), &record.text, self.timeout).await?;
            pairs.push((record, vector));
        }
        Ok(VectorIndex::build(pairs)?)
    }
}

/// Read records from `path`, choosing the format by extension: `.csv` is a
/// table with a header row, anything else is JSONL.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_records_csv(path)
    } else {
        read_records_jsonl(path)
    }
}

/// Read records from a CSV table, one record per row.
///
/// Header columns become metadata keys in column order and the text is the
/// row's `column: value` lines. An `id` column supplies the record id and is
/// left out of the metadata; without one, rows are numbered `row-01`,
/// `row-02`, ... Errors carry the 1-based file line (the header is line 1).
pub fn read_records_csv(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "reading records CSV");

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let id_col = headers.iter().position(|h| h.eq_ignore_ascii_case("id"));

    let mut out = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        let line = row.position().map_or(i + 2, |p| p.line() as usize);
        let ingest = |message: String| RetrievalError::Ingest { line, message };

        let id = match id_col {
            Some(col) => row.get(col).unwrap_or_default().to_string(),
            None => format!("row-{:02}", i + 1),
        };
        let columns = headers
            .iter()
            .zip(row.iter())
            .enumerate()
            .filter(|(col, _)| Some(*col) != id_col)
            .map(|(_, pair)| pair);
        let metadata = Metadata::try_from_pairs(columns).map_err(|e| ingest(e.to_string()))?;
        let text = metadata
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n");

        let record = Record::new(id, text).with_metadata(metadata);
        record.validate().map_err(|e| ingest(e.to_string()))?;
        out.push(record);
    }
    tracing::info!(count = out.len(), "read records");
    Ok(out)
}

fn csv_error(err: csv::Error) -> RetrievalError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => RetrievalError::Io(e),
        _ => RetrievalError::Ingest { line, message },
    }
}

/// Read records from JSONL: one `{"id", "text", "metadata"?}` object per line.
///
/// Metadata keys keep their order in the file. Blank lines are skipped; the
/// first malformed line fails the read with its 1-based line number.
pub fn read_records_jsonl(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "reading records JSONL");

    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line).map_err(|e| RetrievalError::Ingest {
            line: i + 1,
            message: e.to_string(),
        })?;
        record.validate().map_err(|e| RetrievalError::Ingest {
            line: i + 1,
            message: e.to_string(),
        })?;
        out.push(record);
    }
    tracing::info!(count = out.len(), "read records");
    Ok(out)
}
