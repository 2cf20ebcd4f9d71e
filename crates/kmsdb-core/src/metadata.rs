//! Ordered metadata table. The single source of truth for what a doc_id
//! is within the current generation.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{DocId, DocumentChunk, MetadataRecord};

/// Append-only table of `MetadataRecord`s where `doc_id` equals the
/// record's position. Rebuilt whole per generation, never merged.
#[derive(Debug, Default)]
pub struct MetadataStore {
    records: Vec<MetadataRecord>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return the doc_id assigned to it: the next
    /// dense integer, identical to the record's position.
    pub fn push(&mut self, chunk: &DocumentChunk) -> DocId {
        let doc_id = self.records.len() as DocId;
        self.records.push(MetadataRecord {
            doc_id,
            source: chunk.source.clone(),
            sequence: chunk.sequence,
            content: chunk.content.clone(),
        });
        doc_id
    }

    pub fn get(&self, doc_id: DocId) -> Option<&MetadataRecord> {
        self.records.get(doc_id as usize)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let payload = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, payload)?;
        debug!(records = self.records.len(), path = %path.display(), "metadata store saved");
        Ok(())
    }

    /// Reload a persisted table, verifying the positional invariant.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let records: Vec<MetadataRecord> = serde_json::from_str(&text)?;
        for (position, record) in records.iter().enumerate() {
            if record.doc_id as usize != position {
                return Err(Error::consistency(format!(
                    "metadata record at position {position} carries doc_id {}",
                    record.doc_id
                )));
            }
        }
        Ok(Self { records })
    }
}
