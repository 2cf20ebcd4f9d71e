//! Domain types shared by the lexical and vector engines.

use serde::{Deserialize, Serialize};

/// Dense identifier of a chunk within one index generation, assigned in
/// chunk-stream order. Join key across the lexical index, the vector
/// index, and the metadata store; always equals the chunk's position in
/// the metadata table. Never reused within a generation.
pub type DocId = u32;

/// A fragment of a source document, produced by the chunker.
///
/// - `source`: identifier of the originating file
/// - `sequence`: position within the source; restarts at 0 per source
/// - `content`: the text payload, already trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub source: String,
    pub sequence: usize,
    pub content: String,
}

/// One row of the metadata store. `doc_id` is redundant with the row's
/// position in the table and is validated on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub doc_id: DocId,
    pub source: String,
    pub sequence: usize,
    pub content: String,
}

/// Indicates which engine produced a hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Lexical,
    Vector,
}

/// The minimal surface returned by both engines. `score` is
/// engine-specific but higher is always better.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub source: SourceKind,
}

/// Externally visible retrieval result. `score` is the fused score and
/// has no absolute meaning beyond this query's ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub score: f32,
    pub content: String,
    pub source: String,
    pub sequence: usize,
}
