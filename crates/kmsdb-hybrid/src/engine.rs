//! Index lifecycle manager and hybrid retriever.
//!
//! Owns the three stores (lexical index, vector index, metadata table)
//! as one atomically replaceable generation. Mutations hold the write
//! lock for their whole span and queries hold the read lock for theirs,
//! so a query always observes one consistent generation and concurrent
//! queries against an unchanging generation run in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use kmsdb_core::config::AppConfig;
use kmsdb_core::error::{Error, Result};
use kmsdb_core::metadata::MetadataStore;
use kmsdb_core::traits::Embedder;
use kmsdb_core::types::{DocumentChunk, SearchResult};
use kmsdb_text::LexicalIndex;
use kmsdb_vector::FlatVectorIndex;

use crate::fusion::{fuse, FusionConfig};

/// On-disk locations of the three stores, all under one data directory.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub lexical_dir: PathBuf,
    pub vector_path: PathBuf,
    pub metadata_path: PathBuf,
}

impl IndexPaths {
    pub fn under(data_dir: &Path) -> Self {
        Self {
            lexical_dir: data_dir.join("lexical"),
            vector_path: data_dir.join("vectors.bin"),
            metadata_path: data_dir.join("metadata.json"),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            lexical_dir: config.lexical_index_dir(),
            vector_path: config.vector_index_path(),
            metadata_path: config.metadata_store_path(),
        }
    }
}

/// One complete build of all three stores. Created together, destroyed
/// together; doc_ids are meaningless across generations.
struct Generation {
    lexical: LexicalIndex,
    vector: FlatVectorIndex,
    metadata: MetadataStore,
}

/// The unified retrieval interface over the lexical and vector indices.
///
/// State machine: Empty -> Ready (successful ingest) -> Empty (reset)
/// -> Ready (rebuild). A failed rebuild always lands back in Empty;
/// queries never see a half-built generation.
pub struct HybridIndex {
    paths: IndexPaths,
    embedder: Arc<dyn Embedder>,
    fusion: FusionConfig,
    current: RwLock<Option<Generation>>,
}

impl HybridIndex {
    /// Starts Empty; use `load` to attach a previously persisted
    /// generation or `ingest` to build one.
    pub fn new(paths: IndexPaths, embedder: Arc<dyn Embedder>, fusion: FusionConfig) -> Self {
        Self { paths, embedder, fusion, current: RwLock::new(None) }
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Number of chunks in the current generation, 0 when Empty.
    pub fn doc_count(&self) -> usize {
        self.current.read().as_ref().map_or(0, |generation| generation.metadata.len())
    }

    /// Clear all three stores, in memory and on disk, as one unit.
    pub fn reset(&self) -> Result<()> {
        let mut guard = self.current.write();
        Self::clear_stores(&self.paths, &mut guard)
    }

    /// Rebuild the whole index from `chunks`, assigning fresh dense
    /// doc_ids in stream order. The prior generation is discarded
    /// first; an empty stream leaves the index Empty rather than Ready.
    pub fn ingest(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        let mut guard = self.current.write();
        Self::clear_stores(&self.paths, &mut guard)?;
        if chunks.is_empty() {
            warn!("no chunks provided; index generation stays empty");
            return Ok(0);
        }
        // guard holds None here, so any failure below leaves us Empty
        let generation = self.build_generation(chunks)?;
        let count = generation.metadata.len();
        *guard = Some(generation);
        info!(chunks = count, "published new index generation");
        Ok(count)
    }

    /// Reattach a persisted generation without re-embedding. Returns
    /// false (staying Empty) when nothing has been persisted yet.
    pub fn load(&self) -> Result<bool> {
        let mut guard = self.current.write();
        if !self.paths.metadata_path.exists() || !self.paths.vector_path.exists() {
            return Ok(false);
        }
        let metadata = MetadataStore::load(&self.paths.metadata_path)?;
        let vector = FlatVectorIndex::load(&self.paths.vector_path)?;
        let lexical = LexicalIndex::open(&self.paths.lexical_dir)?;
        if vector.len() != metadata.len() {
            return Err(Error::consistency(format!(
                "vector index holds {} vectors but metadata store holds {} records",
                vector.len(),
                metadata.len()
            )));
        }
        if vector.dim() != self.embedder.dim() {
            return Err(Error::consistency(format!(
                "persisted vectors have dimension {} but the embedder produces {}",
                vector.dim(),
                self.embedder.dim()
            )));
        }
        let count = metadata.len();
        *guard = Some(Generation { lexical, vector, metadata });
        info!(chunks = count, "loaded persisted index generation");
        Ok(true)
    }

    /// Top-k retrieval: over-fetch from both indices, fuse, resolve
    /// against the metadata store.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if top_k == 0 {
            return Err(Error::invalid_config("top_k must be positive"));
        }
        let guard = self.current.read();
        let generation = guard.as_ref().ok_or(Error::IndexNotReady)?;

        let limit = top_k.saturating_mul(self.fusion.overfetch_factor.max(1));
        let lexical_hits = generation.lexical.search(query, limit)?;
        let query_vector = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .pop()
            .ok_or_else(|| Error::embedding("embedder returned no vector for the query"))?;
        let vector_hits = generation.vector.search(&query_vector, limit)?;

        let mut fused = fuse(&lexical_hits, &vector_hits, &self.fusion);
        fused.truncate(top_k);

        let mut results = Vec::with_capacity(fused.len());
        for (doc_id, score) in fused {
            let record = generation.metadata.get(doc_id).ok_or_else(|| {
                Error::consistency(format!(
                    "doc_id {doc_id} returned by a sub-index has no metadata entry"
                ))
            })?;
            results.push(SearchResult {
                doc_id,
                score,
                content: record.content.clone(),
                source: record.source.clone(),
                sequence: record.sequence,
            });
        }
        Ok(results)
    }

    fn build_generation(&self, chunks: &[DocumentChunk]) -> Result<Generation> {
        if let Some(data_dir) = self.paths.vector_path.parent() {
            fs::create_dir_all(data_dir)?;
        }
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let mut lexical = LexicalIndex::create(&self.paths.lexical_dir)?;
        let mut vector = FlatVectorIndex::new(self.embedder.dim())?;
        let mut metadata = MetadataStore::new();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            let doc_id = metadata.push(chunk);
            lexical.add(doc_id, chunk)?;
            vector.add(doc_id, embedding)?;
        }
        lexical.commit()?;
        vector.save(&self.paths.vector_path)?;
        metadata.save(&self.paths.metadata_path)?;
        Ok(Generation { lexical, vector, metadata })
    }

    fn clear_stores(paths: &IndexPaths, guard: &mut Option<Generation>) -> Result<()> {
        *guard = None;
        if paths.lexical_dir.exists() {
            fs::remove_dir_all(&paths.lexical_dir)?;
        }
        if paths.vector_path.exists() {
            fs::remove_file(&paths.vector_path)?;
        }
        if paths.metadata_path.exists() {
            fs::remove_file(&paths.metadata_path)?;
        }
        Ok(())
    }
}
