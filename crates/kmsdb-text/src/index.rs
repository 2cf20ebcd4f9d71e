use std::path::Path;

use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{doc, Index, IndexWriter, TantivyDocument};
use tracing::debug;

use kmsdb_core::error::{Error, Result};
use kmsdb_core::types::{DocId, DocumentChunk, SearchHit, SourceKind};

use crate::tantivy_utils::{build_schema, register_tokenizer};

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Term-based inverted index over chunk content, scored by BM25.
///
/// Rebuild is whole-index: `create` wipes any prior directory and every
/// surviving chunk is re-added. `open` reattaches to a persisted
/// generation without reindexing.
pub struct LexicalIndex {
    index: Index,
    // present only for a generation under construction; reopened
    // generations are read-only
    writer: Option<IndexWriter>,
    doc_id_field: tantivy::schema::Field,
    source_field: tantivy::schema::Field,
    sequence_field: tantivy::schema::Field,
    content_field: tantivy::schema::Field,
}

impl LexicalIndex {
    /// Create a fresh index directory for a new generation, discarding
    /// any previous one.
    pub fn create(index_dir: &Path) -> Result<Self> {
        if index_dir.exists() {
            std::fs::remove_dir_all(index_dir)?;
        }
        std::fs::create_dir_all(index_dir)?;
        let index =
            Index::create_in_dir(index_dir, build_schema()).map_err(Error::persistence)?;
        let writer = index.writer(WRITER_HEAP_BYTES).map_err(Error::persistence)?;
        Self::attach(index, Some(writer))
    }

    /// Reopen a persisted generation's index directory, read-only.
    pub fn open(index_dir: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_dir).map_err(Error::persistence)?;
        Self::attach(index, None)
    }

    fn attach(index: Index, writer: Option<IndexWriter>) -> Result<Self> {
        register_tokenizer(&index);
        let schema = index.schema();
        let doc_id_field = schema.get_field("doc_id").map_err(Error::persistence)?;
        let source_field = schema.get_field("source").map_err(Error::persistence)?;
        let sequence_field = schema.get_field("sequence").map_err(Error::persistence)?;
        let content_field = schema.get_field("content").map_err(Error::persistence)?;
        Ok(Self { index, writer, doc_id_field, source_field, sequence_field, content_field })
    }

    fn writer(&mut self) -> Result<&mut IndexWriter> {
        self.writer
            .as_mut()
            .ok_or_else(|| Error::persistence("lexical index was opened read-only"))
    }

    pub fn add(&mut self, doc_id: DocId, chunk: &DocumentChunk) -> Result<()> {
        let document = doc!(
            self.doc_id_field => u64::from(doc_id),
            self.source_field => chunk.source.clone(),
            self.sequence_field => chunk.sequence as u64,
            self.content_field => chunk.content.clone(),
        );
        self.writer()?.add_document(document).map_err(Error::persistence)?;
        Ok(())
    }

    pub fn commit(&mut self) -> Result<()> {
        self.writer()?.commit().map_err(Error::persistence)?;
        Ok(())
    }

    /// Top `limit` chunks by BM25 over the content field, descending.
    ///
    /// A query with no matching terms yields an empty list, and so does
    /// free text the query parser cannot make sense of.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if limit == 0 {
            return Ok(vec![]);
        }
        let reader = self.index.reader().map_err(Error::persistence)?;
        let searcher = reader.searcher();
        let query_parser = QueryParser::for_index(&self.index, vec![self.content_field]);
        let parsed = match query_parser.parse_query(query) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(%err, "query did not parse, treating as no match");
                return Ok(vec![]);
            }
        };
        let top_docs = searcher
            .search(&parsed, &TopDocs::with_limit(limit))
            .map_err(Error::persistence)?;
        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let document: TantivyDocument = searcher.doc(address).map_err(Error::persistence)?;
            let doc_id = document
                .get_first(self.doc_id_field)
                .and_then(|value| value.as_u64())
                .ok_or_else(|| Error::consistency("indexed document without a doc_id"))?;
            hits.push(SearchHit { doc_id: doc_id as DocId, score, source: SourceKind::Lexical });
        }
        Ok(hits)
    }
}
