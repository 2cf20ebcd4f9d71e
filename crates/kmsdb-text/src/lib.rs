//! kmsdb-text
//!
//! Tantivy-based lexical indexing and BM25 search over chunk content.
//! One index directory per generation; rebuilds are whole-index.

pub mod index;
pub mod tantivy_utils;

pub use index::LexicalIndex;
