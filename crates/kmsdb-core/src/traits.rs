//! Collaborator contracts. The engine calls these; it does not implement
//! the real backends (embedding model, answer model, rich file formats).

use std::path::Path;

use crate::error::Result;

/// Per-file text extraction. A failure is recovered locally by the
/// directory loader: the file is logged and skipped, ingestion continues.
pub trait TextExtractor: Send + Sync {
    /// Whether this extractor understands the file at `path`.
    fn supports(&self, path: &Path) -> bool;
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Text-to-vector embedding. Must produce `dim()`-sized vectors and be
/// deterministic for equal input within one process lifetime.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Answer generation over retrieved contexts; a pure function of its
/// inputs from the engine's perspective. Selected by configuration and
/// injected at construction.
pub trait AnswerGenerator: Send + Sync {
    fn generate_answer(&self, question: &str, contexts: &[String]) -> Result<String>;
}
