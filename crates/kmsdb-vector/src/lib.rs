//! kmsdb-vector
//!
//! Flat (exact) similarity index over L2-normalized embedding vectors.
//! Search is an O(N·d) inner-product scan — the deliberate tradeoff for
//! a single-user/team corpus, not a defect. Persisted as one binary
//! blob per generation, reloadable without re-embedding.

pub mod index;
pub mod storage;

pub use index::FlatVectorIndex;
