//! kmsdb-hybrid
//!
//! The hybrid retrieval engine: weighted-sum fusion of lexical and
//! vector rankings, the index lifecycle manager that keeps the three
//! stores in lockstep under one doc_id space, and the knowledge-base
//! service facade.

pub mod engine;
pub mod fusion;
pub mod service;

pub use engine::{HybridIndex, IndexPaths};
pub use fusion::{fuse, FusionConfig};
pub use service::{build_prompt, KnowledgeService};
