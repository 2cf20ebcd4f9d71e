//! Knowledge-base facade: directory ingestion on one side, retrieval
//! and answer generation on the other.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use kmsdb_core::chunker::DirectoryLoader;
use kmsdb_core::config::AppConfig;
use kmsdb_core::error::Result;
use kmsdb_core::extract::PlainTextExtractor;
use kmsdb_core::traits::{AnswerGenerator, Embedder};
use kmsdb_core::types::SearchResult;

use crate::engine::{HybridIndex, IndexPaths};
use crate::fusion::FusionConfig;

/// Facade over the hybrid index and the answer-generation collaborator.
/// All collaborators are injected at construction; there is no hidden
/// global state.
pub struct KnowledgeService {
    index: HybridIndex,
    loader: DirectoryLoader,
    generator: Option<Box<dyn AnswerGenerator>>,
}

impl KnowledgeService {
    pub fn new(
        index: HybridIndex,
        loader: DirectoryLoader,
        generator: Option<Box<dyn AnswerGenerator>>,
    ) -> Self {
        Self { index, loader, generator }
    }

    /// Wire the service from configuration: plain-text extraction,
    /// stores under the configured data directory, fusion policy from
    /// the config's weights.
    pub fn from_config(
        config: &AppConfig,
        embedder: Arc<dyn Embedder>,
        generator: Option<Box<dyn AnswerGenerator>>,
    ) -> Result<Self> {
        config.validate()?;
        config.ensure_directories()?;
        let loader = DirectoryLoader::new(
            Box::new(PlainTextExtractor::new()),
            config.chunk_size,
            config.chunk_overlap,
        );
        let index = HybridIndex::new(
            IndexPaths::from_config(config),
            embedder,
            FusionConfig::from_app_config(config),
        );
        Ok(Self::new(index, loader, generator))
    }

    pub fn index(&self) -> &HybridIndex {
        &self.index
    }

    /// Rebuild the whole index from the files under `data_dir`.
    pub fn rebuild_from_directory(&self, data_dir: &Path) -> Result<usize> {
        let chunks = self.loader.load(data_dir)?;
        let count = self.index.ingest(&chunks)?;
        info!(dir = %data_dir.display(), chunks = count, "rebuilt index from directory");
        Ok(count)
    }

    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        self.index.search(query, top_k)
    }

    /// Retrieve top-k contexts for `question` and pass them to the
    /// answer collaborator. No retrieval hits means no generator call
    /// and an empty answer, matching "I found nothing" semantics.
    pub fn answer_question(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<(String, Vec<SearchResult>)> {
        let results = self.index.search(question, top_k)?;
        if results.is_empty() {
            return Ok((String::new(), results));
        }
        let answer = match &self.generator {
            Some(generator) => {
                let contexts: Vec<String> =
                    results.iter().map(|result| result.content.clone()).collect();
                generator.generate_answer(question, &contexts)?
            }
            None => String::new(),
        };
        Ok((answer, results))
    }
}

/// Render the retrieval contexts into the canonical answering prompt.
pub fn build_prompt(question: &str, contexts: &[String]) -> String {
    let context_text = contexts.join("\n---\n");
    format!(
        "You are an enterprise knowledge base assistant. Use the provided context to \
         answer the question. If the answer cannot be determined, say that you do not know.\n\
         Question: {question}\n\
         Context:\n{context_text}\n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_joins_contexts_with_separators() {
        let prompt = build_prompt(
            "how do I start a fire?",
            &["use dry tinder".to_string(), "strike the flint".to_string()],
        );
        assert!(prompt.contains("Question: how do I start a fire?"));
        assert!(prompt.contains("use dry tinder\n---\nstrike the flint"));
        assert!(prompt.ends_with("Answer:"));
    }
}
