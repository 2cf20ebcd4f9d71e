use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use kmsdb_core::config::AppConfig;
use kmsdb_core::error::Result;
use kmsdb_core::traits::AnswerGenerator;
use kmsdb_embed::HashEmbedder;
use kmsdb_hybrid::KnowledgeService;

/// Offline stand-in for a model-backed answering client: answers with
/// the best-ranked retrieved context verbatim.
struct ExtractiveAnswerer;

impl AnswerGenerator for ExtractiveAnswerer {
    fn generate_answer(&self, _question: &str, contexts: &[String]) -> Result<String> {
        Ok(contexts.first().cloned().unwrap_or_default())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: kmsdb-ask <question> [top_k]");
        std::process::exit(1);
    }
    let question = &args[0];
    let top_k: usize = args.get(1).and_then(|v| v.parse().ok()).unwrap_or(5);

    let config = AppConfig::load()?;
    let embedder = Arc::new(HashEmbedder::new(config.embedding_dim));
    let service =
        KnowledgeService::from_config(&config, embedder, Some(Box::new(ExtractiveAnswerer)))?;
    if !service.index().load()? {
        eprintln!("Index is empty. Run kmsdb-ingest first.");
        std::process::exit(1);
    }

    let (answer, results) = service.answer_question(question, top_k)?;
    if results.is_empty() {
        println!("No relevant context found for \"{}\"", question);
        return Ok(());
    }
    println!("💬 {}", answer);
    println!("\nSupporting chunks:");
    for result in &results {
        println!("  - {} (chunk {}, score {:.4})", result.source, result.sequence, result.score);
    }
    Ok(())
}
