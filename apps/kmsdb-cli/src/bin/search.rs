use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use kmsdb_core::config::AppConfig;
use kmsdb_embed::HashEmbedder;
use kmsdb_hybrid::KnowledgeService;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: kmsdb-search <query> [top_k]");
        std::process::exit(1);
    }
    let query = &args[0];
    let top_k: usize = args.get(1).and_then(|v| v.parse().ok()).unwrap_or(5);

    let config = AppConfig::load()?;
    let embedder = Arc::new(HashEmbedder::new(config.embedding_dim));
    let service = KnowledgeService::from_config(&config, embedder, None)?;
    if !service.index().load()? {
        eprintln!("Index is empty. Run kmsdb-ingest first.");
        std::process::exit(1);
    }

    let results = service.search(query, top_k)?;
    println!("🔍 Found {} results for \"{}\"", results.len(), query);
    for (i, result) in results.iter().enumerate() {
        let snippet: String = result.content.chars().take(160).collect();
        println!(
            "\n  {}. score={:.4}  doc_id={}  source={}  chunk={}",
            i + 1,
            result.score,
            result.doc_id,
            result.source,
            result.sequence
        );
        println!("     {}", snippet);
    }
    Ok(())
}
