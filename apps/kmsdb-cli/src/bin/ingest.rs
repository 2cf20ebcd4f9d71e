use std::sync::Arc;
use std::time::Duration;
use std::{env, path::PathBuf};

use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use kmsdb_core::config::AppConfig;
use kmsdb_embed::HashEmbedder;
use kmsdb_hybrid::KnowledgeService;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(corpus_dir) = args.iter().find(|a| !a.starts_with('-')).map(PathBuf::from) else {
        eprintln!("Usage: kmsdb-ingest <corpus_dir>");
        std::process::exit(1);
    };

    println!("kmsdb Indexer\n=============");
    println!("Corpus directory: {}", corpus_dir.display());
    println!("Data directory:   {}", config.data_dir().display());

    let embedder = Arc::new(HashEmbedder::new(config.embedding_dim));
    let service = KnowledgeService::from_config(&config, embedder, None)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("chunking, embedding, indexing...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let count = service.rebuild_from_directory(&corpus_dir)?;
    spinner.finish_and_clear();

    if count == 0 {
        println!("No chunks produced; the index is empty.");
    } else {
        println!("✅ Indexed {} chunks", count);
        println!("💡 To search, use: cargo run --bin kmsdb-search '<query>'");
    }
    Ok(())
}
