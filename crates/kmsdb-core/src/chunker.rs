//! Sliding-window chunking and directory ingestion.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::traits::TextExtractor;
use crate::types::DocumentChunk;

/// Split `text` into overlapping fragments of at most `size` characters.
///
/// The window starts at offset 0 and advances by `size - overlap`;
/// fragments are trimmed of surrounding whitespace and dropped when
/// empty. The tail fragment may be shorter than `size`. `overlap >= size`
/// would produce a non-advancing window and fails fast instead.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    if size == 0 || overlap >= size {
        return Err(Error::InvalidChunking { size, overlap });
    }
    let chars: Vec<char> = text.chars().collect();
    let stride = size - overlap;
    let mut fragments = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        let fragment: String = chars[start..end].iter().collect();
        let trimmed = fragment.trim();
        if !trimmed.is_empty() {
            fragments.push(trimmed.to_string());
        }
        start += stride;
    }
    Ok(fragments)
}

/// Walks a corpus directory and turns every supported file into an
/// ordered stream of chunks, numbered per source.
pub struct DirectoryLoader {
    extractor: Box<dyn TextExtractor>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl DirectoryLoader {
    pub fn new(extractor: Box<dyn TextExtractor>, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { extractor, chunk_size, chunk_overlap }
    }

    /// Produce the chunk stream for `data_dir`, in sorted file order.
    ///
    /// A file that fails extraction is logged and skipped; the rest of
    /// the batch continues. Bad chunking parameters abort the whole call.
    pub fn load(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidChunking {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        if !data_dir.is_dir() {
            return Err(Error::extraction(data_dir, "not a directory"));
        }

        let files = self.list_supported_files(data_dir);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no supported files found during indexing");
            return Ok(vec![]);
        }

        let mut chunks = Vec::new();
        for file_path in &files {
            let text = match self.extractor.extract_text(file_path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(file = %file_path.display(), %err, "failed to load file, skipping");
                    continue;
                }
            };
            let source = file_path.to_string_lossy().to_string();
            for (sequence, content) in
                chunk_text(&text, self.chunk_size, self.chunk_overlap)?.into_iter().enumerate()
            {
                chunks.push(DocumentChunk { source: source.clone(), sequence, content });
            }
        }
        info!(files = files.len(), chunks = chunks.len(), "processed corpus directory");
        Ok(chunks)
    }

    fn list_supported_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| self.extractor.supports(p))
            .collect();
        files.sort();
        files
    }
}
