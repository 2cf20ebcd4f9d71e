//! Built-in plain-text extraction. Richer formats (PDF, tabular,
//! word-processor) plug in behind the same `TextExtractor` seam.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::traits::TextExtractor;

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Reads `.txt` and `.md` files, falling back to lossy UTF-8 for files
/// with stray invalid bytes.
#[derive(Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(path).map_err(|err| Error::extraction(path, err))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supports_known_extensions_case_insensitively() {
        let extractor = PlainTextExtractor::new();
        assert!(extractor.supports(Path::new("notes/a.txt")));
        assert!(extractor.supports(Path::new("notes/b.MD")));
        assert!(!extractor.supports(Path::new("notes/c.pdf")));
        assert!(!extractor.supports(Path::new("notes/no_extension")));
    }

    #[test]
    fn missing_file_is_an_extraction_error() {
        let extractor = PlainTextExtractor::new();
        let err = extractor.extract_text(Path::new("/nonexistent/zz.txt")).unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
    }
}
