//! kmsdb-embed
//!
//! Embedding backends behind the `Embedder` seam. The real sentence
//! model is an external collaborator; this crate ships a deterministic
//! feature-hashing embedder for tests and offline runs, so the rest of
//! the engine can be exercised without model weights.

use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use kmsdb_core::error::Result;
use kmsdb_core::traits::Embedder;

/// Deterministic bag-of-words embedder: each lowercased token hashes to
/// one bucket of the output vector, then the vector is L2-normalized.
/// Equal input always yields equal output, tokens shared between two
/// texts pull their vectors together.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dim];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let lowered = token.to_lowercase();
            let mut hasher = XxHash64::with_seed(0);
            lowered.hash(&mut hasher);
            let hashed = hasher.finish();
            let bucket = (hashed as usize) % self.dim;
            let weight = (((hashed >> 32) as u32) as f32) / (u32::MAX as f32);
            vector[bucket] += 0.5 + weight;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_input_embeds_identically() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed_batch(&["starting a camp fire".to_string()]).expect("embed");
        let b = embedder.embed_batch(&["starting a camp fire".to_string()]).expect("embed");
        assert_eq!(a, b);
    }

    #[test]
    fn vectors_are_unit_length() {
        let embedder = HashEmbedder::new(64);
        let vectors = embedder
            .embed_batch(&["one two three".to_string(), "four".to_string()])
            .expect("embed");
        for vector in vectors {
            assert_eq!(vector.len(), 64);
            let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn shared_tokens_beat_disjoint_tokens() {
        let embedder = HashEmbedder::new(128);
        let texts = vec![
            "boiling water for purification".to_string(),
            "boiling water kills bacteria".to_string(),
            "sharpening an axe blade".to_string(),
        ];
        let vectors = embedder.embed_batch(&texts).expect("embed");
        let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
        assert!(dot(&vectors[0], &vectors[1]) > dot(&vectors[0], &vectors[2]));
    }

    #[test]
    fn empty_text_embeds_to_the_zero_vector() {
        let embedder = HashEmbedder::new(16);
        let vectors = embedder.embed_batch(&["   ".to_string()]).expect("embed");
        assert!(vectors[0].iter().all(|&x| x == 0.0));
    }
}
