use kmsdb_core::error::{Error, Result};
use kmsdb_core::types::{DocId, SearchHit, SourceKind};

/// Exact inner-product index over unit vectors, stored row-major in one
/// contiguous buffer. Vectors are normalized on the way in so inner
/// product equals cosine similarity in [-1, 1].
#[derive(Debug)]
pub struct FlatVectorIndex {
    dim: usize,
    doc_ids: Vec<DocId>,
    data: Vec<f32>,
}

impl FlatVectorIndex {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::invalid_config("vector dimension must be positive"));
        }
        Ok(Self { dim, doc_ids: Vec::new(), data: Vec::new() })
    }

    pub(crate) fn from_parts(dim: usize, doc_ids: Vec<DocId>, data: Vec<f32>) -> Self {
        Self { dim, doc_ids, data }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    pub(crate) fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    pub(crate) fn data(&self) -> &[f32] {
        &self.data
    }

    /// Append `vector` for `doc_id`, normalizing it to unit length.
    pub fn add(&mut self, doc_id: DocId, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::embedding(format!(
                "vector for doc_id {doc_id} has dimension {}, index expects {}",
                vector.len(),
                self.dim
            )));
        }
        let mut vector = vector;
        normalize(&mut vector);
        self.doc_ids.push(doc_id);
        self.data.extend_from_slice(&vector);
        Ok(())
    }

    /// Exact scan for the `limit` nearest vectors by inner product,
    /// descending; ties keep insertion order. The query is normalized
    /// before scoring.
    pub fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dim {
            return Err(Error::embedding(format!(
                "query vector has dimension {}, index expects {}",
                query.len(),
                self.dim
            )));
        }
        if self.is_empty() || limit == 0 {
            return Ok(vec![]);
        }
        let mut query = query.to_vec();
        normalize(&mut query);

        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dim)
            .zip(&self.doc_ids)
            .map(|(row, &doc_id)| {
                let score = row.iter().zip(&query).map(|(a, b)| a * b).sum();
                SearchHit { doc_id, score, source: SourceKind::Vector }
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ranks_first() {
        let mut index = FlatVectorIndex::new(3).expect("new");
        index.add(0, vec![1.0, 0.0, 0.0]).expect("add");
        index.add(1, vec![0.0, 1.0, 0.0]).expect("add");
        index.add(2, vec![1.0, 0.1, 0.0]).expect("add");

        let hits = index.search(&[1.0, 0.0, 0.0], 2).expect("search");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, 0);
        assert_eq!(hits[1].doc_id, 2);
        assert!(hits[0].score > 0.99);
    }

    #[test]
    fn stored_vectors_are_normalized() {
        let mut index = FlatVectorIndex::new(2).expect("new");
        // same direction, very different magnitudes
        index.add(0, vec![100.0, 0.0]).expect("add");
        index.add(1, vec![0.001, 0.0]).expect("add");

        let hits = index.search(&[5.0, 0.0], 2).expect("search");
        assert!((hits[0].score - 1.0).abs() < 1e-5);
        assert!((hits[1].score - 1.0).abs() < 1e-5);
        // equal scores keep insertion order
        assert_eq!(hits[0].doc_id, 0);
        assert_eq!(hits[1].doc_id, 1);
    }

    #[test]
    fn scores_stay_within_cosine_bounds() {
        let mut index = FlatVectorIndex::new(2).expect("new");
        index.add(0, vec![1.0, 0.0]).expect("add");
        index.add(1, vec![-1.0, 0.0]).expect("add");

        let hits = index.search(&[1.0, 0.0], 2).expect("search");
        assert!((hits[0].score - 1.0).abs() < 1e-5);
        assert!((hits[1].score + 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_index_yields_no_hits() {
        let index = FlatVectorIndex::new(4).expect("new");
        assert!(index.search(&[1.0, 0.0, 0.0, 0.0], 5).expect("search").is_empty());
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut index = FlatVectorIndex::new(3).expect("new");
        assert!(matches!(index.add(0, vec![1.0, 0.0]).unwrap_err(), Error::Embedding(_)));
        index.add(0, vec![1.0, 0.0, 0.0]).expect("add");
        assert!(matches!(index.search(&[1.0], 1).unwrap_err(), Error::Embedding(_)));
    }

    #[test]
    fn limit_caps_results() {
        let mut index = FlatVectorIndex::new(2).expect("new");
        for i in 0..20u32 {
            let angle = i as f32 * 0.1;
            index.add(i, vec![angle.cos(), angle.sin()]).expect("add");
        }
        let hits = index.search(&[1.0, 0.0], 5).expect("search");
        assert_eq!(hits.len(), 5);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
