//! Weighted-sum fusion of two independently normalized ranked lists.

use std::collections::{HashMap, HashSet};

use kmsdb_core::config::AppConfig;
use kmsdb_core::types::{DocId, SearchHit};

/// Fusion policy. The reference weights (0.6 lexical / 0.4 vector) and
/// the 2x over-fetch factor have no documented derivation; they are
/// defaults, not law, and need not sum to 1.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    pub lexical_weight: f32,
    pub vector_weight: f32,
    pub overfetch_factor: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self { lexical_weight: 0.6, vector_weight: 0.4, overfetch_factor: 2 }
    }
}

impl FusionConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            lexical_weight: config.lexical_weight,
            vector_weight: config.vector_weight,
            overfetch_factor: config.overfetch_factor,
        }
    }
}

/// Merge the two hit lists into one ranking.
///
/// Each list is normalized against its own top score, every doc_id seen
/// in either list gets `w_lex * norm_lex + w_vec * norm_vec` (absent
/// list contributes 0), and the result is sorted descending. Equal
/// scores keep discovery order — the lexical list is scanned first —
/// so identical inputs always produce identical output.
pub fn fuse(
    lexical: &[SearchHit],
    vector: &[SearchHit],
    config: &FusionConfig,
) -> Vec<(DocId, f32)> {
    let lexical_norm = normalize_by_max(lexical);
    let vector_norm = normalize_by_max(vector);

    let mut order: Vec<DocId> = Vec::new();
    let mut seen: HashSet<DocId> = HashSet::new();
    for hit in lexical.iter().chain(vector) {
        if seen.insert(hit.doc_id) {
            order.push(hit.doc_id);
        }
    }

    let mut fused: Vec<(DocId, f32)> = order
        .into_iter()
        .map(|doc_id| {
            let lex = lexical_norm.get(&doc_id).copied().unwrap_or(0.0);
            let vec = vector_norm.get(&doc_id).copied().unwrap_or(0.0);
            (doc_id, config.lexical_weight * lex + config.vector_weight * vec)
        })
        .collect();
    // stable sort: ties keep discovery order
    fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    fused
}

/// Divide every score by the list's maximum, yielding values in [0, 1].
/// A maximum of zero is treated as one to avoid dividing by zero.
fn normalize_by_max(hits: &[SearchHit]) -> HashMap<DocId, f32> {
    let mut normalized = HashMap::with_capacity(hits.len());
    if hits.is_empty() {
        return normalized;
    }
    let mut max = 0.0f32;
    for hit in hits {
        if hit.score > max {
            max = hit.score;
        }
    }
    let denominator = if max > 0.0 { max } else { 1.0 };
    for hit in hits {
        normalized.entry(hit.doc_id).or_insert(hit.score / denominator);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmsdb_core::types::SourceKind;

    fn lex(doc_id: DocId, score: f32) -> SearchHit {
        SearchHit { doc_id, score, source: SourceKind::Lexical }
    }

    fn vec_hit(doc_id: DocId, score: f32) -> SearchHit {
        SearchHit { doc_id, score, source: SourceKind::Vector }
    }

    #[test]
    fn doc_in_both_lists_gets_both_weighted_terms() {
        let lexical = vec![lex(0, 8.0), lex(1, 4.0)];
        let vector = vec![vec_hit(1, 0.9), vec_hit(2, 0.3)];
        let fused = fuse(&lexical, &vector, &FusionConfig::default());

        let score_of = |id: DocId| fused.iter().find(|(d, _)| *d == id).map(|(_, s)| *s);
        // doc 1: 0.6 * (4/8) + 0.4 * (0.9/0.9)
        assert!((score_of(1).expect("doc 1") - (0.6 * 0.5 + 0.4)).abs() < 1e-6);
        // doc 0: lexical only, 0.6 * 1.0
        assert!((score_of(0).expect("doc 0") - 0.6).abs() < 1e-6);
        // doc 2: vector only, 0.4 * (0.3/0.9)
        assert!((score_of(2).expect("doc 2") - 0.4 * (0.3 / 0.9)).abs() < 1e-6);
    }

    #[test]
    fn single_list_doc_scores_exactly_its_weighted_term() {
        let lexical = vec![lex(5, 3.0)];
        let fused = fuse(&lexical, &[], &FusionConfig::default());
        assert_eq!(fused.len(), 1);
        assert!((fused[0].1 - 0.6).abs() < 1e-6);
    }

    #[test]
    fn equal_scores_keep_discovery_order() {
        // within one list: both normalize to 1.0
        let lexical = vec![lex(4, 2.0), lex(9, 2.0)];
        let fused = fuse(&lexical, &[], &FusionConfig::default());
        assert_eq!(fused.iter().map(|(d, _)| *d).collect::<Vec<_>>(), vec![4, 9]);

        // across lists: 0.6 * 0.5 == 0.4 * 0.75, lexical discovery wins
        let lexical = vec![lex(5, 2.0), lex(6, 1.0)];
        let vector = vec![vec_hit(8, 2.0), vec_hit(9, 1.5)];
        let fused = fuse(&lexical, &vector, &FusionConfig::default());
        let pos = |id: DocId| fused.iter().position(|(d, _)| *d == id).expect("present");
        assert!((fused[pos(6)].1 - fused[pos(9)].1).abs() < 1e-6, "crafted tie");
        assert!(pos(6) < pos(9));
    }

    #[test]
    fn both_lists_empty_fuse_to_nothing() {
        assert!(fuse(&[], &[], &FusionConfig::default()).is_empty());
    }

    #[test]
    fn zero_max_score_does_not_divide_by_zero() {
        let lexical = vec![lex(0, 0.0), lex(1, 0.0)];
        let fused = fuse(&lexical, &[], &FusionConfig::default());
        assert_eq!(fused.len(), 2);
        for (_, score) in fused {
            assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn ranking_is_descending() {
        let lexical = vec![lex(0, 1.0), lex(1, 5.0), lex(2, 3.0)];
        let vector = vec![vec_hit(2, 0.8), vec_hit(3, 0.2)];
        let fused = fuse(&lexical, &vector, &FusionConfig::default());
        for pair in fused.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
