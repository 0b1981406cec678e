//! Full-corpus similarity index
//!
//! Position `i` in the index is document `i` of the corpus it was built
//! from; for the catalog index that is catalog row `i`.

use crate::tfidf::{TfidfConfig, TfidfVectorizer};
use crate::vector::SparseVector;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;

/// A corpus position with its cosine similarity to the query document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub score: f32,
}

pub struct SimilarityIndex {
    vectorizer: TfidfVectorizer,
    vectors: Vec<SparseVector>,
}

impl SimilarityIndex {
    /// Fit TF-IDF over `documents` and vectorize each one
    pub fn build<S: AsRef<str>>(documents: &[S], config: TfidfConfig) -> Self {
        let (vectorizer, vectors) = TfidfVectorizer::fit_transform(documents, config);
        if vectorizer.vocabulary_size() == 0 && !documents.is_empty() {
            tracing::warn!(
                "Empty vocabulary over {} documents; all similarities will be zero",
                documents.len()
            );
        }
        Self { vectorizer, vectors }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    pub fn vector(&self, position: usize) -> Option<&SparseVector> {
        self.vectors.get(position)
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Cosine similarity of `target` against every document, itself included.
    /// Empty when `target` is out of range.
    pub fn similarities(&self, target: usize) -> Vec<f32> {
        let Some(query) = self.vectors.get(target) else {
            return Vec::new();
        };
        // stored vectors are unit length or empty, so the dot product is the cosine
        self.vectors.par_iter().map(|v| query.dot(v)).collect()
    }

    /// The `k` most similar documents to `target`, excluding `target`.
    ///
    /// Ordered by similarity descending; equal scores keep corpus order.
    /// If `k` covers the corpus, every other document is returned.
    pub fn nearest(&self, target: usize, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        let mut neighbors: Vec<Neighbor> = self
            .similarities(target)
            .into_iter()
            .enumerate()
            .filter(|&(position, _)| position != target)
            .map(|(position, score)| Neighbor { position, score })
            .collect();

        neighbors.sort_by_key(|n| (Reverse(OrderedFloat(n.score)), n.position));
        neighbors.truncate(k);
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(docs: &[&str]) -> SimilarityIndex {
        SimilarityIndex::build(docs, TfidfConfig::default())
    }

    #[test]
    fn test_nearest_excludes_target() {
        let idx = index(&["red shoe Shoe A", "blue shoe Shoe B"]);
        let result = idx.nearest(0, 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].position, 1);
    }

    #[test]
    fn test_nearest_orders_by_similarity() {
        let idx = index(&[
            "leather hiking boot",
            "cotton summer dress",
            "leather hiking boot waterproof",
            "leather wallet",
        ]);
        let result = idx.nearest(0, 10);
        let positions: Vec<usize> = result.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![2, 3, 1]);
        assert!(result.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_prefer_lower_position() {
        let idx = index(&["green mug", "green mug", "green mug", "steel spoon"]);
        let result = idx.nearest(1, 3);
        let positions: Vec<usize> = result.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![0, 2, 3]);
        assert!((result[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_k_larger_than_corpus() {
        let idx = index(&["alpha beta", "beta gamma", "gamma delta"]);
        assert_eq!(idx.nearest(2, 100).len(), 2);
        assert!(idx.nearest(2, 0).is_empty());
    }

    #[test]
    fn test_empty_vocabulary_falls_back_to_position_order() {
        let idx = index(&["the", "and", "of"]);
        let positions: Vec<usize> = idx.nearest(1, 5).iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_out_of_range_target() {
        let idx = index(&["alpha beta"]);
        assert!(idx.similarities(5).is_empty());
        assert!(idx.nearest(5, 3).is_empty());
    }
}
