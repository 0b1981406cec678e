//! TF-IDF term weighting
//!
//! Fits a vocabulary and inverse document frequencies over a corpus, then
//! maps documents to L2-normalized sparse vectors. Weights are always
//! relative to the corpus the vectorizer was fit on.

use crate::text::{tokenize, ENGLISH_STOP_WORDS};
use crate::vector::SparseVector;
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeSet;

/// Which terms are dropped before weighting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StopWords {
    #[default]
    English,
    None,
    Custom(Vec<String>),
}

/// Inverse document frequency formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdfMode {
    /// `ln((1 + n) / (1 + df)) + 1`
    #[default]
    Smooth,
    /// `ln(n / df)`; a term present in every document weighs zero
    Plain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TfidfConfig {
    pub stop_words: StopWords,
    pub idf: IdfMode,
    pub min_token_len: usize,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            stop_words: StopWords::English,
            idf: IdfMode::Smooth,
            min_token_len: 2,
        }
    }
}

enum StopFilter {
    English,
    None,
    Custom(AHashSet<String>),
}

impl StopFilter {
    fn new(stop_words: &StopWords) -> Self {
        match stop_words {
            StopWords::English => StopFilter::English,
            StopWords::None => StopFilter::None,
            StopWords::Custom(words) => {
                StopFilter::Custom(words.iter().map(|w| w.to_lowercase()).collect())
            }
        }
    }

    #[inline]
    fn is_stop(&self, term: &str) -> bool {
        match self {
            StopFilter::English => ENGLISH_STOP_WORDS.binary_search(&term).is_ok(),
            StopFilter::None => false,
            StopFilter::Custom(words) => words.contains(term),
        }
    }
}

/// A fitted TF-IDF model
pub struct TfidfVectorizer {
    config: TfidfConfig,
    stop: StopFilter,
    // term -> dimension, dimensions assigned in alphabetical term order
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit vocabulary and IDF weights over `documents`
    pub fn fit<S: AsRef<str>>(documents: &[S], config: TfidfConfig) -> Self {
        let stop = StopFilter::new(&config.stop_words);
        let n_docs = documents.len() as f32;

        let mut doc_freq: AHashMap<String, u32> = AHashMap::new();
        for doc in documents {
            let unique: AHashSet<String> = tokenize(doc.as_ref(), config.min_token_len)
                .into_iter()
                .filter(|t| !stop.is_stop(t))
                .collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let terms: BTreeSet<&String> = doc_freq.keys().collect();
        let mut vocabulary = AHashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (dim, term) in terms.into_iter().enumerate() {
            let df = doc_freq[term] as f32;
            let weight = match config.idf {
                IdfMode::Smooth => ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0,
                IdfMode::Plain => (n_docs / df).ln(),
            };
            vocabulary.insert(term.clone(), dim as u32);
            idf.push(weight);
        }

        Self {
            config,
            stop,
            vocabulary,
            idf,
        }
    }

    /// Raw term counts times IDF, L2-normalized. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: AHashMap<u32, f32> = AHashMap::new();
        for token in tokenize(document, self.config.min_token_len) {
            if self.stop.is_stop(&token) {
                continue;
            }
            if let Some(&dim) = self.vocabulary.get(&token) {
                *counts.entry(dim).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(dim, tf)| (dim, tf * self.idf[dim as usize]))
            .collect();
        SparseVector::from_pairs(pairs).normalized()
    }

    pub fn fit_transform<S: AsRef<str>>(
        documents: &[S],
        config: TfidfConfig,
    ) -> (Self, Vec<SparseVector>) {
        let vectorizer = Self::fit(documents, config);
        let vectors = documents
            .iter()
            .map(|d| vectorizer.transform(d.as_ref()))
            .collect();
        (vectorizer, vectors)
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn term_index(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    #[inline]
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|dim| self.idf[dim as usize])
    }

    pub fn config(&self) -> &TfidfConfig {
        &self.config
    }
}
