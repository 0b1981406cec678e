//! Similarity index fit over a filtered slice of the catalog
//!
//! Term weights come only from the subset's own documents, so rankings can
//! differ from the full-catalog index for the same products. Built per
//! request and dropped with it.

use crate::catalog::CatalogView;
use crate::index::{Neighbor, SimilarityIndex};
use crate::text::normalize_text;
use crate::tfidf::TfidfConfig;
use crate::{Error, Result};

pub struct SubsetIndex {
    // subset offset -> catalog position
    positions: Vec<usize>,
    index: SimilarityIndex,
}

impl SubsetIndex {
    pub fn build(view: &CatalogView<'_>, config: TfidfConfig) -> Result<Self> {
        if view.is_empty() {
            return Err(Error::EmptySubset);
        }

        let corpus: Vec<String> = view
            .products()
            .map(|p| normalize_text(p.description.as_deref(), p.name.as_deref()))
            .collect();
        let index = SimilarityIndex::build(&corpus, config);

        Ok(Self {
            positions: view.positions().to_vec(),
            index,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.index.vocabulary_size()
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// Catalog positions covered by this index, in catalog order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Nearest subset members to the product at `catalog_position`, with
    /// positions mapped back to the catalog. Empty if that product is not
    /// part of the subset.
    pub fn nearest(&self, catalog_position: usize, k: usize) -> Vec<Neighbor> {
        let Ok(offset) = self.positions.binary_search(&catalog_position) else {
            return Vec::new();
        };
        self.index
            .nearest(offset, k)
            .into_iter()
            .map(|n| Neighbor {
                position: self.positions[n.position],
                score: n.score,
            })
            .collect()
    }
}
