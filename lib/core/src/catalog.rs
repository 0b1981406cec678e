use crate::filter::Filter;
use crate::product::{Product, ProductRecord};
use ahash::AHashMap;

/// Immutable, ordered product table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    // id -> first position carrying it
    positions: AHashMap<String, usize>,
}

impl Catalog {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ProductRecord>,
    {
        Self::from_products(records.into_iter().map(Product::from_record).collect())
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        let mut positions = AHashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            positions.entry(product.id.clone()).or_insert(position);
        }
        Self { products, positions }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[inline]
    pub fn get(&self, position: usize) -> Option<&Product> {
        self.products.get(position)
    }

    /// Position of the first product with this id
    #[inline]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    #[inline]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.position_of(id).and_then(|p| self.get(p))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Similarity text of every product, in catalog order
    pub fn corpus(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.normalized_text.as_str()).collect()
    }

    /// Request-local view over the rows matching `filter`
    pub fn filter<'a>(&'a self, filter: &dyn Filter) -> CatalogView<'a> {
        let positions = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| filter.matches(p))
            .map(|(i, _)| i)
            .collect();
        CatalogView {
            catalog: self,
            positions,
        }
    }

    /// View over the whole catalog
    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            catalog: self,
            positions: (0..self.products.len()).collect(),
        }
    }

    pub(crate) fn assign_clusters(&mut self, labels: &[usize]) {
        for (product, &label) in self.products.iter_mut().zip(labels) {
            product.cluster_id = label;
        }
    }
}

/// Borrowed selection of catalog rows, in catalog order
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
    catalog: &'a Catalog,
    positions: Vec<usize>,
}

impl<'a> CatalogView<'a> {
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

    /// Catalog positions of the rows in this view
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Product at view offset `offset`
    #[inline]
    pub fn get(&self, offset: usize) -> Option<&'a Product> {
        self.positions.get(offset).and_then(|&p| self.catalog.get(p))
    }

    pub fn products(&self) -> impl Iterator<Item = &'a Product> + '_ {
        self.positions.iter().filter_map(|&p| self.catalog.get(p))
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }
}
