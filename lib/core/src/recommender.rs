use crate::catalog::{Catalog, CatalogView};
use crate::cluster::{ClusterConfig, KMeans};
use crate::filter::{FilterCondition, ProductFilter};
use crate::index::{Neighbor, SimilarityIndex};
use crate::product::{Product, ProductDetail, ProductRecord, ProductSummary};
use crate::subset::SubsetIndex;
use crate::tfidf::TfidfConfig;
use crate::{Error, Result};
use rand::Rng;
use tracing::{debug, info, warn};

pub const DEFAULT_SIMILAR_TOP_N: usize = 5;
pub const DEFAULT_SUBSCRIBED_TOP_N: usize = 10;
pub const DEFAULT_HOME_TOP_N: usize = 10;
pub const DEFAULT_CATEGORY_TOP_N: usize = 8;

/// Configuration for building a recommender
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommenderConfig {
    pub tfidf: TfidfConfig,
    pub clusters: ClusterConfig,
}

/// Catalog, full-catalog similarity index and cluster assignment, built once
/// and read-only afterwards. Safe to share across request handlers.
pub struct Recommender {
    config: RecommenderConfig,
    catalog: Catalog,
    index: SimilarityIndex,
    cluster_sizes: Vec<usize>,
}

impl Recommender {
    pub fn build(records: Vec<ProductRecord>, config: RecommenderConfig) -> Result<Self> {
        let mut catalog = Catalog::from_records(records);
        if catalog.is_empty() {
            return Err(Error::CatalogLoad("catalog is empty".to_string()));
        }

        let index = SimilarityIndex::build(&catalog.corpus(), config.tfidf.clone());
        info!(
            "Similarity index built: {} products, {} terms",
            index.len(),
            index.vocabulary_size()
        );

        let mut clusters = config.clusters.clone();
        if clusters.n_clusters == 0 {
            return Err(Error::InvalidConfig("n_clusters must be at least 1".to_string()));
        }
        if clusters.n_clusters > catalog.len() {
            warn!(
                "Requested {} clusters for {} products; using {}",
                clusters.n_clusters,
                catalog.len(),
                catalog.len()
            );
            clusters.n_clusters = catalog.len();
        }

        let clustering = KMeans::new(clusters).fit(index.vectors(), index.vocabulary_size())?;
        catalog.assign_clusters(&clustering.labels);
        let cluster_sizes = clustering.sizes();
        info!(
            "Clustered catalog into {} clusters after {} iterations (inertia {:.4}): {:?}",
            cluster_sizes.len(),
            clustering.n_iter,
            clustering.inertia,
            cluster_sizes
        );

        Ok(Self {
            config,
            catalog,
            index,
            cluster_sizes,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Products per cluster, indexed by cluster id
    pub fn cluster_sizes(&self) -> &[usize] {
        &self.cluster_sizes
    }

    /// Scored neighbours of the first product with `id`
    pub fn similarity_scores(&self, id: &str, top_n: usize) -> Result<Vec<Neighbor>> {
        let position = self
            .catalog
            .position_of(id)
            .ok_or_else(|| Error::ProductNotFound(id.to_string()))?;
        Ok(self.index.nearest(position, top_n))
    }

    /// Up to `top_n` products most similar to `id`, most similar first
    pub fn similar_to(&self, id: &str, top_n: usize) -> Result<Vec<ProductSummary>> {
        let neighbors = self.similarity_scores(id, top_n)?;
        Ok(neighbors
            .iter()
            .filter_map(|n| self.catalog.get(n.position))
            .map(ProductSummary::from)
            .collect())
    }

    /// Random products whose brand or category is one of the subscribed
    /// names. A subset index is fit over the matches but the selection
    /// itself is uniform, not similarity-ranked.
    pub fn for_you_subscribed<B, C, R>(
        &self,
        brands: &[B],
        categories: &[C],
        top_n: usize,
        rng: &mut R,
    ) -> Result<Vec<ProductDetail>>
    where
        B: AsRef<str>,
        C: AsRef<str>,
        R: Rng + ?Sized,
    {
        let filter = ProductFilter::new(FilterCondition::subscribed(brands, categories));
        let view = self.catalog.filter(&filter);
        if view.is_empty() {
            debug!("No products match {} brands / {} categories", brands.len(), categories.len());
            return Ok(Vec::new());
        }

        let subset = SubsetIndex::build(&view, self.config.tfidf.clone())?;
        debug!(
            "Subset index over {} products, {} terms",
            subset.len(),
            subset.vocabulary_size()
        );

        let picked = sample(&view, top_n.min(view.len()), rng);
        Ok(picked.into_iter().map(ProductDetail::from).collect())
    }

    /// `top_n` distinct random products from the whole catalog
    pub fn home<R>(&self, top_n: usize, rng: &mut R) -> Result<Vec<ProductSummary>>
    where
        R: Rng + ?Sized,
    {
        if top_n > self.catalog.len() {
            return Err(Error::SampleSize {
                requested: top_n,
                available: self.catalog.len(),
            });
        }
        let view = self.catalog.view();
        Ok(sample(&view, top_n, rng)
            .into_iter()
            .map(ProductSummary::from)
            .collect())
    }

    /// Random products whose category contains `category`, case-insensitively
    pub fn by_category<R>(&self, category: &str, top_n: usize, rng: &mut R) -> Vec<ProductDetail>
    where
        R: Rng + ?Sized,
    {
        let filter = ProductFilter::new(FilterCondition::category_contains(category));
        let view = self.catalog.filter(&filter);
        debug!("Category '{}' matched {} products", category, view.len());
        sample(&view, top_n.min(view.len()), rng)
            .into_iter()
            .map(ProductDetail::from)
            .collect()
    }
}

/// Uniform sample without replacement, in random order. `amount` must not
/// exceed the view size.
fn sample<'a, R>(view: &CatalogView<'a>, amount: usize, rng: &mut R) -> Vec<&'a Product>
where
    R: Rng + ?Sized,
{
    if amount == 0 {
        return Vec::new();
    }
    rand::seq::index::sample(rng, view.len(), amount)
        .into_iter()
        .filter_map(|offset| view.get(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn shoes() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("1")
                .with_description("red shoe")
                .with_name("Shoe A")
                .with_brand("Nike")
                .with_category("Shoes"),
            ProductRecord::new("2")
                .with_description("blue shoe")
                .with_name("Shoe B")
                .with_brand("Adidas")
                .with_category("Shoes"),
        ]
    }

    fn store() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("10").with_description("leather hiking boot").with_brand("Merrell").with_category("Outdoor Gear"),
            ProductRecord::new("11").with_description("waterproof hiking jacket").with_brand("Patagonia").with_category("Outdoor Gear"),
            ProductRecord::new("12").with_description("stainless chef knife").with_brand("Wusthof").with_category("Kitchen"),
            ProductRecord::new("13").with_description("cast iron skillet").with_brand("Lodge").with_category("Kitchen"),
            ProductRecord::new("14").with_description("leather hiking boot women").with_brand("Merrell").with_category("Footwear"),
            ProductRecord::new("15").with_description("trail camping tent").with_brand("REI").with_category("outdoor"),
        ]
    }

    fn build(records: Vec<ProductRecord>) -> Recommender {
        Recommender::build(records, RecommenderConfig::default()).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_similar_to_returns_only_other_document() {
        let rec = build(shoes());
        let result = rec.similar_to("1", 1).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_similar_to_unknown_id() {
        let rec = build(shoes());
        assert!(matches!(rec.similar_to("999", 5), Err(Error::ProductNotFound(id)) if id == "999"));
    }

    #[test]
    fn test_similar_to_excludes_self_and_ranks() {
        let rec = build(store());
        let result = rec.similar_to("10", 3).unwrap();
        assert!(result.len() <= 3);
        assert!(result.iter().all(|p| p.id != "10"));
        assert_eq!(result[0].id, "14");

        let scores = rec.similarity_scores("10", 5).unwrap();
        assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_for_you_subscribed_brand() {
        let rec = build(shoes());
        let result = rec
            .for_you_subscribed(&["nike"], &[] as &[&str], 5, &mut rng())
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
        assert_eq!(result[0].brand.as_deref(), Some("Nike"));
    }

    #[test]
    fn test_for_you_subscribed_empty_lists() {
        let rec = build(shoes());
        let result = rec
            .for_you_subscribed(&[] as &[&str], &[] as &[&str], 5, &mut rng())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_for_you_subscribed_samples_without_replacement() {
        let rec = build(store());
        let result = rec
            .for_you_subscribed(&["MERRELL "], &["kitchen"], 3, &mut rng())
            .unwrap();
        assert_eq!(result.len(), 3);
        let ids: HashSet<_> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.is_subset(&["10", "12", "13", "14"].into_iter().collect()));
    }

    #[test]
    fn test_home_sample_size() {
        let rec = build(store());
        let result = rec.home(4, &mut rng()).unwrap();
        assert_eq!(result.len(), 4);
        let ids: HashSet<_> = result.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 4);

        assert!(matches!(
            rec.home(7, &mut rng()),
            Err(Error::SampleSize { requested: 7, available: 6 })
        ));
        assert_eq!(rec.home(6, &mut rng()).unwrap().len(), 6);
    }

    #[test]
    fn test_by_category_substring() {
        let rec = build(store());
        let result = rec.by_category("DOOR", 8, &mut rng());
        let ids: HashSet<_> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["10", "11", "15"].into_iter().collect());

        assert!(rec.by_category("garden", 8, &mut rng()).is_empty());
        assert_eq!(rec.by_category("kitchen", 1, &mut rng()).len(), 1);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let rec = build(store());
        let a = rec.home(3, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = rec.home(3, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clusters_assigned() {
        let rec = build(store());
        // more clusters requested than products: clamped
        assert_eq!(rec.cluster_sizes().len(), 6);
        assert_eq!(rec.cluster_sizes().iter().sum::<usize>(), 6);

        let config = RecommenderConfig {
            clusters: ClusterConfig {
                n_clusters: 2,
                ..ClusterConfig::default()
            },
            ..RecommenderConfig::default()
        };
        let rec = Recommender::build(store(), config).unwrap();
        assert!(rec.catalog().iter().all(|p| p.cluster_id < 2));
    }

    #[test]
    fn test_empty_catalog_fails() {
        assert!(matches!(
            Recommender::build(Vec::new(), RecommenderConfig::default()),
            Err(Error::CatalogLoad(_))
        ));
    }
}
