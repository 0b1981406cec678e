//! # recx Core
//!
//! Core library for the recx recommendation service.
//!
//! This crate provides the catalog model and the similarity machinery:
//!
//! - [`Catalog`] - Immutable, ordered product table
//! - [`TfidfVectorizer`] - Corpus-relative term weighting with English stop words
//! - [`SimilarityIndex`] - Cosine nearest-neighbour queries over the whole catalog
//! - [`SubsetIndex`] - The same, fit over a filtered slice of the catalog
//! - [`KMeans`] - Catalog-wide cluster assignment
//! - [`Recommender`] - The four recommendation queries over a shared, read-only context
//!
//! ## Example
//!
//! ```rust
//! use recx_core::{ProductRecord, Recommender, RecommenderConfig};
//!
//! let records = vec![
//!     ProductRecord::new("1").with_description("red shoe").with_name("Shoe A").with_brand("Nike"),
//!     ProductRecord::new("2").with_description("blue shoe").with_name("Shoe B").with_brand("Adidas"),
//! ];
//! let recommender = Recommender::build(records, RecommenderConfig::default()).unwrap();
//!
//! let similar = recommender.similar_to("1", 1).unwrap();
//! assert_eq!(similar[0].id, "2");
//!
//! let mut rng = rand::rng();
//! let feed = recommender.for_you_subscribed(&["nike"], &[] as &[&str], 5, &mut rng).unwrap();
//! assert_eq!(feed.len(), 1);
//! ```

pub mod catalog;
pub mod cluster;
pub mod error;
pub mod filter;
pub mod index;
pub mod product;
pub mod recommender;
pub mod subset;
pub mod text;
pub mod tfidf;
pub mod vector;

pub use catalog::{Catalog, CatalogView};
pub use cluster::{ClusterConfig, Clustering, KMeans};
pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, ProductFilter};
pub use index::{Neighbor, SimilarityIndex};
pub use product::{Product, ProductDetail, ProductRecord, ProductSummary, MISSING_ID};
pub use recommender::{
    Recommender, RecommenderConfig, DEFAULT_CATEGORY_TOP_N, DEFAULT_HOME_TOP_N,
    DEFAULT_SIMILAR_TOP_N, DEFAULT_SUBSCRIBED_TOP_N,
};
pub use subset::SubsetIndex;
pub use text::{normalize_key, normalize_text, tokenize, ENGLISH_STOP_WORDS};
pub use tfidf::{IdfMode, StopWords, TfidfConfig, TfidfVectorizer};
pub use vector::SparseVector;
