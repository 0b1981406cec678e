//! # recx
//!
//! Content-based product recommendations over a static catalog.
//!
//! recx loads a product catalog once, fits a TF-IDF vector space over each
//! product's description and name, and answers four kinds of request:
//!
//! - **Similar products**: cosine nearest neighbours of a given product
//! - **Subscribed feed**: random products from subscribed brands or categories
//! - **Home feed**: random products from the whole catalog
//! - **Category search**: random products whose category contains a query
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install recx
//! recx --catalog products.csv --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use recx::prelude::*;
//!
//! let records = CatalogLoader::load("products.csv").unwrap();
//! let recommender = Recommender::build(records, RecommenderConfig::default()).unwrap();
//!
//! let similar = recommender.similar_to("42", 5).unwrap();
//! let feed = recommender.home(10, &mut rand::rng()).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - [`recx-core`](https://docs.rs/recx-core) - Catalog, TF-IDF index, clustering, queries
//! - [`recx-storage`](https://docs.rs/recx-storage) - CSV / JSON catalog ingestion
//! - [`recx-api`](https://docs.rs/recx-api) - REST API

// Re-export core types
pub use recx_core::{
    Catalog, CatalogView, ClusterConfig, Error, Neighbor, Product, ProductDetail, ProductRecord,
    ProductSummary, Recommender, RecommenderConfig, Result, SimilarityIndex, SubsetIndex,
    TfidfConfig,
};

// Re-export storage
pub use recx_storage::CatalogLoader;

// Re-export API
pub use recx_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogLoader, ClusterConfig, Error, Product, ProductDetail, ProductRecord,
        ProductSummary, Recommender, RecommenderConfig, RestApi, Result, SimilarityIndex,
        TfidfConfig,
    };
}

/// Term weighting and similarity primitives
pub mod similarity {
    pub use recx_core::{IdfMode, KMeans, SparseVector, StopWords, TfidfVectorizer};
}
