//! # recx Storage
//!
//! Catalog ingestion: reads a CSV or JSON product export once at startup
//! and hands the rows to [`recx_core::Recommender`].

pub mod loader;

pub use loader::{CatalogFormat, CatalogLoader};
