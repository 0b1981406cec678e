use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Sample size {requested} exceeds population of {available} products")]
    SampleSize { requested: usize, available: usize },

    #[error("Cannot build an index over an empty subset")]
    EmptySubset,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
