use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::text::{normalize_key, normalize_text};

/// Placeholder id given to records whose source row has no identifier.
/// Several products may share it; lookups resolve to the first one.
pub const MISSING_ID: &str = "-1";

/// A product row as it comes out of the catalog file, before any derivation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Passed through untouched; exports carry either numbers or strings here
    #[serde(default)]
    pub price: Option<Value>,
}

impl ProductRecord {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_price(mut self, price: Value) -> Self {
        self.price = Some(price);
        self
    }
}

/// A catalog entry with its derived similarity text and match keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub price: Option<Value>,
    /// `description + " " + name`, fed to the similarity index
    pub normalized_text: String,
    /// Lowercased, trimmed brand; empty when absent
    pub brand_normalized: String,
    /// Lowercased, trimmed category; empty when absent
    pub category_normalized: String,
    /// Catalog-wide k-means cluster. Not read by any query yet.
    pub cluster_id: usize,
}

impl Product {
    #[must_use]
    pub fn from_record(record: ProductRecord) -> Self {
        let id = record
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| MISSING_ID.to_string());
        let normalized_text =
            normalize_text(record.description.as_deref(), record.name.as_deref());
        let brand_normalized = normalize_key(record.brand.as_deref());
        let category_normalized = normalize_key(record.category.as_deref());

        Self {
            id,
            name: record.name,
            description: record.description,
            brand: record.brand,
            category: record.category,
            image: record.image,
            price: record.price,
            normalized_text,
            brand_normalized,
            category_normalized,
            cluster_id: 0,
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Product::from_record(record)
    }
}

/// Response projection for similarity and home-feed results. `description`
/// is the raw field, never the similarity text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<Value>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            price: product.price.clone(),
        }
    }
}

/// Response projection for brand/category results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<Value>,
    pub brand: Option<String>,
    pub category: Option<String>,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            price: product.price.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
        }
    }
}
