// Product filters for brand/category selection
use crate::Product;

pub trait Filter {
    fn matches(&self, product: &Product) -> bool;
}

pub struct ProductFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Trimmed, case-insensitive brand equality against any listed name
    BrandIn(Vec<String>),
    /// Trimmed, case-insensitive category equality against any listed name
    CategoryIn(Vec<String>),
    /// Substring of the lowercased category. The query is stored lowercased;
    /// build it with [`FilterCondition::category_contains`].
    CategoryContains(String),
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl FilterCondition {
    /// Brand-or-category subscription match. Blank names are dropped so they
    /// never select products without a brand or category.
    pub fn subscribed<B, C>(brands: B, categories: C) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        FilterCondition::Or(vec![
            FilterCondition::BrandIn(normalized_names(brands)),
            FilterCondition::CategoryIn(normalized_names(categories)),
        ])
    }

    /// Case-insensitive category substring match
    pub fn category_contains(query: &str) -> Self {
        FilterCondition::CategoryContains(query.to_lowercase())
    }
}

fn normalized_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}

impl ProductFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn matches_condition(condition: &FilterCondition, product: &Product) -> bool {
        match condition {
            FilterCondition::BrandIn(names) => {
                !product.brand_normalized.is_empty()
                    && names.iter().any(|n| *n == product.brand_normalized)
            }
            FilterCondition::CategoryIn(names) => {
                !product.category_normalized.is_empty()
                    && names.iter().any(|n| *n == product.category_normalized)
            }
            FilterCondition::CategoryContains(query) => product
                .category
                .as_deref()
                .map(|c| c.to_lowercase().contains(query.as_str()))
                .unwrap_or(false),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, product))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, product))
            }
            FilterCondition::Not(condition) => !Self::matches_condition(condition, product),
        }
    }
}

impl Filter for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        Self::matches_condition(&self.condition, product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductRecord;

    fn product(brand: Option<&str>, category: Option<&str>) -> Product {
        let mut record = ProductRecord::new("x");
        record.brand = brand.map(str::to_string);
        record.category = category.map(str::to_string);
        Product::from_record(record)
    }

    #[test]
    fn test_subscribed_is_case_insensitive_and_trimmed() {
        let filter = ProductFilter::new(FilterCondition::subscribed([" NIKE "], Vec::<String>::new()));
        assert!(filter.matches(&product(Some("Nike"), None)));
        assert!(filter.matches(&product(Some(" nike"), Some("Shoes"))));
        assert!(!filter.matches(&product(Some("Nike Pro"), None)));
    }

    #[test]
    fn test_subscribed_brand_or_category() {
        let filter = ProductFilter::new(FilterCondition::subscribed(["adidas"], ["shoes"]));
        assert!(filter.matches(&product(Some("Nike"), Some("Shoes"))));
        assert!(filter.matches(&product(Some("Adidas"), Some("Hats"))));
        assert!(!filter.matches(&product(Some("Puma"), Some("Hats"))));
    }

    #[test]
    fn test_blank_names_do_not_match_missing_fields() {
        let filter = ProductFilter::new(FilterCondition::subscribed([""], ["  "]));
        assert!(!filter.matches(&product(None, None)));
        assert!(!filter.matches(&product(Some(""), Some(""))));
    }

    #[test]
    fn test_category_contains() {
        let filter = ProductFilter::new(FilterCondition::category_contains("door"));
        assert!(filter.matches(&product(None, Some("Outdoor Gear"))));
        assert!(!filter.matches(&product(None, Some("Kitchen"))));
        assert!(!filter.matches(&product(None, None)));

        let upper = ProductFilter::new(FilterCondition::category_contains("GEAR"));
        assert!(upper.matches(&product(None, Some("Outdoor Gear"))));
    }

    #[test]
    fn test_category_contains_stores_lowercased_query() {
        let condition = FilterCondition::category_contains("OutDoor");
        assert_eq!(condition, FilterCondition::CategoryContains("outdoor".to_string()));

        let filter = ProductFilter::new(condition);
        assert!(filter.matches(&product(None, Some("OUTDOOR GEAR"))));
        assert!(filter.matches(&product(None, Some("outdoor"))));
        assert!(!filter.matches(&product(None, Some("Indoor"))));
    }

    #[test]
    fn test_not_and() {
        let filter = ProductFilter::new(FilterCondition::And(vec![
            FilterCondition::CategoryContains("gear".to_string()),
            FilterCondition::Not(Box::new(FilterCondition::BrandIn(vec!["acme".to_string()]))),
        ]));
        assert!(filter.matches(&product(Some("Rei"), Some("Outdoor Gear"))));
        assert!(!filter.matches(&product(Some("Acme"), Some("Outdoor Gear"))));
    }
}
