//! Product records and their write payloads.

use crate::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-generated identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Unit price
    pub price: Option<f64>,
    /// Units in stock
    pub quantity_available: i32,
    /// Stored image filename, always server generated
    pub image1: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether `term` (already lowercased) occurs in the searchable columns.
    ///
    /// Mirrors the SQL filter: name, description, or the price rendered as text.
    pub fn matches_search(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(term))
            || self
                .price
                .is_some_and(|p| p.to_string().to_lowercase().contains(term))
    }
}

/// A product with its categories eager-loaded.
///
/// # Examples
///
/// ```
/// use storefront_core::{Product, ProductWithCategories};
/// use chrono::Utc;
///
/// let product = Product {
///     id: 7,
///     name: "Widget".to_string(),
///     description: None,
///     price: Some(9.99),
///     quantity_available: 3,
///     image1: None,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// let loaded = ProductWithCategories { product, categories: vec![] };
///
/// let json = serde_json::to_value(&loaded).unwrap();
/// assert_eq!(json["id"], 7);
/// assert!(json["categories"].as_array().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithCategories {
    /// The product columns, flattened into the same JSON object
    #[serde(flatten)]
    pub product: Product,
    /// Associated categories
    pub categories: Vec<Category>,
}

/// Validated payload for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct NewProduct {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Unit price
    pub price: Option<f64>,
    /// Units in stock
    pub quantity_available: i32,
    /// Stored image filename
    pub image1: Option<String>,
}

impl NewProduct {
    /// A product with only the required columns set.
    pub fn new(name: impl Into<String>, quantity_available: i32) -> Self {
        Self {
            name: name.into(),
            description: None,
            price: None,
            quantity_available,
            image1: None,
        }
    }
}

/// Validated partial update for a product.
///
/// Outer `None` leaves the column untouched; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    /// Replacement name
    pub name: Option<String>,
    /// Replacement description
    pub description: Option<Option<String>>,
    /// Replacement price
    pub price: Option<Option<f64>>,
    /// Replacement stock count
    pub quantity_available: Option<i32>,
    /// Replacement image filename
    pub image1: Option<Option<String>>,
}

impl ProductChanges {
    /// True when nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity_available.is_none()
            && self.image1.is_none()
    }

    /// Apply the changes to an in-memory record.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity_available {
            product.quantity_available = quantity;
        }
        if let Some(image1) = &self.image1 {
            product.image1 = image1.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product {
            id: 1,
            name: "Blue Widget".to_string(),
            description: Some("Sturdy and SMALL".to_string()),
            price: Some(12.5),
            quantity_available: 4,
            image1: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn search_covers_name_description_and_price() {
        let product = widget();
        assert!(product.matches_search("widget"));
        assert!(product.matches_search("small"));
        assert!(product.matches_search("12.5"));
        assert!(!product.matches_search("gadget"));
    }

    #[test]
    fn changes_leave_unset_columns_alone() {
        let mut product = widget();
        let changes = ProductChanges {
            price: Some(None),
            quantity_available: Some(9),
            ..Default::default()
        };
        changes.apply_to(&mut product);

        assert_eq!(product.name, "Blue Widget");
        assert_eq!(product.price, None);
        assert_eq!(product.quantity_available, 9);
        assert!(product.description.is_some());
    }
}
