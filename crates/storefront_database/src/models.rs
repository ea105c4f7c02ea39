//! Diesel row models and their conversions to catalog types.

use crate::schema::{categories, category_product, products};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use storefront_core::{
    Category, CategoryChanges, NewCategory, NewProduct, Product, ProductChanges,
};

/// Database row for the categories table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub category_choix: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable category.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow {
    pub name: String,
    pub category_choix: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial category update; `updated_at` is always written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = categories)]
pub struct CategoryChangeset {
    pub name: Option<String>,
    pub category_choix: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for the products table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity_available: i32,
    pub image1: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable product.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity_available: i32,
    pub image1: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial product update. `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Option<f64>>,
    pub quantity_available: Option<i32>,
    pub image1: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

/// One product/category link.
#[derive(Debug, Clone, Copy, Queryable, Insertable)]
#[diesel(table_name = category_product)]
pub struct CategoryProductRow {
    pub category_id: i64,
    pub product_id: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            category_choix: row.category_choix,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            quantity_available: row.quantity_available,
            image1: row.image1,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl NewCategoryRow {
    /// Stamp a validated category with the current time.
    pub fn stamped(category: &NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            name: category.name.clone(),
            category_choix: category.category_choix.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl NewProductRow {
    /// Stamp a validated product with the current time.
    pub fn stamped(product: &NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity_available: product.quantity_available,
            image1: product.image1.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CategoryChangeset {
    /// Changeset for `changes`, touching `updated_at`.
    pub fn stamped(changes: &CategoryChanges, now: DateTime<Utc>) -> Self {
        Self {
            name: changes.name.clone(),
            category_choix: changes.category_choix.clone(),
            updated_at: now,
        }
    }
}

impl ProductChangeset {
    /// Changeset for `changes`, touching `updated_at`.
    pub fn stamped(changes: &ProductChanges, now: DateTime<Utc>) -> Self {
        Self {
            name: changes.name.clone(),
            description: changes.description.clone(),
            price: changes.price,
            quantity_available: changes.quantity_available,
            image1: changes.image1.clone(),
            updated_at: now,
        }
    }
}
