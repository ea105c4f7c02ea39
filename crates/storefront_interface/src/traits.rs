//! Persistence traits for the catalog.
//!
//! Lookups that can miss return `Ok(None)`; the caller decides whether a
//! miss is an error. Constraint failures surface as
//! [`DatabaseError`](storefront_error::DatabaseError) with the matching kind.

use async_trait::async_trait;
use storefront_core::{
    Category, CategoryChanges, ListQuery, NewCategory, NewProduct, Page, Product,
    ProductChanges, ProductWithCategories,
};
use storefront_error::StorefrontResult;

/// Category persistence.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Filtered page, newest first.
    async fn list_categories(&self, query: &ListQuery) -> StorefrontResult<Page<Category>>;

    /// Every category, newest first.
    async fn all_categories(&self) -> StorefrontResult<Vec<Category>>;

    /// Single category by id.
    async fn find_category(&self, id: i64) -> StorefrontResult<Option<Category>>;

    /// Whether another category already uses `name`, ignoring `except`.
    async fn category_name_taken(&self, name: &str, except: Option<i64>)
    -> StorefrontResult<bool>;

    /// The subset of `ids` that exist.
    async fn existing_category_ids(&self, ids: &[i64]) -> StorefrontResult<Vec<i64>>;

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// A duplicate name yields a `UniqueViolation` database error.
    async fn create_category(&self, category: &NewCategory) -> StorefrontResult<Category>;

    /// Apply changes to a category; `None` when it does not exist.
    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> StorefrontResult<Option<Category>>;

    /// Number of products linked to the category.
    async fn count_category_products(&self, id: i64) -> StorefrontResult<u64>;

    /// Remove the category and its product links, returning the last state.
    async fn delete_category(&self, id: i64) -> StorefrontResult<Option<Category>>;
}

/// Product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Filtered page, newest first.
    async fn list_products(&self, query: &ListQuery) -> StorefrontResult<Page<Product>>;

    /// Every product with its categories, newest first.
    async fn products_with_categories(&self) -> StorefrontResult<Vec<ProductWithCategories>>;

    /// Single product by id.
    async fn find_product(&self, id: i64) -> StorefrontResult<Option<Product>>;

    /// Categories linked to a product.
    async fn product_categories(&self, id: i64) -> StorefrontResult<Vec<Category>>;

    /// Insert a product and, when given, link it to `category_ids` in the same unit of work.
    async fn create_product(
        &self,
        product: &NewProduct,
        category_ids: Option<&[i64]>,
    ) -> StorefrontResult<Product>;

    /// Insert all products or none.
    async fn create_products(&self, products: &[NewProduct]) -> StorefrontResult<Vec<Product>>;

    /// Apply changes and, when given, replace the category links; `None` when missing.
    async fn update_product(
        &self,
        id: i64,
        changes: &ProductChanges,
        category_ids: Option<&[i64]>,
    ) -> StorefrontResult<Option<Product>>;

    /// Remove the product and its links, returning the last state.
    async fn delete_product(&self, id: i64) -> StorefrontResult<Option<Product>>;
}

/// Liveness probe for a backing store.
#[async_trait]
pub trait Health: Send + Sync {
    /// Succeeds when the store can serve requests.
    async fn health_check(&self) -> StorefrontResult<()>;
}
