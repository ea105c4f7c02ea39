//! Backend trait for admin data operations.
//!
//! The UI talks to the API through this trait so it can be driven by the
//! HTTP client in production and by a mock in tests.

use crate::{Resource, Submission};
use async_trait::async_trait;
use storefront_core::{Category, ListQuery, Page, Product, ProductWithCategories};
use storefront_error::StorefrontResult;

/// Data operations the admin UI needs.
///
/// Errors follow a small contract the controller relies on: access denial
/// is an HTTP `Forbidden` error, and server-side field errors arrive as a
/// `ValidationError`.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// One page of categories.
    async fn list_categories(&self, query: &ListQuery) -> StorefrontResult<Page<Category>>;

    /// One page of products.
    async fn list_products(&self, query: &ListQuery) -> StorefrontResult<Page<Product>>;

    /// A single category.
    async fn category(&self, id: i64) -> StorefrontResult<Category>;

    /// A single product with its categories.
    async fn product(&self, id: i64) -> StorefrontResult<ProductWithCategories>;

    /// Create or update from a submitted form.
    async fn save(&self, submission: &Submission) -> StorefrontResult<()>;

    /// Delete a row.
    async fn delete(&self, resource: Resource, id: i64) -> StorefrontResult<()>;
}
