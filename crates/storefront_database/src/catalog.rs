//! Repository trait implementations backed by PostgreSQL.

use crate::{DatabaseResult, PgPool, queries};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use storefront_core::{
    Category, CategoryChanges, ListQuery, NewCategory, NewProduct, Page, Product,
    ProductChanges, ProductWithCategories,
};
use storefront_error::{DatabaseError, DatabaseErrorKind, StorefrontResult};
use storefront_interface::{CategoryRepository, Health, ProductRepository};

/// PostgreSQL catalog using Diesel over an r2d2 pool.
///
/// Each call checks a connection out of the pool on tokio's blocking
/// thread pool.
///
/// # Example
/// ```no_run
/// use storefront_database::{PostgresCatalog, create_pool};
///
/// let pool = create_pool(None, 10)?;
/// let catalog = PostgresCatalog::new(pool);
/// # Ok::<(), storefront_error::DatabaseError>(())
/// ```
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCatalog")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl PostgresCatalog {
    /// Create a catalog over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run `op` with a pooled connection on the blocking pool.
    async fn run<T, F>(&self, op: F) -> StorefrontResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> DatabaseResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
            op(&mut *conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Join(e.to_string())))?;
        Ok(result?)
    }
}

#[async_trait]
impl CategoryRepository for PostgresCatalog {
    async fn list_categories(&self, query: &ListQuery) -> StorefrontResult<Page<Category>> {
        let query = query.clone();
        self.run(move |conn| queries::list_categories(conn, &query))
            .await
    }

    async fn all_categories(&self) -> StorefrontResult<Vec<Category>> {
        self.run(queries::all_categories).await
    }

    async fn find_category(&self, id: i64) -> StorefrontResult<Option<Category>> {
        self.run(move |conn| queries::find_category(conn, id)).await
    }

    async fn category_name_taken(
        &self,
        name: &str,
        except: Option<i64>,
    ) -> StorefrontResult<bool> {
        let name = name.to_string();
        self.run(move |conn| queries::category_name_taken(conn, &name, except))
            .await
    }

    async fn existing_category_ids(&self, ids: &[i64]) -> StorefrontResult<Vec<i64>> {
        let ids = ids.to_vec();
        self.run(move |conn| queries::existing_category_ids(conn, &ids))
            .await
    }

    async fn create_category(&self, category: &NewCategory) -> StorefrontResult<Category> {
        let category = category.clone();
        self.run(move |conn| queries::create_category(conn, &category))
            .await
    }

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> StorefrontResult<Option<Category>> {
        let changes = changes.clone();
        self.run(move |conn| queries::update_category(conn, id, &changes))
            .await
    }

    async fn count_category_products(&self, id: i64) -> StorefrontResult<u64> {
        self.run(move |conn| queries::count_category_products(conn, id))
            .await
    }

    async fn delete_category(&self, id: i64) -> StorefrontResult<Option<Category>> {
        self.run(move |conn| queries::delete_category(conn, id)).await
    }
}

#[async_trait]
impl ProductRepository for PostgresCatalog {
    async fn list_products(&self, query: &ListQuery) -> StorefrontResult<Page<Product>> {
        let query = query.clone();
        self.run(move |conn| queries::list_products(conn, &query))
            .await
    }

    async fn products_with_categories(&self) -> StorefrontResult<Vec<ProductWithCategories>> {
        self.run(queries::products_with_categories).await
    }

    async fn find_product(&self, id: i64) -> StorefrontResult<Option<Product>> {
        self.run(move |conn| queries::find_product(conn, id)).await
    }

    async fn product_categories(&self, id: i64) -> StorefrontResult<Vec<Category>> {
        self.run(move |conn| queries::product_categories(conn, id))
            .await
    }

    async fn create_product(
        &self,
        product: &NewProduct,
        category_ids: Option<&[i64]>,
    ) -> StorefrontResult<Product> {
        let product = product.clone();
        let category_ids = category_ids.map(<[i64]>::to_vec);
        self.run(move |conn| queries::create_product(conn, &product, category_ids.as_deref()))
            .await
    }

    async fn create_products(&self, products: &[NewProduct]) -> StorefrontResult<Vec<Product>> {
        let products = products.to_vec();
        self.run(move |conn| queries::create_products(conn, &products))
            .await
    }

    async fn update_product(
        &self,
        id: i64,
        changes: &ProductChanges,
        category_ids: Option<&[i64]>,
    ) -> StorefrontResult<Option<Product>> {
        let changes = changes.clone();
        let category_ids = category_ids.map(<[i64]>::to_vec);
        self.run(move |conn| {
            queries::update_product(conn, id, &changes, category_ids.as_deref())
        })
        .await
    }

    async fn delete_product(&self, id: i64) -> StorefrontResult<Option<Product>> {
        self.run(move |conn| queries::delete_product(conn, id)).await
    }
}

#[async_trait]
impl Health for PostgresCatalog {
    async fn health_check(&self) -> StorefrontResult<()> {
        self.run(queries::ping).await
    }
}
