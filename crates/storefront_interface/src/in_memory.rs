//! In-memory implementation of the catalog repositories.
//!
//! Stores categories, products, and their links in ordered maps behind a
//! single RwLock, so name uniqueness and category syncs are atomic.
//! All data is lost when the catalog is dropped.

use crate::{CategoryRepository, Health, ProductRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use storefront_core::{
    Category, CategoryChanges, ListQuery, NewCategory, NewProduct, Page, Product,
    ProductChanges, ProductWithCategories,
};
use storefront_error::{DatabaseError, DatabaseErrorKind, StorefrontResult};
use tokio::sync::RwLock;

/// In-memory catalog.
///
/// # Example
/// ```
/// use storefront_core::NewCategory;
/// use storefront_interface::{CategoryRepository, InMemoryCatalog};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let catalog = InMemoryCatalog::new();
/// let created = catalog
///     .create_category(&NewCategory {
///         name: "Electronics".to_string(),
///         category_choix: "retail".to_string(),
///     })
///     .await
///     .unwrap();
/// assert_eq!(created.id, 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    /// (product_id, category_id)
    links: BTreeSet<(i64, i64)>,
    last_category_id: i64,
    last_product_id: i64,
}

impl CatalogState {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn categories_of(&self, product_id: i64) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .links
            .range((product_id, i64::MIN)..=(product_id, i64::MAX))
            .filter_map(|(_, category_id)| self.categories.get(category_id).cloned())
            .collect();
        categories.sort_by_key(|c| c.id);
        categories
    }

    #[track_caller]
    fn check_category_ids(&self, ids: &[i64]) -> Result<(), DatabaseError> {
        match ids.iter().find(|id| !self.categories.contains_key(id)) {
            Some(missing) => Err(DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation(
                format!("category {} does not exist", missing),
            ))),
            None => Ok(()),
        }
    }

    fn sync(&mut self, product_id: i64, ids: &[i64]) {
        self.links.retain(|(p, _)| *p != product_id);
        self.links.extend(ids.iter().map(|c| (product_id, *c)));
    }

    fn insert_product(&mut self, new: &NewProduct) -> Product {
        self.last_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: self.last_product_id,
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            quantity_available: new.quantity_available,
            image1: new.image1.clone(),
            created_at: now,
            updated_at: now,
        };
        self.products.insert(product.id, product.clone());
        product
    }
}

/// Newest first, id descending as tie break.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn paginate<T>(rows: Vec<T>, query: &ListQuery) -> Page<T> {
    let total = rows.len() as u64;
    let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
    let data = rows
        .into_iter()
        .skip(offset)
        .take(*query.per_page() as usize)
        .collect();
    Page::new(data, total, query)
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored categories.
    pub async fn category_count(&self) -> usize {
        self.state.read().await.categories.len()
    }

    /// Number of stored products.
    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }

    /// Remove everything and restart id sequences.
    pub async fn clear(&self) {
        *self.state.write().await = CatalogState::default();
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn list_categories(&self, query: &ListQuery) -> StorefrontResult<Page<Category>> {
        let state = self.state.read().await;
        let term = query.search_lowercase();
        let mut rows: Vec<Category> = state
            .categories
            .values()
            .filter(|c| term.as_deref().is_none_or(|t| c.matches_search(t)))
            .cloned()
            .collect();
        newest_first(&mut rows, |c| (c.created_at, c.id));
        Ok(paginate(rows, query))
    }

    async fn all_categories(&self) -> StorefrontResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut rows: Vec<Category> = state.categories.values().cloned().collect();
        newest_first(&mut rows, |c| (c.created_at, c.id));
        Ok(rows)
    }

    async fn find_category(&self, id: i64) -> StorefrontResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn category_name_taken(
        &self,
        name: &str,
        except: Option<i64>,
    ) -> StorefrontResult<bool> {
        Ok(self.state.read().await.name_taken(name, except))
    }

    async fn existing_category_ids(&self, ids: &[i64]) -> StorefrontResult<Vec<i64>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.categories.contains_key(id))
            .collect())
    }

    async fn create_category(&self, category: &NewCategory) -> StorefrontResult<Category> {
        let mut state = self.state.write().await;
        if state.name_taken(&category.name, None) {
            return Err(DatabaseError::new(DatabaseErrorKind::UniqueViolation(format!(
                "categories.name = {}",
                category.name
            )))
            .into());
        }
        state.last_category_id += 1;
        let now = Utc::now();
        let created = Category {
            id: state.last_category_id,
            name: category.name.clone(),
            category_choix: category.category_choix.clone(),
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(created.id, created.clone());
        tracing::debug!(id = created.id, "Stored category in memory");
        Ok(created)
    }

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> StorefrontResult<Option<Category>> {
        let mut state = self.state.write().await;
        if let Some(name) = &changes.name
            && state.name_taken(name, Some(id))
        {
            return Err(DatabaseError::new(DatabaseErrorKind::UniqueViolation(format!(
                "categories.name = {}",
                name
            )))
            .into());
        }
        let Some(category) = state.categories.get_mut(&id) else {
            return Ok(None);
        };
        if !changes.is_empty() {
            changes.apply_to(category);
            category.updated_at = Utc::now();
        }
        Ok(Some(category.clone()))
    }

    async fn count_category_products(&self, id: i64) -> StorefrontResult<u64> {
        let state = self.state.read().await;
        Ok(state.links.iter().filter(|(_, c)| *c == id).count() as u64)
    }

    async fn delete_category(&self, id: i64) -> StorefrontResult<Option<Category>> {
        let mut state = self.state.write().await;
        let removed = state.categories.remove(&id);
        if removed.is_some() {
            state.links.retain(|(_, c)| *c != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn list_products(&self, query: &ListQuery) -> StorefrontResult<Page<Product>> {
        let state = self.state.read().await;
        let term = query.search_lowercase();
        let mut rows: Vec<Product> = state
            .products
            .values()
            .filter(|p| term.as_deref().is_none_or(|t| p.matches_search(t)))
            .cloned()
            .collect();
        newest_first(&mut rows, |p| (p.created_at, p.id));
        Ok(paginate(rows, query))
    }

    async fn products_with_categories(&self) -> StorefrontResult<Vec<ProductWithCategories>> {
        let state = self.state.read().await;
        let mut rows: Vec<Product> = state.products.values().cloned().collect();
        newest_first(&mut rows, |p| (p.created_at, p.id));
        Ok(rows
            .into_iter()
            .map(|product| ProductWithCategories {
                categories: state.categories_of(product.id),
                product,
            })
            .collect())
    }

    async fn find_product(&self, id: i64) -> StorefrontResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn product_categories(&self, id: i64) -> StorefrontResult<Vec<Category>> {
        Ok(self.state.read().await.categories_of(id))
    }

    async fn create_product(
        &self,
        product: &NewProduct,
        category_ids: Option<&[i64]>,
    ) -> StorefrontResult<Product> {
        let mut state = self.state.write().await;
        if let Some(ids) = category_ids {
            state.check_category_ids(ids)?;
        }
        let created = state.insert_product(product);
        if let Some(ids) = category_ids {
            state.sync(created.id, ids);
        }
        tracing::debug!(id = created.id, "Stored product in memory");
        Ok(created)
    }

    async fn create_products(&self, products: &[NewProduct]) -> StorefrontResult<Vec<Product>> {
        let mut state = self.state.write().await;
        Ok(products.iter().map(|p| state.insert_product(p)).collect())
    }

    async fn update_product(
        &self,
        id: i64,
        changes: &ProductChanges,
        category_ids: Option<&[i64]>,
    ) -> StorefrontResult<Option<Product>> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&id) {
            return Ok(None);
        }
        if let Some(ids) = category_ids {
            state.check_category_ids(ids)?;
        }
        let updated = match state.products.get_mut(&id) {
            Some(product) => {
                if !changes.is_empty() {
                    changes.apply_to(product);
                    product.updated_at = Utc::now();
                }
                product.clone()
            }
            None => return Ok(None),
        };
        if let Some(ids) = category_ids {
            state.sync(id, ids);
        }
        Ok(Some(updated))
    }

    async fn delete_product(&self, id: i64) -> StorefrontResult<Option<Product>> {
        let mut state = self.state.write().await;
        let removed = state.products.remove(&id);
        if removed.is_some() {
            state.links.retain(|(p, _)| *p != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl Health for InMemoryCatalog {
    async fn health_check(&self) -> StorefrontResult<()> {
        Ok(())
    }
}
