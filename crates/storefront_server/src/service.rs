//! Catalog operations shared by every HTTP handler.

use crate::{ApiError, ApiResult};
use serde_json::Value;
use std::sync::Arc;
use storefront_core::{
    CATEGORY_IDS_FIELD, Category, CategoryDeletePolicy, FormInput, ImageCleanupPolicy,
    ImageUpload, ListQuery, Page, Policies, Product, ProductWithCategories,
    content_type_for_filename, invalid_selection_message, is_safe_filename, taken_message,
    validate_category_changes, validate_new_category, validate_new_product,
    validate_product_batch, validate_product_update,
};
use storefront_error::{
    DatabaseErrorKind, StorefrontError, StorefrontErrorKind, ValidationError,
};
use storefront_interface::{CategoryRepository, ProductRepository};
use storefront_storage::ImageStore;
use tracing::{debug, info, instrument, warn};

/// Rewrite constraint violations raised by the store as field errors.
fn constraint_to_validation(err: StorefrontError) -> StorefrontError {
    let field = match err.kind() {
        StorefrontErrorKind::Database(db) => match &db.kind {
            DatabaseErrorKind::UniqueViolation(_) => Some(("name", taken_message("name"))),
            DatabaseErrorKind::ForeignKeyViolation(_) => Some((
                CATEGORY_IDS_FIELD,
                invalid_selection_message(CATEGORY_IDS_FIELD),
            )),
            _ => None,
        },
        _ => None,
    };
    match field {
        Some((name, message)) => {
            debug!(error = %err, "Store constraint rejected write");
            ValidationError::field(name, message).into()
        }
        None => err,
    }
}

/// Bytes and content type of a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File contents
    pub bytes: Vec<u8>,
    /// Type guessed from the extension
    pub content_type: &'static str,
}

/// Catalog use cases over pluggable repositories and image storage.
///
/// Request-local rules run first (see `storefront_core`), then rules needing
/// the store (name uniqueness, category existence), then writes.
#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
    images: Arc<dyn ImageStore>,
    policies: Policies,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    /// Assemble a service.
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        images: Arc<dyn ImageStore>,
        policies: Policies,
    ) -> Self {
        Self {
            categories,
            products,
            images,
            policies,
        }
    }

    /// Active policies.
    pub fn policies(&self) -> &Policies {
        &self.policies
    }

    // ---- categories ----

    /// Filtered page of categories.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, query: &ListQuery) -> ApiResult<Page<Category>> {
        Ok(self.categories.list_categories(query).await?)
    }

    /// Every category, newest first.
    #[instrument(skip(self))]
    pub async fn all_categories(&self) -> ApiResult<Vec<Category>> {
        Ok(self.categories.all_categories().await?)
    }

    /// Single category.
    #[instrument(skip(self))]
    pub async fn category(&self, id: i64) -> ApiResult<Category> {
        self.categories
            .find_category(id)
            .await?
            .ok_or(ApiError::NotFound("Category"))
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i64>) -> ApiResult<()> {
        if self.categories.category_name_taken(name, except).await? {
            return Err(ValidationError::field("name", taken_message("name")).into());
        }
        Ok(())
    }

    /// Validate and insert a category.
    #[instrument(skip(self, form))]
    pub async fn create_category(&self, form: FormInput) -> ApiResult<Category> {
        let category = validate_new_category(&form)?;
        self.ensure_name_free(&category.name, None).await?;

        let created = self
            .categories
            .create_category(&category)
            .await
            .map_err(constraint_to_validation)?;
        info!(id = created.id, name = %created.name, "Created category");
        Ok(created)
    }

    /// Validate and apply submitted category fields.
    #[instrument(skip(self, form))]
    pub async fn update_category(&self, id: i64, form: FormInput) -> ApiResult<Category> {
        self.category(id).await?;
        let changes = validate_category_changes(&form)?;
        if let Some(name) = &changes.name {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let updated = self
            .categories
            .update_category(id, &changes)
            .await
            .map_err(constraint_to_validation)?
            .ok_or(ApiError::NotFound("Category"))?;
        info!(id, "Updated category");
        Ok(updated)
    }

    /// Delete a category under the configured policy.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> ApiResult<Category> {
        self.category(id).await?;

        if self.policies.category_delete == CategoryDeletePolicy::Restrict {
            let linked = self.categories.count_category_products(id).await?;
            if linked > 0 {
                return Err(ApiError::Conflict(format!(
                    "Category is assigned to {} product(s) and cannot be deleted.",
                    linked
                )));
            }
        }

        let deleted = self
            .categories
            .delete_category(id)
            .await?
            .ok_or(ApiError::NotFound("Category"))?;
        info!(id, "Deleted category");
        Ok(deleted)
    }

    // ---- products ----

    /// Filtered page of products.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ListQuery) -> ApiResult<Page<Product>> {
        Ok(self.products.list_products(query).await?)
    }

    /// Every product with its categories.
    #[instrument(skip(self))]
    pub async fn products_with_categories(&self) -> ApiResult<Vec<ProductWithCategories>> {
        Ok(self.products.products_with_categories().await?)
    }

    /// Single product with its categories.
    #[instrument(skip(self))]
    pub async fn product(&self, id: i64) -> ApiResult<ProductWithCategories> {
        let product = self.find_product(id).await?;
        let categories = self.products.product_categories(id).await?;
        Ok(ProductWithCategories {
            product,
            categories,
        })
    }

    async fn find_product(&self, id: i64) -> ApiResult<Product> {
        self.products
            .find_product(id)
            .await?
            .ok_or(ApiError::NotFound("Product"))
    }

    async fn ensure_categories_exist(&self, ids: &[i64]) -> ApiResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let existing = self.categories.existing_category_ids(ids).await?;
        let mut errors = ValidationError::new();
        for (index, id) in ids.iter().enumerate() {
            if !existing.contains(id) {
                let field = format!("{}.{}", CATEGORY_IDS_FIELD, index);
                errors.add(field.clone(), invalid_selection_message(&field));
            }
        }
        Ok(errors.into_result()?)
    }

    async fn store_image(&self, image: &ImageUpload) -> ApiResult<String> {
        let filename = image.generate_filename();
        let stored = self.images.put(&filename, &image.bytes).await?;
        info!(
            filename = %stored.filename,
            size_bytes = stored.size_bytes,
            "Stored product image"
        );
        Ok(filename)
    }

    async fn discard_image(&self, filename: &str) {
        match self.images.delete(filename).await {
            Ok(()) => debug!(filename, "Removed product image"),
            Err(e) => warn!(filename, error = %e, "Failed to remove product image"),
        }
    }

    async fn discard_replaced(&self, previous: Option<&str>) {
        if self.policies.image_cleanup != ImageCleanupPolicy::Remove {
            return;
        }
        if let Some(filename) = previous {
            self.discard_image(filename).await;
        }
    }

    /// Validate, store the image, then insert and link the product.
    #[instrument(skip(self, form))]
    pub async fn create_product(&self, form: FormInput) -> ApiResult<ProductWithCategories> {
        let draft = validate_new_product(form)?;
        if let Some(ids) = &draft.category_ids {
            self.ensure_categories_exist(ids).await?;
        }

        let stored = match &draft.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let mut product = draft.product;
        product.image1 = stored.clone();

        let created = self
            .products
            .create_product(&product, draft.category_ids.as_deref())
            .await
            .map_err(constraint_to_validation);
        let created = match created {
            Ok(created) => created,
            Err(e) => {
                if let Some(filename) = &stored {
                    self.discard_image(filename).await;
                }
                return Err(e.into());
            }
        };

        info!(id = created.id, name = %created.name, "Created product");
        let categories = self.products.product_categories(created.id).await?;
        Ok(ProductWithCategories {
            product: created,
            categories,
        })
    }

    /// Apply submitted product fields, image and category set.
    #[instrument(skip(self, form))]
    pub async fn update_product(
        &self,
        id: i64,
        form: FormInput,
    ) -> ApiResult<ProductWithCategories> {
        let existing = self.find_product(id).await?;
        let update = validate_product_update(form)?;
        if let Some(ids) = &update.category_ids {
            self.ensure_categories_exist(ids).await?;
        }

        let stored = match &update.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let mut changes = update.changes;
        if let Some(filename) = &stored {
            changes.image1 = Some(Some(filename.clone()));
        }

        let result = self
            .products
            .update_product(id, &changes, update.category_ids.as_deref())
            .await
            .map_err(|e| ApiError::from(constraint_to_validation(e)))
            .and_then(|updated| updated.ok_or(ApiError::NotFound("Product")));
        let updated = match result {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(filename) = &stored {
                    self.discard_image(filename).await;
                }
                return Err(e);
            }
        };

        if stored.is_some() && existing.image1 != updated.image1 {
            self.discard_replaced(existing.image1.as_deref()).await;
        }

        info!(id, "Updated product");
        let categories = self.products.product_categories(id).await?;
        Ok(ProductWithCategories {
            product: updated,
            categories,
        })
    }

    /// Validate every input, then insert them all in one unit of work.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn create_products(&self, inputs: Vec<Value>) -> ApiResult<Vec<Product>> {
        let mut forms = Vec::with_capacity(inputs.len());
        let mut errors = ValidationError::new();
        for (index, input) in inputs.into_iter().enumerate() {
            match FormInput::from_json(input) {
                Ok(form) => forms.push(form),
                Err(_) => {
                    let field = format!("inputs.{}", index);
                    errors.add(field.clone(), format!("The {} must be an object.", field));
                }
            }
        }
        errors.into_result()?;

        let products = validate_product_batch(forms)?;
        let created = self.products.create_products(&products).await?;
        info!(count = created.len(), "Created products");
        Ok(created)
    }

    /// Delete a product, removing its image under the cleanup policy.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> ApiResult<Product> {
        let deleted = self
            .products
            .delete_product(id)
            .await?
            .ok_or(ApiError::NotFound("Product"))?;
        self.discard_replaced(deleted.image1.as_deref()).await;
        info!(id, "Deleted product");
        Ok(deleted)
    }

    // ---- images ----

    /// Read a stored product image by filename.
    #[instrument(skip(self))]
    pub async fn image(&self, filename: &str) -> ApiResult<ImageFile> {
        if !is_safe_filename(filename) {
            debug!(filename, "Rejected unsafe image name");
            return Err(ApiError::NotFound("Image"));
        }
        match self.images.get(filename).await {
            Ok(bytes) => Ok(ImageFile {
                bytes,
                content_type: content_type_for_filename(filename),
            }),
            Err(e) => match e.kind() {
                StorefrontErrorKind::Storage(storage) if storage.is_not_found() => {
                    Err(ApiError::NotFound("Image"))
                }
                _ => Err(e.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_error::DatabaseError;

    #[test]
    fn unique_violation_becomes_name_error() {
        let err: StorefrontError =
            DatabaseError::new(DatabaseErrorKind::UniqueViolation("categories_name_key".into()))
                .into();
        match constraint_to_validation(err).into_kind() {
            StorefrontErrorKind::Validation(v) => {
                assert_eq!(v.errors()["name"], vec![taken_message("name")]);
            }
            other => panic!("unexpected kind: {}", other),
        }
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err: StorefrontError =
            DatabaseError::new(DatabaseErrorKind::Query("boom".into())).into();
        assert!(matches!(
            constraint_to_validation(err).kind(),
            StorefrontErrorKind::Database(_)
        ));
    }
}
