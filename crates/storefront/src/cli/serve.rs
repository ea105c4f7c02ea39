//! `serve` command handler.

use axum::Router;
use std::sync::Arc;
use storefront_error::StorefrontResult;
use storefront_interface::{CategoryRepository, Health, InMemoryCatalog, ProductRepository};
use storefront_server::{AppState, CatalogService, StorefrontConfig, create_router, serve};
use storefront_storage::FileSystemImageStore;
use tracing::info;

type Repositories = (
    Arc<dyn CategoryRepository>,
    Arc<dyn ProductRepository>,
    Arc<dyn Health>,
);

fn in_memory() -> Repositories {
    let catalog = Arc::new(InMemoryCatalog::new());
    (catalog.clone(), catalog.clone(), catalog)
}

#[cfg(feature = "database")]
fn postgres(config: &StorefrontConfig) -> StorefrontResult<Repositories> {
    use storefront_database::{PostgresCatalog, create_pool};

    let pool = create_pool(
        config.database().url().as_deref(),
        *config.database().pool_size(),
    )?;
    let catalog = Arc::new(PostgresCatalog::new(pool));
    Ok((catalog.clone(), catalog.clone(), catalog))
}

#[cfg(not(feature = "database"))]
fn postgres(_config: &StorefrontConfig) -> StorefrontResult<Repositories> {
    use storefront_error::{ServerError, ServerErrorKind};

    Err(ServerError::new(ServerErrorKind::Configuration(
        "built without the database feature; run with --memory".to_string(),
    ))
    .into())
}

/// Wire repositories, image storage and policies into a router.
pub fn build_router(config: &StorefrontConfig, memory: bool) -> StorefrontResult<Router> {
    let (categories, products, health) = if memory {
        info!("Using in-memory catalog");
        in_memory()
    } else {
        postgres(config)?
    };
    let images = Arc::new(FileSystemImageStore::new(config.storage().root())?);
    let service = CatalogService::new(categories, products, images, *config.policies());
    let state = AppState::new(service, config.page_limits(), health);
    create_router(state, config.server())
}

/// Handle the `serve` command.
pub async fn handle_serve(config: StorefrontConfig, memory: bool) -> StorefrontResult<()> {
    info!(
        bind = %config.server().bind(),
        storage = %config.storage().root().display(),
        category_delete = %config.policies().category_delete,
        image_cleanup = %config.policies().image_cleanup,
        "Starting Storefront API"
    );
    let router = build_router(&config, memory)?;
    serve(router, config.server().bind()).await
}
