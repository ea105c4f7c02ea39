//! HTTP API for the Storefront back-office.
//!
//! Routes are thin: each handler extracts a [`FormBody`] or list query,
//! calls [`CatalogService`], and wraps the result in an
//! [`Envelope`](storefront_core::Envelope). Failures become [`ApiError`]s,
//! which render as envelopes with `success: false`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront_core::Policies;
//! use storefront_interface::InMemoryCatalog;
//! use storefront_server::{AppState, CatalogService, StorefrontConfig, create_router, serve};
//! use storefront_storage::FileSystemImageStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StorefrontConfig::load(None)?;
//!     let catalog = Arc::new(InMemoryCatalog::new());
//!     let images = Arc::new(FileSystemImageStore::new(config.storage().root())?);
//!
//!     let service = CatalogService::new(catalog.clone(), catalog.clone(), images, Policies::default());
//!     let state = AppState::new(service, config.page_limits(), catalog);
//!     let router = create_router(state, config.server())?;
//!
//!     serve(router, config.server().bind()).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod extract;
mod server;
mod service;
mod state;

pub use api::create_router;
pub use config::{
    DatabaseSettings, ENV_PREFIX, LoggingSettings, ServerSettings, StorageSettings,
    StorefrontConfig,
};
pub use error::{ApiError, ApiResult, UNEXPECTED_MESSAGE};
pub use extract::FormBody;
pub use server::{serve, serve_with_shutdown, shutdown_signal};
pub use service::{CatalogService, ImageFile};
pub use state::AppState;
