//! Storefront - e-commerce back-office
//!
//! A catalog of products and categories served over a JSON HTTP API, with
//! product image upload and a terminal admin UI for day-to-day editing.
//!
//! # Features
//!
//! - **Catalog API**: Paginated, searchable CRUD for categories and products
//! - **Image Uploads**: Product photos stored under generated filenames and served back
//! - **Database Integration**: PostgreSQL persistence through Diesel
//! - **Terminal UI**: List, search, create, edit and delete records from the terminal
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront::{
//!     AppState, CatalogService, FileSystemImageStore, InMemoryCatalog, Policies,
//!     StorefrontConfig, create_router, serve,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StorefrontConfig::bundled()?;
//!     let catalog = Arc::new(InMemoryCatalog::new());
//!     let images = Arc::new(FileSystemImageStore::new("storage/app")?);
//!     let service = CatalogService::new(catalog.clone(), catalog.clone(), images, Policies::default());
//!     let state = AppState::new(service, config.page_limits(), catalog);
//!     let router = create_router(state, config.server())?;
//!     serve(router, "127.0.0.1:8000").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` - PostgreSQL catalog (default)
//! - `tui` - Terminal admin UI (default)
//! - `observability` - OpenTelemetry span export to stdout
//!
//! # Architecture
//!
//! - `storefront_error` - Error types
//! - `storefront_core` - Domain types, pagination, validation, image naming
//! - `storefront_interface` - Repository traits and the in-memory catalog
//! - `storefront_storage` - Product image storage
//! - `storefront_database` - PostgreSQL integration
//! - `storefront_server` - HTTP API
//! - `storefront_tui` - Terminal admin UI
//!
//! This crate (`storefront`) re-exports everything for convenience.

pub use storefront_core::*;
pub use storefront_error::*;
pub use storefront_interface::*;
pub use storefront_server::*;
pub use storefront_storage::*;

#[cfg(feature = "database")]
pub use storefront_database::*;

#[cfg(feature = "tui")]
pub use storefront_tui::*;

mod observability;

pub use observability::{ObservabilityConfig, init_observability, init_observability_with_config};
