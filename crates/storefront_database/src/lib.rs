//! PostgreSQL integration for the Storefront back-office.
//!
//! This crate provides the Diesel schema, row models, and a pooled
//! implementation of the catalog repository traits.
//!
//! # Features
//!
//! - Diesel-based PostgreSQL integration over an r2d2 pool
//! - Case-insensitive search with escaped LIKE patterns
//! - Transactional category synchronization and batch inserts
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_database::{create_pool, PostgresCatalog};
//! use storefront_interface::CategoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = PostgresCatalog::new(create_pool(None, 10)?);
//! let categories = catalog.all_categories().await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod connection;
mod models;
pub mod queries;

// Public modules for external access
pub mod schema;

pub use catalog::PostgresCatalog;
pub use connection::{PgPool, create_pool, database_url, establish_connection};
pub use models::{
    CategoryChangeset, CategoryProductRow, CategoryRow, NewCategoryRow, NewProductRow,
    ProductChangeset, ProductRow,
};

use storefront_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
