//! Repository traits for the Storefront back-office.
//!
//! The HTTP layer talks to storage only through [`CategoryRepository`] and
//! [`ProductRepository`]. [`InMemoryCatalog`] implements both without a
//! database and backs tests and local demos.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod in_memory;
mod traits;

pub use in_memory::InMemoryCatalog;
pub use traits::{CategoryRepository, Health, ProductRepository};
