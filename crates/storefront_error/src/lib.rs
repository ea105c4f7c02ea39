//! Error types for the Storefront back-office.
//!
//! This crate provides the foundation error types used throughout the Storefront workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Request validation is the exception: [`ValidationError`] carries a map of
//! field names to messages so callers can render errors next to each field.
//!
//! # Examples
//!
//! ```
//! use storefront_error::{StorefrontResult, HttpError};
//!
//! fn fetch_data() -> StorefrontResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod http;
mod json;
mod server;
mod storage;
#[cfg(feature = "tui")]
mod tui;
mod validation;

pub use config::{ConfigError, ConfigErrorKind};
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{StorefrontError, StorefrontErrorKind, StorefrontResult};
pub use http::{HttpError, HttpErrorKind};
pub use json::JsonError;
pub use server::{ServerError, ServerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
#[cfg(feature = "tui")]
pub use tui::{TuiError, TuiErrorKind, TuiResult};
pub use validation::{FieldErrors, ValidationError};
