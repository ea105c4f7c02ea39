//! Top-level error wrapper types.

use crate::{
    ConfigError, DatabaseError, HttpError, JsonError, ServerError, StorageError, ValidationError,
};
#[cfg(feature = "tui")]
use crate::TuiError;

/// Every error a Storefront crate can surface.
///
/// # Examples
///
/// ```
/// use storefront_error::{StorefrontError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: StorefrontError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StorefrontErrorKind {
    /// HTTP client error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Image storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Request validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// HTTP server lifecycle error
    #[from(ServerError)]
    Server(ServerError),
    /// Terminal UI error
    #[cfg(feature = "tui")]
    #[from(TuiError)]
    Tui(TuiError),
}

/// Storefront error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storefront_error::{ConfigError, ConfigErrorKind, StorefrontResult};
///
/// fn might_fail() -> StorefrontResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Invalid("missing [server]".into())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storefront Error: {}", _0)]
pub struct StorefrontError(Box<StorefrontErrorKind>);

impl StorefrontError {
    /// Create a new error from a kind.
    pub fn new(kind: StorefrontErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorefrontErrorKind {
        &self.0
    }

    /// Consume the wrapper and return the kind.
    pub fn into_kind(self) -> StorefrontErrorKind {
        *self.0
    }
}

// Generic From implementation for any type that converts to StorefrontErrorKind
impl<T> From<T> for StorefrontError
where
    T: Into<StorefrontErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storefront operations.
///
/// # Examples
///
/// ```
/// use storefront_error::{StorefrontResult, HttpError};
///
/// fn fetch_data() -> StorefrontResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type StorefrontResult<T> = std::result::Result<T, StorefrontError>;
