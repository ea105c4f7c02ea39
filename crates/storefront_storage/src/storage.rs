//! Storage trait definition.

use storefront_error::StorefrontResult;

/// A file written to an image store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Name the file is addressed by
    pub filename: String,
    /// Backend-specific location
    pub storage_path: String,
    /// Size of the file in bytes
    pub size_bytes: u64,
    /// Content type derived from the extension
    pub content_type: &'static str,
}

/// Trait for pluggable product image backends.
///
/// Files are addressed by a flat filename inside the store's namespace.
/// Filenames that could escape the namespace are rejected with
/// `InvalidPath` before any I/O happens.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `data` under `filename`, replacing any previous file of that name.
    async fn put(&self, filename: &str, data: &[u8]) -> StorefrontResult<StoredImage>;

    /// Read a stored file.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such file exists, `InvalidPath` for unsafe names.
    async fn get(&self, filename: &str) -> StorefrontResult<Vec<u8>>;

    /// Remove a stored file.
    async fn delete(&self, filename: &str) -> StorefrontResult<()>;

    /// Check if a file exists.
    async fn exists(&self, filename: &str) -> StorefrontResult<bool>;
}
