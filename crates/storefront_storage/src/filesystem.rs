//! Filesystem-based image storage implementation.

use crate::{ImageStore, StoredImage};
use std::path::{Path, PathBuf};
use storefront_core::{content_type_for_filename, is_safe_filename};
use storefront_error::{StorageError, StorageErrorKind, StorefrontResult};

/// Namespace product images are written to under the storage root.
pub const PRODUCT_IMAGE_NAMESPACE: &str = "store/product";

/// Filesystem storage backend.
///
/// Stores files flat in `{base_path}/{namespace}/{filename}`.
///
/// # Features
///
/// - **Namespaced**: every file lives in one directory below the root
/// - **Safe names only**: `[A-Za-z0-9._-]`, never `..`
/// - **Atomic writes**: Uses temp file + rename for atomicity
#[derive(Debug, Clone)]
pub struct FileSystemImageStore {
    directory: PathBuf,
}

impl FileSystemImageStore {
    /// Create a store rooted at `base_path` using the product image namespace.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> StorefrontResult<Self> {
        Self::with_namespace(base_path, PRODUCT_IMAGE_NAMESPACE)
    }

    /// Create a store in `{base_path}/{namespace}`.
    #[tracing::instrument(skip(base_path))]
    pub fn with_namespace(base_path: impl Into<PathBuf>, namespace: &str) -> StorefrontResult<Self> {
        let directory = base_path.into().join(namespace);

        std::fs::create_dir_all(&directory).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                directory.display(),
                e
            )))
        })?;

        tracing::info!(path = %directory.display(), "Created image storage");
        Ok(Self { directory })
    }

    /// Directory files are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resolve a filename to its path, rejecting anything unsafe.
    #[track_caller]
    fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if !is_safe_filename(filename) {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(
                filename.to_string(),
            )));
        }
        Ok(self.directory.join(filename))
    }
}

#[async_trait::async_trait]
impl ImageStore for FileSystemImageStore {
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, filename: &str, data: &[u8]) -> StorefrontResult<StoredImage> {
        let path = self.resolve(filename)?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self
            .directory
            .join(format!(".{}.{}.tmp", filename, uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        tracing::info!(
            path = %path.display(),
            size = data.len(),
            "Stored image file"
        );

        Ok(StoredImage {
            filename: filename.to_string(),
            storage_path: path.to_string_lossy().to_string(),
            size_bytes: data.len() as u64,
            content_type: content_type_for_filename(filename),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, filename: &str) -> StorefrontResult<Vec<u8>> {
        let path = self.resolve(filename)?;

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(filename.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %path.display(), size = data.len(), "Retrieved image file");
        Ok(data)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, filename: &str) -> StorefrontResult<()> {
        let path = self.resolve(filename)?;

        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(filename.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileDelete(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %path.display(), "Deleted image file");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn exists(&self, filename: &str) -> StorefrontResult<bool> {
        let path = self.resolve(filename)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }
}
