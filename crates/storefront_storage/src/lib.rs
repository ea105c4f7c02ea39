//! Product image storage for the Storefront back-office.
//!
//! Uploaded images are written under server-generated filenames and served
//! back by name. The [`ImageStore`] trait keeps the HTTP layer independent of
//! where the bytes live.
//!
//! # Example
//!
//! ```rust
//! use storefront_storage::{FileSystemImageStore, ImageStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemImageStore::new("/tmp/storefront")?;
//!
//! let data = vec![0u8; 1024];
//! let stored = storage.put("0f3c9a.png", &data).await?;
//! assert_eq!(stored.content_type, "image/png");
//!
//! let retrieved = storage.get(&stored.filename).await?;
//! assert_eq!(data, retrieved);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod storage;

pub use filesystem::{FileSystemImageStore, PRODUCT_IMAGE_NAMESPACE};
pub use storage::{ImageStore, StoredImage};
pub use storefront_error::{StorageError, StorageErrorKind};
