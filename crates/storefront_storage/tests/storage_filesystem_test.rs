//! Tests for filesystem image storage.

use storefront_error::{StorageErrorKind, StorefrontErrorKind};
use storefront_storage::{FileSystemImageStore, ImageStore, PRODUCT_IMAGE_NAMESPACE};
use tempfile::TempDir;

fn storage_kind(err: &storefront_error::StorefrontError) -> StorageErrorKind {
    match err.kind() {
        StorefrontErrorKind::Storage(e) => e.kind.clone(),
        other => panic!("expected storage error, got {other}"),
    }
}

#[tokio::test]
async fn test_put_and_get() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemImageStore::new(temp_dir.path()).unwrap();

    let data = b"\x89PNG\r\n\x1a\nrest";
    let stored = storage.put("abc123.png", data).await.unwrap();

    assert_eq!(stored.filename, "abc123.png");
    assert_eq!(stored.size_bytes, data.len() as u64);
    assert_eq!(stored.content_type, "image/png");
    assert!(
        temp_dir
            .path()
            .join(PRODUCT_IMAGE_NAMESPACE)
            .join("abc123.png")
            .exists()
    );

    let retrieved = storage.get("abc123.png").await.unwrap();
    assert_eq!(retrieved, data);
}

#[tokio::test]
async fn test_no_temp_files_left_behind() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemImageStore::new(temp_dir.path()).unwrap();
    storage.put("one.jpg", b"1").await.unwrap();
    storage.put("one.jpg", b"2").await.unwrap();

    let names: Vec<String> = std::fs::read_dir(storage.directory())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["one.jpg".to_string()]);
    assert_eq!(storage.get("one.jpg").await.unwrap(), b"2");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemImageStore::new(temp_dir.path()).unwrap();

    let err = storage.get("nope.png").await.unwrap_err();
    assert!(matches!(storage_kind(&err), StorageErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("secret.txt"), b"secret").unwrap();
    let storage = FileSystemImageStore::new(temp_dir.path()).unwrap();

    for name in ["../secret.txt", "../../secret.txt", "a/b.png", ""] {
        let err = storage.get(name).await.unwrap_err();
        assert!(
            matches!(storage_kind(&err), StorageErrorKind::InvalidPath(_)),
            "{name} should be rejected"
        );
    }
    assert!(storage.put("../escape.png", b"x").await.is_err());
}

#[tokio::test]
async fn test_delete_and_exists() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemImageStore::new(temp_dir.path()).unwrap();

    storage.put("gone.gif", b"GIF89a").await.unwrap();
    assert!(storage.exists("gone.gif").await.unwrap());

    storage.delete("gone.gif").await.unwrap();
    assert!(!storage.exists("gone.gif").await.unwrap());

    let err = storage.delete("gone.gif").await.unwrap_err();
    assert!(matches!(storage_kind(&err), StorageErrorKind::NotFound(_)));
}
