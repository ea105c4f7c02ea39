//! Product image upload rules and stored filename generation.

use serde::{Deserialize, Serialize};

/// Form field that carries the product image.
pub const IMAGE_FIELD: &str = "image1";

/// Largest accepted upload: 2048 KiB.
pub const MAX_IMAGE_BYTES: usize = 2048 * 1024;

/// An image file received with a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    /// Client-side filename, used only for its extension
    pub original_name: Option<String>,
    /// Declared MIME type
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wrap raw bytes with the client's filename and MIME type.
    pub fn new(
        original_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            original_name,
            content_type,
            bytes,
        }
    }

    /// MIME type, preferring the declared one and falling back to the extension.
    pub fn mime(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase()
            })
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .or_else(|| {
                self.original_extension()
                    .and_then(|ext| mime_for_extension(&ext))
                    .map(str::to_string)
            })
    }

    /// Whether the upload is an image by MIME type.
    pub fn is_image(&self) -> bool {
        self.mime().is_some_and(|m| m.starts_with("image/"))
    }

    /// Extension of the client filename when it is a short alphanumeric token.
    pub fn original_extension(&self) -> Option<String> {
        let name = self.original_name.as_deref()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || ext.len() > 5 {
            return None;
        }
        if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Extension for the stored copy.
    pub fn stored_extension(&self) -> String {
        self.original_extension()
            .or_else(|| {
                self.mime()
                    .as_deref()
                    .and_then(extension_for_mime)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "bin".to_string())
    }

    /// Fresh collision-resistant filename: 32 hex characters plus extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use storefront_core::{ImageUpload, is_safe_filename};
    ///
    /// let upload = ImageUpload::new(Some("photo.PNG".into()), Some("image/png".into()), vec![1]);
    /// let name = upload.generate_filename();
    ///
    /// assert!(name.ends_with(".png"));
    /// assert_eq!(name.len(), 32 + 4);
    /// assert!(is_safe_filename(&name));
    /// ```
    pub fn generate_filename(&self) -> String {
        format!(
            "{}.{}",
            uuid::Uuid::new_v4().simple(),
            self.stored_extension()
        )
    }
}

/// MIME type for a known image or common file extension.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let ext = match mime {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/svg+xml" => "svg",
        "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
        "image/tiff" => "tiff",
        "image/avif" => "avif",
        "image/heic" => "heic",
        _ => return None,
    };
    Some(ext)
}

/// Content type to send for a stored file.
pub fn content_type_for_filename(filename: &str) -> &'static str {
    filename
        .rsplit_once('.')
        .and_then(|(_, ext)| mime_for_extension(ext))
        .unwrap_or("application/octet-stream")
}

/// Whether `name` can address a stored image without escaping its directory.
///
/// Only `[A-Za-z0-9._-]` is allowed, `..` never is.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.contains("..")
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: Option<&str>, ct: Option<&str>) -> ImageUpload {
        ImageUpload::new(name.map(String::from), ct.map(String::from), vec![0u8; 4])
    }

    #[test]
    fn extension_comes_from_original_name_when_usable() {
        assert_eq!(upload(Some("cat.JPEG"), None).stored_extension(), "jpeg");
        assert_eq!(upload(Some("archive.tar.gz"), None).stored_extension(), "gz");
    }

    #[test]
    fn extension_falls_back_to_mime() {
        assert_eq!(upload(Some("noext"), Some("image/png")).stored_extension(), "png");
        assert_eq!(upload(Some("x.we!rd"), Some("image/webp")).stored_extension(), "webp");
        assert_eq!(upload(None, None).stored_extension(), "bin");
    }

    #[test]
    fn mime_uses_extension_when_declared_type_is_generic() {
        let up = upload(Some("shot.gif"), Some("application/octet-stream"));
        assert_eq!(up.mime().as_deref(), Some("image/gif"));
        assert!(up.is_image());
        assert!(!upload(Some("notes.txt"), Some("text/plain")).is_image());
    }

    #[test]
    fn generated_names_differ() {
        let up = upload(Some("a.png"), None);
        assert_ne!(up.generate_filename(), up.generate_filename());
    }

    #[test]
    fn unsafe_names_are_rejected() {
        for bad in ["", "../etc/passwd", "a/b.png", "a\\b.png", ".hidden", "x..png", "sp ace.png"] {
            assert!(!is_safe_filename(bad), "{bad} should be rejected");
        }
        assert!(is_safe_filename("0f3c9a_b-1.png"));
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for_filename("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for_filename("a.unknown"), "application/octet-stream");
    }
}
