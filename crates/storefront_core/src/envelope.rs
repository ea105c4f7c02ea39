//! Uniform JSON response envelope.

use serde::{Deserialize, Serialize};
use storefront_error::FieldErrors;

/// Every JSON endpoint answers with this shape.
///
/// # Examples
///
/// ```
/// use storefront_core::Envelope;
///
/// let ok = Envelope::ok(5);
/// assert_eq!(serde_json::to_value(&ok).unwrap(), serde_json::json!({"data": 5, "success": true}));
///
/// let failed: Envelope<i32> = Envelope::failure("Product not found.");
/// let json = serde_json::to_value(&failed).unwrap();
/// assert_eq!(json["success"], false);
/// assert!(json["data"].is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload, `null` on failure
    pub data: Option<T>,
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-field validation messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            message: None,
            errors: None,
        }
    }

    /// Successful response with a summary message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    /// Failed response without field detail.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            success: false,
            message: Some(message.into()),
            errors: None,
        }
    }

    /// Failed validation with per-field messages.
    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::failure(message)
        }
    }

    /// The payload of a successful envelope.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}
