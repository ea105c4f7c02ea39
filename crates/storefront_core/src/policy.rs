//! Behavior switches for deletes and image replacement.

use serde::{Deserialize, Serialize};

/// What happens to product links when a category is deleted.
///
/// # Examples
///
/// ```
/// use storefront_core::CategoryDeletePolicy;
/// use std::str::FromStr;
///
/// assert_eq!(CategoryDeletePolicy::default(), CategoryDeletePolicy::Detach);
/// assert_eq!(CategoryDeletePolicy::from_str("restrict").unwrap(), CategoryDeletePolicy::Restrict);
/// assert_eq!(CategoryDeletePolicy::Detach.to_string(), "detach");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CategoryDeletePolicy {
    /// Remove the join rows, then the category
    #[default]
    Detach,
    /// Refuse while any product references the category
    Restrict,
}

/// What happens to a stored image file once no product points at it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageCleanupPolicy {
    /// Leave the file in storage
    #[default]
    Keep,
    /// Delete the file
    Remove,
}

/// Both policies together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policies {
    /// Category delete behavior
    #[serde(default)]
    pub category_delete: CategoryDeletePolicy,
    /// Image cleanup behavior
    #[serde(default)]
    pub image_cleanup: ImageCleanupPolicy,
}
