//! Category records and their write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product category as stored.
///
/// The classification field is serialized under its historical key
/// `CategoryChoix`.
///
/// # Examples
///
/// ```
/// use storefront_core::Category;
/// use chrono::Utc;
///
/// let category = Category {
///     id: 1,
///     name: "Electronics".to_string(),
///     category_choix: "retail".to_string(),
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
///
/// let json = serde_json::to_value(&category).unwrap();
/// assert_eq!(json["CategoryChoix"], "retail");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Server-generated identifier
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Opaque classification value
    #[serde(rename = "CategoryChoix")]
    pub category_choix: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Whether `term` (already lowercased) occurs in the name or classification.
    pub fn matches_search(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term) || self.category_choix.to_lowercase().contains(term)
    }
}

/// Validated payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Unique display name
    pub name: String,
    /// Opaque classification value
    #[serde(rename = "CategoryChoix")]
    pub category_choix: String,
}

/// Validated partial update for a category. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChanges {
    /// Replacement name
    pub name: Option<String>,
    /// Replacement classification
    #[serde(rename = "CategoryChoix")]
    pub category_choix: Option<String>,
}

impl CategoryChanges {
    /// True when nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category_choix.is_none()
    }

    /// Apply the changes to an in-memory record.
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(choix) = &self.category_choix {
            category.category_choix = choix.clone();
        }
    }
}
