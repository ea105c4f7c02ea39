//! Create/edit form state.

use crate::Resource;
use std::path::PathBuf;
use storefront_core::{CATEGORY_IDS_FIELD, Category, IMAGE_FIELD, ProductWithCategories, required_message};
use storefront_error::FieldErrors;

/// One editable input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Name sent to the API
    pub name: &'static str,
    /// Label shown above the input
    pub label: &'static str,
    /// Current text
    pub value: String,
    /// Checked for presence before submit
    pub required: bool,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, value: impl Into<String>, required: bool) -> Self {
        Self {
            name,
            label,
            value: value.into(),
            required,
        }
    }
}

/// Write request assembled from a submitted form.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Target resource
    pub resource: Resource,
    /// Row being edited; `None` creates
    pub id: Option<i64>,
    /// Scalar fields
    pub fields: Vec<(String, String)>,
    /// Category set for products
    pub category_ids: Option<Vec<String>>,
    /// Local image file to upload
    pub image: Option<PathBuf>,
}

/// The create/edit modal.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Resource being written
    pub resource: Resource,
    /// Id when editing
    pub editing: Option<i64>,
    /// Inputs in display order
    pub fields: Vec<FormField>,
    /// Index of the focused input
    pub focused: usize,
    /// Messages per field, from local checks or the server
    pub errors: FieldErrors,
}

impl FormState {
    /// Category form, pre-populated when editing.
    pub fn category(existing: Option<&Category>) -> Self {
        Self {
            resource: Resource::Categories,
            editing: existing.map(|c| c.id),
            fields: vec![
                FormField::new("name", "Name", existing.map(|c| c.name.clone()).unwrap_or_default(), true),
                FormField::new(
                    "CategoryChoix",
                    "CategoryChoix",
                    existing.map(|c| c.category_choix.clone()).unwrap_or_default(),
                    true,
                ),
            ],
            focused: 0,
            errors: FieldErrors::new(),
        }
    }

    /// Product form, pre-populated when editing.
    pub fn product(existing: Option<&ProductWithCategories>) -> Self {
        let product = existing.map(|p| &p.product);
        let category_ids = existing
            .map(|p| {
                p.categories
                    .iter()
                    .map(|c| c.id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        Self {
            resource: Resource::Products,
            editing: product.map(|p| p.id),
            fields: vec![
                FormField::new("name", "Name", product.map(|p| p.name.clone()).unwrap_or_default(), true),
                FormField::new(
                    "description",
                    "Description",
                    product.and_then(|p| p.description.clone()).unwrap_or_default(),
                    false,
                ),
                FormField::new(
                    "price",
                    "Price",
                    product.and_then(|p| p.price).map(|p| p.to_string()).unwrap_or_default(),
                    false,
                ),
                FormField::new(
                    "quantity_available",
                    "Quantity available",
                    product.map(|p| p.quantity_available.to_string()).unwrap_or_default(),
                    true,
                ),
                FormField::new(CATEGORY_IDS_FIELD, "Category ids (comma separated)", category_ids, false),
                FormField::new(IMAGE_FIELD, "Image file path", "", false),
            ],
            focused: 0,
            errors: FieldErrors::new(),
        }
    }

    /// Whether the form edits an existing row.
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Current text of a field.
    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
            .unwrap_or_default()
    }

    /// Replace the text of a field.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value.into();
        }
    }

    /// Focus the next input, wrapping.
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    /// Focus the previous input, wrapping.
    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused input.
    pub fn insert_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(ch);
        }
    }

    /// Delete from the focused input.
    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// Messages to show under `name`, including per-element keys like `category_id.0`.
    pub fn errors_for(&self, name: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(key, _)| {
                key.as_str() == name
                    || key
                        .strip_prefix(name)
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
            .collect()
    }

    /// Presence check for required inputs. Returns `true` when the form may be sent.
    pub fn check_required(&mut self) -> bool {
        self.errors = self
            .fields
            .iter()
            .filter(|f| f.required && f.value.trim().is_empty())
            .map(|f| (f.name.to_string(), vec![required_message(f.name)]))
            .collect();
        self.errors.is_empty()
    }

    /// Build the write request.
    pub fn submission(&self) -> Submission {
        let mut fields = Vec::new();
        let mut category_ids = None;
        let mut image = None;
        for field in &self.fields {
            match field.name {
                CATEGORY_IDS_FIELD => {
                    category_ids = Some(
                        field
                            .value
                            .split(',')
                            .map(str::trim)
                            .filter(|id| !id.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                IMAGE_FIELD => {
                    let path = field.value.trim();
                    if !path.is_empty() {
                        image = Some(PathBuf::from(path));
                    }
                }
                name => fields.push((name.to_string(), field.value.trim().to_string())),
            }
        }
        Submission {
            resource: self.resource,
            id: self.editing,
            fields,
            category_ids,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storefront_core::Product;

    fn widget() -> ProductWithCategories {
        let now = Utc::now();
        ProductWithCategories {
            product: Product {
                id: 4,
                name: "Widget".to_string(),
                description: None,
                price: Some(9.5),
                quantity_available: 3,
                image1: Some("abc.png".to_string()),
                created_at: now,
                updated_at: now,
            },
            categories: vec![
                Category {
                    id: 1,
                    name: "A".to_string(),
                    category_choix: "x".to_string(),
                    created_at: now,
                    updated_at: now,
                },
                Category {
                    id: 3,
                    name: "C".to_string(),
                    category_choix: "x".to_string(),
                    created_at: now,
                    updated_at: now,
                },
            ],
        }
    }

    #[test]
    fn edit_form_is_prepopulated() {
        let form = FormState::product(Some(&widget()));
        assert!(form.is_editing());
        assert_eq!(form.value("name"), "Widget");
        assert_eq!(form.value("price"), "9.5");
        assert_eq!(form.value("category_id"), "1, 3");
        assert_eq!(form.value("image1"), "");
    }

    #[test]
    fn required_fields_are_checked_locally() {
        let mut form = FormState::product(None);
        form.set_value("name", "   ");
        assert!(!form.check_required());
        assert_eq!(form.errors_for("name"), vec!["The name field is required."]);
        assert_eq!(form.errors_for("quantity_available").len(), 1);
        assert!(form.errors_for("price").is_empty());

        form.set_value("name", "Lamp");
        form.set_value("quantity_available", "2");
        assert!(form.check_required());
    }

    #[test]
    fn submission_splits_category_ids_and_image() {
        let mut form = FormState::product(Some(&widget()));
        form.set_value("category_id", "1, ,3,");
        form.set_value("image1", " /tmp/lamp.jpg ");
        let submission = form.submission();
        assert_eq!(submission.id, Some(4));
        assert_eq!(
            submission.category_ids,
            Some(vec!["1".to_string(), "3".to_string()])
        );
        assert_eq!(submission.image, Some(PathBuf::from("/tmp/lamp.jpg")));
        assert!(submission.fields.iter().all(|(name, _)| name != "image1"));
    }

    #[test]
    fn element_errors_show_under_their_field() {
        let mut form = FormState::product(None);
        form.errors
            .insert("category_id.1".to_string(), vec!["The selected category id 1 is invalid.".to_string()]);
        form.errors
            .insert("category_ids".to_string(), vec!["other".to_string()]);
        assert_eq!(form.errors_for("category_id").len(), 1);
    }

    #[test]
    fn focus_wraps() {
        let mut form = FormState::category(None);
        form.focus_previous();
        assert_eq!(form.focused, 1);
        form.focus_next();
        assert_eq!(form.focused, 0);
        form.insert_char('a');
        form.insert_char('b');
        form.backspace();
        assert_eq!(form.value("name"), "a");
    }
}
