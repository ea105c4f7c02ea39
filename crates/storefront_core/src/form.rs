//! Transport-neutral request fields.
//!
//! JSON bodies and multipart forms are both normalized into [`FormInput`]
//! before validation. Text is trimmed and empty strings become
//! [`FieldValue::Null`].

use crate::ImageUpload;
use serde_json::Value;
use std::collections::BTreeMap;
use storefront_error::ValidationError;

/// A single submitted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Explicit null or blank text
    Null,
    /// Scalar text (numbers and booleans are rendered as text)
    Text(String),
    /// Repeated or array-valued field
    List(Vec<String>),
}

impl FieldValue {
    /// Normalize free text: trim, and treat blank as null.
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            FieldValue::Null
        } else {
            FieldValue::Text(trimmed.to_string())
        }
    }
}

/// Submitted fields plus an optional uploaded image.
///
/// # Examples
///
/// ```
/// use storefront_core::{FieldValue, FormInput};
///
/// let form = FormInput::from_json(serde_json::json!({
///     "name": "  Widget ",
///     "description": "",
///     "category_id": [1, 2],
/// }))
/// .unwrap();
///
/// assert_eq!(form.text("name"), Some("Widget"));
/// assert_eq!(form.get("description"), Some(&FieldValue::Null));
/// assert_eq!(
///     form.get("category_id"),
///     Some(&FieldValue::List(vec!["1".to_string(), "2".to_string()]))
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    fields: BTreeMap<String, FieldValue>,
    image: Option<ImageUpload>,
}

impl FormInput {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a JSON object body.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the body is not an object.
    #[track_caller]
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        let Value::Object(map) = body else {
            return Err(ValidationError::field(
                "body",
                "The request body must be a JSON object.",
            ));
        };
        let mut form = Self::new();
        for (name, value) in map {
            let field = match value {
                Value::Null => FieldValue::Null,
                // Non-scalar entries keep their JSON text so validation can flag them.
                Value::Array(items) => FieldValue::List(
                    items
                        .iter()
                        .map(|item| scalar_text(item).unwrap_or_else(|| item.to_string()))
                        .collect(),
                ),
                other => match scalar_text(&other) {
                    Some(text) => FieldValue::text(text),
                    None => FieldValue::Text(other.to_string()),
                },
            };
            form.fields.insert(name, field);
        }
        Ok(form)
    }

    /// Builder-style insert of a text field.
    pub fn with_text(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.fields.insert(name.into(), FieldValue::text(value));
        self
    }

    /// Builder-style insert of a list field.
    pub fn with_list<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(
            name.into(),
            FieldValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Builder-style attach of an image.
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Record one multipart text part.
    ///
    /// Names ending in `[]` always produce a list; a plain name seen twice
    /// is promoted to a list.
    pub fn push_part(&mut self, name: &str, value: &str) {
        if let Some(base) = name.strip_suffix("[]") {
            let entry = self
                .fields
                .entry(base.to_string())
                .or_insert_with(|| FieldValue::List(Vec::new()));
            let trimmed = value.trim();
            match entry {
                FieldValue::List(items) => {
                    if !trimmed.is_empty() {
                        items.push(trimmed.to_string());
                    }
                }
                FieldValue::Text(previous) => {
                    let mut items = vec![std::mem::take(previous)];
                    if !trimmed.is_empty() {
                        items.push(trimmed.to_string());
                    }
                    *entry = FieldValue::List(items);
                }
                FieldValue::Null => {
                    *entry = FieldValue::List(
                        Some(trimmed.to_string())
                            .filter(|t| !t.is_empty())
                            .into_iter()
                            .collect(),
                    );
                }
            }
            return;
        }

        let incoming = FieldValue::text(value);
        match self.fields.get_mut(name) {
            None => {
                self.fields.insert(name.to_string(), incoming);
            }
            Some(FieldValue::List(items)) => {
                if let FieldValue::Text(text) = incoming {
                    items.push(text);
                }
            }
            Some(existing @ FieldValue::Text(_)) => {
                if let (FieldValue::Text(previous), FieldValue::Text(text)) =
                    (existing.clone(), incoming)
                {
                    *existing = FieldValue::List(vec![previous, text]);
                }
            }
            Some(existing @ FieldValue::Null) => {
                *existing = incoming;
            }
        }
    }

    /// Attach the uploaded image.
    pub fn set_image(&mut self, image: ImageUpload) {
        self.image = Some(image);
    }

    /// Raw field lookup; `None` when the field was not submitted.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Whether the field was submitted at all (even as null).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name) || (name == crate::IMAGE_FIELD && self.image.is_some())
    }

    /// Scalar text of a field, `None` when missing, null, or a list.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// The uploaded image, if any.
    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    /// Take ownership of the uploaded image.
    pub fn take_image(&mut self) -> Option<ImageUpload> {
        self.image.take()
    }

    /// All submitted fields.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        _ => None,
    }
}
