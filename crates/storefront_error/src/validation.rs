//! Field-level validation errors.

use std::collections::BTreeMap;

/// Validation messages keyed by request field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// One or more request fields failed validation.
///
/// # Examples
///
/// ```
/// use storefront_error::ValidationError;
///
/// let err = ValidationError::field("name", "The name has already been taken.");
/// assert_eq!(
///     err.errors()["name"],
///     vec!["The name has already been taken.".to_string()]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct ValidationError {
    /// Messages per field, in field-name order
    pub errors: FieldErrors,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create an empty validation error at the current location.
    #[track_caller]
    pub fn new() -> Self {
        let location = std::panic::Location::caller();
        Self {
            errors: FieldErrors::new(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a validation error holding a single field message.
    #[track_caller]
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add(name, message);
        err
    }

    /// Append a message for `name`.
    pub fn add(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(name.into())
            .or_default()
            .push(message.into());
    }

    /// Fold another error's messages into this one.
    pub fn merge(&mut self, other: ValidationError) {
        for (name, messages) in other.errors {
            self.errors.entry(name).or_default().extend(messages);
        }
    }

    /// True when no field has a message.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages keyed by field.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// First message recorded, used as the summary line.
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Default for ValidationError {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation Error: ")?;
        let mut first = true;
        for (name, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", name, message)?;
                first = false;
            }
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_messages_from_both_sides() {
        let mut left = ValidationError::field("name", "The name field is required.");
        let mut right = ValidationError::field("name", "too long");
        right.add("price", "The price must be a number.");
        left.merge(right);

        assert_eq!(left.errors()["name"].len(), 2);
        assert_eq!(left.errors()["price"].len(), 1);
        assert_eq!(left.first_message(), Some("The name field is required."));
    }

    #[test]
    fn empty_error_converts_to_ok() {
        assert!(ValidationError::new().into_result().is_ok());
        assert!(ValidationError::field("a", "b").into_result().is_err());
    }

    #[test]
    fn display_lists_every_field() {
        let mut err = ValidationError::field("name", "required");
        err.add("quantity_available", "must be an integer");
        let text = err.to_string();
        assert!(text.contains("name: required"));
        assert!(text.contains("quantity_available: must be an integer"));
    }
}
