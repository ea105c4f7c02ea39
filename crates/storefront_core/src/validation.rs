//! Request rules for category and product writes.
//!
//! Rules that need the store (name uniqueness, category existence) are
//! applied by the service; everything decidable from the request alone
//! lives here.

use crate::{
    CategoryChanges, FieldValue, FormInput, IMAGE_FIELD, ImageUpload, MAX_IMAGE_BYTES,
    NewCategory, NewProduct, ProductChanges,
};
use storefront_error::ValidationError;

/// Longest accepted category name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Field carrying the category id set.
pub const CATEGORY_IDS_FIELD: &str = "category_id";

/// Product create request after request-local rules pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Columns to insert, `image1` still unset
    pub product: NewProduct,
    /// Category set to synchronize, deduplicated, when submitted
    pub category_ids: Option<Vec<i64>>,
    /// Image to store before insert
    pub image: Option<ImageUpload>,
}

/// Product update request after request-local rules pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    /// Columns to change
    pub changes: ProductChanges,
    /// Category set to synchronize, when submitted
    pub category_ids: Option<Vec<i64>>,
    /// Replacement image
    pub image: Option<ImageUpload>,
}

/// Human-readable form of a field name.
fn attribute(field: &str) -> String {
    field.replace(['_', '.'], " ")
}

/// "The {field} field is required."
pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", attribute(field))
}

/// "The {field} has already been taken."
pub fn taken_message(field: &str) -> String {
    format!("The {} has already been taken.", attribute(field))
}

/// "The selected {field} is invalid."
pub fn invalid_selection_message(field: &str) -> String {
    format!("The selected {} is invalid.", attribute(field))
}

fn required_text(form: &FormInput, field: &str, errors: &mut ValidationError) -> Option<String> {
    match form.get(field) {
        Some(FieldValue::Text(text)) => Some(text.clone()),
        Some(FieldValue::List(_)) => {
            errors.add(field, format!("The {} must be a string.", attribute(field)));
            None
        }
        _ => {
            errors.add(field, required_message(field));
            None
        }
    }
}

fn check_max_length(value: &str, field: &str, errors: &mut ValidationError) {
    if value.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            field,
            format!(
                "The {} may not be greater than {} characters.",
                attribute(field),
                MAX_NAME_LENGTH
            ),
        );
    }
}

fn parse_price(form: &FormInput, field: &str, errors: &mut ValidationError) -> Option<f64> {
    match form.get(field) {
        Some(FieldValue::Text(text)) => match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                errors.add(field, format!("The {} must be a number.", attribute(field)));
                None
            }
        },
        Some(FieldValue::List(_)) => {
            errors.add(field, format!("The {} must be a number.", attribute(field)));
            None
        }
        _ => None,
    }
}

fn parse_integer(text: &str) -> Option<i32> {
    text.parse::<i32>().ok()
}

fn integer_field(form: &FormInput, field: &str, errors: &mut ValidationError) -> Option<i32> {
    let parsed = form.text(field).and_then(parse_integer);
    if parsed.is_none() && form.text(field).is_some() {
        errors.add(field, format!("The {} must be an integer.", attribute(field)));
    }
    parsed
}

fn category_ids(form: &FormInput, errors: &mut ValidationError) -> Option<Vec<i64>> {
    let raw: Vec<String> = match form.get(CATEGORY_IDS_FIELD)? {
        FieldValue::Null => return Some(Vec::new()),
        FieldValue::List(items) => items.clone(),
        // A lone multipart part named `category_id` carries a single id.
        FieldValue::Text(text) if text.parse::<i64>().is_ok() => vec![text.clone()],
        FieldValue::Text(_) => {
            errors.add(
                CATEGORY_IDS_FIELD,
                format!("The {} must be an array.", attribute(CATEGORY_IDS_FIELD)),
            );
            return None;
        }
    };

    let mut ids = Vec::with_capacity(raw.len());
    for (index, item) in raw.iter().enumerate() {
        match item.trim().parse::<i64>() {
            Ok(id) if id > 0 => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            _ => {
                let key = format!("{}.{}", CATEGORY_IDS_FIELD, index);
                errors.add(&key, format!("The {} must be an integer.", attribute(&key)));
            }
        }
    }
    Some(ids)
}

fn check_image(image: Option<&ImageUpload>, field: &str, errors: &mut ValidationError) {
    let Some(image) = image else {
        return;
    };
    if !image.is_image() {
        errors.add(field, format!("The {} must be an image.", field));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        errors.add(
            field,
            format!(
                "The {} may not be greater than {} kilobytes.",
                field,
                MAX_IMAGE_BYTES / 1024
            ),
        );
    }
}

/// Rules for `POST /categories`.
///
/// # Examples
///
/// ```
/// use storefront_core::{FormInput, validate_new_category};
///
/// let form = FormInput::new().with_text("name", "Electronics").with_text("CategoryChoix", "retail");
/// let category = validate_new_category(&form).unwrap();
/// assert_eq!(category.category_choix, "retail");
///
/// let err = validate_new_category(&FormInput::new()).unwrap_err();
/// assert!(err.errors().contains_key("name"));
/// assert!(err.errors().contains_key("CategoryChoix"));
/// ```
#[track_caller]
pub fn validate_new_category(form: &FormInput) -> Result<NewCategory, ValidationError> {
    let mut errors = ValidationError::new();
    let name = required_text(form, "name", &mut errors);
    if let Some(name) = &name {
        check_max_length(name, "name", &mut errors);
    }
    let choix = required_text(form, "CategoryChoix", &mut errors);
    errors.into_result()?;
    match (name, choix) {
        (Some(name), Some(category_choix)) => Ok(NewCategory {
            name,
            category_choix,
        }),
        _ => Err(ValidationError::field("name", required_message("name"))),
    }
}

/// Rules for `PUT /categories/{id}`: submitted fields must be non-empty.
#[track_caller]
pub fn validate_category_changes(form: &FormInput) -> Result<CategoryChanges, ValidationError> {
    let mut errors = ValidationError::new();
    let mut changes = CategoryChanges::default();
    if form.contains("name") {
        changes.name = required_text(form, "name", &mut errors);
        if let Some(name) = &changes.name {
            check_max_length(name, "name", &mut errors);
        }
    }
    if form.contains("CategoryChoix") {
        changes.category_choix = required_text(form, "CategoryChoix", &mut errors);
    }
    errors.into_result()?;
    Ok(changes)
}

fn product_fields(
    form: &FormInput,
    errors: &mut ValidationError,
) -> (Option<String>, Option<f64>, Option<i32>) {
    let name = required_text(form, "name", errors);
    let price = parse_price(form, "price", errors);
    let quantity = if form.text("quantity_available").is_some() {
        integer_field(form, "quantity_available", errors)
    } else {
        errors.add("quantity_available", required_message("quantity_available"));
        None
    };
    (name, price, quantity)
}

/// Rules for `POST /products`.
///
/// # Examples
///
/// ```
/// use storefront_core::{FormInput, validate_new_product};
///
/// let form = FormInput::new()
///     .with_text("name", "Widget")
///     .with_text("price", "9.99")
///     .with_text("quantity_available", "3")
///     .with_list("category_id", ["1", "1", "2"]);
/// let draft = validate_new_product(form).unwrap();
///
/// assert_eq!(draft.product.price, Some(9.99));
/// assert_eq!(draft.category_ids, Some(vec![1, 2]));
/// ```
#[track_caller]
pub fn validate_new_product(mut form: FormInput) -> Result<ProductDraft, ValidationError> {
    let mut errors = ValidationError::new();
    let (name, price, quantity) = product_fields(&form, &mut errors);
    let description = form.text("description").map(str::to_string);
    let ids = category_ids(&form, &mut errors);
    check_image(form.image(), IMAGE_FIELD, &mut errors);
    errors.into_result()?;

    match (name, quantity) {
        (Some(name), Some(quantity_available)) => Ok(ProductDraft {
            product: NewProduct {
                name,
                description,
                price,
                quantity_available,
                image1: None,
            },
            category_ids: ids,
            image: form.take_image(),
        }),
        _ => Err(ValidationError::field("name", required_message("name"))),
    }
}

/// Rules for `PUT /products/{id}`: only submitted attributes are checked and applied.
#[track_caller]
pub fn validate_product_update(mut form: FormInput) -> Result<ProductUpdate, ValidationError> {
    let mut errors = ValidationError::new();
    let mut changes = ProductChanges::default();

    if form.contains("name") {
        changes.name = required_text(&form, "name", &mut errors);
    }
    if form.contains("description") {
        changes.description = Some(form.text("description").map(str::to_string));
    }
    if form.contains("price") {
        changes.price = Some(parse_price(&form, "price", &mut errors));
    }
    if form.contains("quantity_available") {
        if form.text("quantity_available").is_some() {
            changes.quantity_available =
                integer_field(&form, "quantity_available", &mut errors);
        } else {
            errors.add("quantity_available", required_message("quantity_available"));
        }
    }
    let ids = category_ids(&form, &mut errors);
    check_image(form.image(), IMAGE_FIELD, &mut errors);
    errors.into_result()?;

    Ok(ProductUpdate {
        changes,
        category_ids: ids,
        image: form.take_image(),
    })
}

/// Rules for `POST /products/batch`: every input is checked before any is accepted.
///
/// Inputs arrive as JSON objects, so a batch never carries an image; category
/// links are not written for a batch. Errors are
/// keyed `inputs.{index}.{field}`.
#[track_caller]
pub fn validate_product_batch(inputs: Vec<FormInput>) -> Result<Vec<NewProduct>, ValidationError> {
    let mut errors = ValidationError::new();
    if inputs.is_empty() {
        errors.add("inputs", required_message("inputs"));
    }
    let mut products = Vec::with_capacity(inputs.len());
    for (index, form) in inputs.into_iter().enumerate() {
        match validate_new_product(form) {
            Ok(draft) => products.push(draft.product),
            Err(err) => {
                for (field, messages) in err.errors {
                    let key = format!("inputs.{}.{}", index, field);
                    for message in messages {
                        errors.add(&key, message);
                    }
                }
            }
        }
    }
    errors.into_result()?;
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_form() -> FormInput {
        FormInput::new()
            .with_text("name", "Widget")
            .with_text("quantity_available", "5")
    }

    #[test]
    fn blank_category_name_is_required() {
        let form = FormInput::new()
            .with_text("name", "   ")
            .with_text("CategoryChoix", "retail");
        let err = validate_new_category(&form).unwrap_err();
        assert_eq!(err.errors()["name"], vec!["The name field is required.".to_string()]);
    }

    #[test]
    fn long_category_name_is_rejected() {
        let form = FormInput::new()
            .with_text("name", "x".repeat(256))
            .with_text("CategoryChoix", "retail");
        assert!(validate_new_category(&form).is_err());
    }

    #[test]
    fn category_update_only_checks_submitted_fields() {
        let changes =
            validate_category_changes(&FormInput::new().with_text("CategoryChoix", "b2b")).unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.category_choix.as_deref(), Some("b2b"));

        let err = validate_category_changes(&FormInput::new().with_text("name", "")).unwrap_err();
        assert!(err.errors().contains_key("name"));
    }

    #[test]
    fn product_requires_name_and_integer_quantity() {
        let err = validate_new_product(FormInput::new().with_text("quantity_available", "2.5"))
            .unwrap_err();
        assert!(err.errors().contains_key("name"));
        assert_eq!(
            err.errors()["quantity_available"],
            vec!["The quantity available must be an integer.".to_string()]
        );
    }

    #[test]
    fn product_price_must_be_numeric_but_may_be_blank() {
        let err = validate_new_product(product_form().with_text("price", "cheap")).unwrap_err();
        assert!(err.errors().contains_key("price"));

        let draft = validate_new_product(product_form().with_text("price", "")).unwrap();
        assert_eq!(draft.product.price, None);
    }

    #[test]
    fn category_ids_must_be_integers() {
        let err = validate_new_product(product_form().with_list("category_id", ["1", "x"]))
            .unwrap_err();
        assert!(err.errors().contains_key("category_id.1"));

        let err = validate_new_product(product_form().with_text("category_id", "electronics"))
            .unwrap_err();
        assert!(err.errors().contains_key("category_id"));
    }

    #[test]
    fn null_category_ids_clear_the_set() {
        let mut form = product_form();
        form.push_part("category_id", "");
        let draft = validate_new_product(form).unwrap();
        assert_eq!(draft.category_ids, Some(vec![]));

        let draft = validate_new_product(product_form()).unwrap();
        assert_eq!(draft.category_ids, None);
    }

    #[test]
    fn oversized_or_non_image_upload_is_rejected() {
        let big = ImageUpload::new(
            Some("big.png".into()),
            Some("image/png".into()),
            vec![0; MAX_IMAGE_BYTES + 1],
        );
        let err = validate_new_product(product_form().with_image(big)).unwrap_err();
        assert_eq!(
            err.errors()["image1"],
            vec!["The image1 may not be greater than 2048 kilobytes.".to_string()]
        );

        let text = ImageUpload::new(Some("a.txt".into()), Some("text/plain".into()), vec![1]);
        let err = validate_new_product(product_form().with_image(text)).unwrap_err();
        assert_eq!(err.errors()["image1"], vec!["The image1 must be an image.".to_string()]);
    }

    #[test]
    fn update_applies_only_submitted_attributes() {
        let update = validate_product_update(
            FormInput::new()
                .with_text("price", "")
                .with_text("quantity_available", "7"),
        )
        .unwrap();
        assert_eq!(update.changes.name, None);
        assert_eq!(update.changes.price, Some(None));
        assert_eq!(update.changes.quantity_available, Some(7));
        assert_eq!(update.category_ids, None);
    }

    #[test]
    fn update_rejects_blank_name() {
        let err = validate_product_update(FormInput::new().with_text("name", " ")).unwrap_err();
        assert!(err.errors().contains_key("name"));
    }

    #[test]
    fn batch_reports_errors_per_input() {
        let err = validate_product_batch(vec![
            product_form(),
            FormInput::new().with_text("name", "No stock"),
        ])
        .unwrap_err();
        assert!(err.errors().contains_key("inputs.1.quantity_available"));
        assert!(!err.errors().keys().any(|k| k.starts_with("inputs.0")));
    }

    #[test]
    fn null_category_entry_is_reported_by_index() {
        let form = FormInput::from_json(serde_json::json!({
            "name": "Widget",
            "quantity_available": 1,
            "category_id": [1, null],
        }))
        .unwrap();
        let err = validate_new_product(form).unwrap_err();
        assert!(err.errors().contains_key("category_id.1"));
        assert!(!err.errors().contains_key("category_id.0"));
    }

    #[test]
    fn batch_ignores_category_links() {
        let products = validate_product_batch(vec![
            product_form().with_list("category_id", ["7"]),
        ])
        .unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(validate_product_batch(vec![]).is_err());
    }
}
