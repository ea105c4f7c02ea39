//! Core catalog types for the Storefront back-office.
//!
//! This crate holds everything that can be decided without touching a store:
//! records and write payloads, list query coercion, the page object, the
//! response envelope, transport-neutral form fields, request validation, and
//! image upload rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod envelope;
mod form;
mod image;
mod pagination;
mod policy;
mod product;
mod validation;

pub use category::{Category, CategoryChanges, NewCategory};
pub use envelope::Envelope;
pub use form::{FieldValue, FormInput};
pub use image::{
    IMAGE_FIELD, ImageUpload, MAX_IMAGE_BYTES, content_type_for_filename, is_safe_filename,
    mime_for_extension,
};
pub use pagination::{DEFAULT_PER_PAGE, ListQuery, MAX_PER_PAGE, Page, PageLimits, RawListQuery};
pub use policy::{CategoryDeletePolicy, ImageCleanupPolicy, Policies};
pub use product::{NewProduct, Product, ProductChanges, ProductWithCategories};
pub use validation::{
    CATEGORY_IDS_FIELD, MAX_NAME_LENGTH, ProductDraft, ProductUpdate, invalid_selection_message,
    required_message, taken_message, validate_category_changes, validate_new_category,
    validate_new_product, validate_product_batch, validate_product_update,
};
