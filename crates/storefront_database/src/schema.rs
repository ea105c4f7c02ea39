//! Diesel table definitions.
//!
//! The schema itself is managed outside this workspace; these definitions
//! must match the deployed tables.

diesel::table! {
    categories (id) {
        id -> Int8,
        name -> Text,
        category_choix -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    category_product (category_id, product_id) {
        category_id -> Int8,
        product_id -> Int8,
    }
}

diesel::table! {
    products (id) {
        id -> Int8,
        name -> Text,
        description -> Nullable<Text>,
        price -> Nullable<Float8>,
        quantity_available -> Int4,
        image1 -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(category_product -> categories (category_id));
diesel::joinable!(category_product -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(categories, category_product, products,);
