//! Synchronous catalog queries.
//!
//! Every function takes a borrowed connection so callers can compose them
//! inside a transaction. [`PostgresCatalog`](crate::PostgresCatalog) runs them
//! on the blocking pool.

use crate::DatabaseResult;
use crate::models::{
    CategoryChangeset, CategoryProductRow, CategoryRow, NewCategoryRow, NewProductRow,
    ProductChangeset, ProductRow,
};
use crate::schema::{categories, category_product, products};
use chrono::Utc;
use diesel::dsl::{count_star, sql};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use std::collections::HashMap;
use storefront_core::{
    Category, CategoryChanges, ListQuery, NewCategory, NewProduct, Page, Product,
    ProductChanges, ProductWithCategories,
};
use storefront_error::DatabaseError;

fn filtered_categories(pattern: Option<String>) -> categories::BoxedQuery<'static, Pg> {
    let mut query = categories::table.into_boxed();
    if let Some(pattern) = pattern {
        query = query.filter(
            categories::name
                .ilike(pattern.clone())
                .or(categories::category_choix.ilike(pattern)),
        );
    }
    query
}

fn filtered_products(pattern: Option<String>) -> products::BoxedQuery<'static, Pg> {
    let mut query = products::table.into_boxed();
    if let Some(pattern) = pattern {
        query = query.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::description.ilike(pattern.clone()))
                .or(sql::<Bool>("CAST(products.price AS TEXT) ILIKE ").bind::<Text, _>(pattern)),
        );
    }
    query
}

fn to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Filtered, newest-first page of categories.
#[tracing::instrument(skip(conn))]
pub fn list_categories(conn: &mut PgConnection, query: &ListQuery) -> DatabaseResult<Page<Category>> {
    let total: i64 = filtered_categories(query.like_pattern())
        .select(count_star())
        .get_result(conn)?;
    let rows: Vec<CategoryRow> = filtered_categories(query.like_pattern())
        .order((categories::created_at.desc(), categories::id.desc()))
        .limit(i64::from(*query.per_page()))
        .offset(to_i64(query.offset()))
        .select(CategoryRow::as_select())
        .load(conn)?;
    tracing::debug!(total, returned = rows.len(), "Listed categories");
    Ok(Page::new(
        rows.into_iter().map(Category::from).collect(),
        to_u64(total),
        query,
    ))
}

/// Every category, newest first.
pub fn all_categories(conn: &mut PgConnection) -> DatabaseResult<Vec<Category>> {
    let rows: Vec<CategoryRow> = categories::table
        .order((categories::created_at.desc(), categories::id.desc()))
        .select(CategoryRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Category::from).collect())
}

/// Single category by id.
pub fn find_category(conn: &mut PgConnection, id: i64) -> DatabaseResult<Option<Category>> {
    let row = categories::table
        .find(id)
        .select(CategoryRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Category::from))
}

/// Whether a category other than `except` is named `name`.
pub fn category_name_taken(
    conn: &mut PgConnection,
    name: &str,
    except: Option<i64>,
) -> DatabaseResult<bool> {
    let mut query = categories::table
        .filter(categories::name.eq(name.to_string()))
        .into_boxed();
    if let Some(except) = except {
        query = query.filter(categories::id.ne(except));
    }
    let count: i64 = query.select(count_star()).get_result(conn)?;
    Ok(count > 0)
}

/// The subset of `ids` present in the categories table.
pub fn existing_category_ids(conn: &mut PgConnection, ids: &[i64]) -> DatabaseResult<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(categories::table
        .filter(categories::id.eq_any(ids))
        .select(categories::id)
        .load(conn)?)
}

/// Insert a category.
#[tracing::instrument(skip(conn, category), fields(name = %category.name))]
pub fn create_category(conn: &mut PgConnection, category: &NewCategory) -> DatabaseResult<Category> {
    let row: CategoryRow = diesel::insert_into(categories::table)
        .values(&NewCategoryRow::stamped(category, Utc::now()))
        .returning(CategoryRow::as_returning())
        .get_result(conn)?;
    tracing::info!(id = row.id, "Created category");
    Ok(row.into())
}

/// Apply changes to a category.
#[tracing::instrument(skip(conn, changes))]
pub fn update_category(
    conn: &mut PgConnection,
    id: i64,
    changes: &CategoryChanges,
) -> DatabaseResult<Option<Category>> {
    let row = diesel::update(categories::table.find(id))
        .set(&CategoryChangeset::stamped(changes, Utc::now()))
        .returning(CategoryRow::as_returning())
        .get_result(conn)
        .optional()?;
    if row.is_some() {
        tracing::info!(id, "Updated category");
    }
    Ok(row.map(Category::from))
}

/// Number of products linked to a category.
pub fn count_category_products(conn: &mut PgConnection, id: i64) -> DatabaseResult<u64> {
    let count: i64 = category_product::table
        .filter(category_product::category_id.eq(id))
        .select(count_star())
        .get_result(conn)?;
    Ok(to_u64(count))
}

/// Remove a category's links and the category itself.
#[tracing::instrument(skip(conn))]
pub fn delete_category(conn: &mut PgConnection, id: i64) -> DatabaseResult<Option<Category>> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        diesel::delete(category_product::table.filter(category_product::category_id.eq(id)))
            .execute(conn)?;
        let row = diesel::delete(categories::table.find(id))
            .returning(CategoryRow::as_returning())
            .get_result(conn)
            .optional()?;
        if row.is_some() {
            tracing::info!(id, "Deleted category");
        }
        Ok(row.map(Category::from))
    })
}

/// Filtered, newest-first page of products.
#[tracing::instrument(skip(conn))]
pub fn list_products(conn: &mut PgConnection, query: &ListQuery) -> DatabaseResult<Page<Product>> {
    let total: i64 = filtered_products(query.like_pattern())
        .select(count_star())
        .get_result(conn)?;
    let rows: Vec<ProductRow> = filtered_products(query.like_pattern())
        .order((products::created_at.desc(), products::id.desc()))
        .limit(i64::from(*query.per_page()))
        .offset(to_i64(query.offset()))
        .select(ProductRow::as_select())
        .load(conn)?;
    tracing::debug!(total, returned = rows.len(), "Listed products");
    Ok(Page::new(
        rows.into_iter().map(Product::from).collect(),
        to_u64(total),
        query,
    ))
}

/// Categories for each of `product_ids`, ordered by category id.
fn categories_by_product(
    conn: &mut PgConnection,
    product_ids: &[i64],
) -> DatabaseResult<HashMap<i64, Vec<Category>>> {
    let links: Vec<(i64, CategoryRow)> = category_product::table
        .inner_join(categories::table)
        .filter(category_product::product_id.eq_any(product_ids))
        .order(categories::id.asc())
        .select((category_product::product_id, CategoryRow::as_select()))
        .load(conn)?;
    Ok(links
        .into_iter()
        .fold(HashMap::new(), |mut acc, (product_id, row)| {
            acc.entry(product_id)
                .or_insert_with(Vec::new)
                .push(Category::from(row));
            acc
        }))
}

/// Every product with categories eager-loaded.
pub fn products_with_categories(
    conn: &mut PgConnection,
) -> DatabaseResult<Vec<ProductWithCategories>> {
    let rows: Vec<ProductRow> = products::table
        .order((products::created_at.desc(), products::id.desc()))
        .select(ProductRow::as_select())
        .load(conn)?;
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut by_product = categories_by_product(conn, &ids)?;
    Ok(rows
        .into_iter()
        .map(|row| ProductWithCategories {
            categories: by_product.remove(&row.id).unwrap_or_default(),
            product: row.into(),
        })
        .collect())
}

/// Single product by id.
pub fn find_product(conn: &mut PgConnection, id: i64) -> DatabaseResult<Option<Product>> {
    let row = products::table
        .find(id)
        .select(ProductRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Product::from))
}

/// Categories linked to one product.
pub fn product_categories(conn: &mut PgConnection, id: i64) -> DatabaseResult<Vec<Category>> {
    Ok(categories_by_product(conn, &[id])?
        .remove(&id)
        .unwrap_or_default())
}

/// Replace a product's links with exactly `category_ids`.
pub fn sync_product_categories(
    conn: &mut PgConnection,
    product_id: i64,
    category_ids: &[i64],
) -> DatabaseResult<()> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        diesel::delete(category_product::table.filter(category_product::product_id.eq(product_id)))
            .execute(conn)?;
        let mut seen = Vec::with_capacity(category_ids.len());
        for id in category_ids {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        let links: Vec<CategoryProductRow> = seen
            .into_iter()
            .map(|category_id| CategoryProductRow {
                category_id,
                product_id,
            })
            .collect();
        if !links.is_empty() {
            diesel::insert_into(category_product::table)
                .values(&links)
                .execute(conn)?;
        }
        tracing::debug!(product_id, count = links.len(), "Synchronized product categories");
        Ok(())
    })
}

/// Insert a product and optionally link categories, atomically.
#[tracing::instrument(skip(conn, product), fields(name = %product.name))]
pub fn create_product(
    conn: &mut PgConnection,
    product: &NewProduct,
    category_ids: Option<&[i64]>,
) -> DatabaseResult<Product> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        let row: ProductRow = diesel::insert_into(products::table)
            .values(&NewProductRow::stamped(product, Utc::now()))
            .returning(ProductRow::as_returning())
            .get_result(conn)?;
        if let Some(ids) = category_ids {
            sync_product_categories(conn, row.id, ids)?;
        }
        tracing::info!(id = row.id, "Created product");
        Ok(row.into())
    })
}

/// Insert every product or none.
#[tracing::instrument(skip(conn, batch), fields(count = batch.len()))]
pub fn create_products(conn: &mut PgConnection, batch: &[NewProduct]) -> DatabaseResult<Vec<Product>> {
    let now = Utc::now();
    let rows: Vec<NewProductRow> = batch.iter().map(|p| NewProductRow::stamped(p, now)).collect();
    conn.transaction::<_, DatabaseError, _>(|conn| {
        let created: Vec<ProductRow> = diesel::insert_into(products::table)
            .values(&rows)
            .returning(ProductRow::as_returning())
            .get_results(conn)?;
        tracing::info!(count = created.len(), "Created products");
        Ok(created.into_iter().map(Product::from).collect())
    })
}

/// Apply changes and optionally replace links, atomically.
#[tracing::instrument(skip(conn, changes))]
pub fn update_product(
    conn: &mut PgConnection,
    id: i64,
    changes: &ProductChanges,
    category_ids: Option<&[i64]>,
) -> DatabaseResult<Option<Product>> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        let row = diesel::update(products::table.find(id))
            .set(&ProductChangeset::stamped(changes, Utc::now()))
            .returning(ProductRow::as_returning())
            .get_result(conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };
        if let Some(ids) = category_ids {
            sync_product_categories(conn, id, ids)?;
        }
        tracing::info!(id, "Updated product");
        Ok(Some(row.into()))
    })
}

/// Remove a product and its links.
#[tracing::instrument(skip(conn))]
pub fn delete_product(conn: &mut PgConnection, id: i64) -> DatabaseResult<Option<Product>> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        diesel::delete(category_product::table.filter(category_product::product_id.eq(id)))
            .execute(conn)?;
        let row = diesel::delete(products::table.find(id))
            .returning(ProductRow::as_returning())
            .get_result(conn)
            .optional()?;
        if row.is_some() {
            tracing::info!(id, "Deleted product");
        }
        Ok(row.map(Product::from))
    })
}

/// Round-trip a trivial statement.
pub fn ping(conn: &mut PgConnection) -> DatabaseResult<()> {
    diesel::sql_query("SELECT 1").execute(conn)?;
    Ok(())
}
