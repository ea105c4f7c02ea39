//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use storefront_error::{DatabaseError, DatabaseErrorKind};

/// Pooled PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Resolve the connection string, falling back to `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error when neither `url` nor `DATABASE_URL` is set.
pub fn database_url(url: Option<&str>) -> DatabaseResult<String> {
    match url.filter(|u| !u.trim().is_empty()) {
        Some(url) => Ok(url.to_string()),
        None => std::env::var("DATABASE_URL").map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Connection(
                "DATABASE_URL environment variable not set".to_string(),
            ))
        }),
    }
}

/// Establish a single connection to the PostgreSQL database.
///
/// # Errors
///
/// Returns an error if:
/// - no URL is given and `DATABASE_URL` is not set
/// - Connection to the database fails
pub fn establish_connection(url: Option<&str>) -> DatabaseResult<PgConnection> {
    let database_url = database_url(url)?;
    PgConnection::establish(&database_url)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Build a connection pool of at most `max_size` connections.
///
/// # Errors
///
/// Returns an error when the URL is missing or the first connection cannot be opened.
#[tracing::instrument(skip(url))]
pub fn create_pool(url: Option<&str>, max_size: u32) -> DatabaseResult<PgPool> {
    let database_url = database_url(url)?;
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
    tracing::info!(max_size, "Created database connection pool");
    Ok(pool)
}
