//! `admin` command handler.

use storefront_error::StorefrontResult;

/// Launch the terminal admin UI bound to the API at `api_url`.
#[cfg(feature = "tui")]
pub async fn launch_admin(api_url: &str, debounce_ms: u64) -> StorefrontResult<()> {
    use std::time::Duration;
    use storefront_tui::{AdminOptions, HttpBackend, run_admin};

    tracing::info!(api_url, debounce_ms, "Launching admin UI");
    let backend = HttpBackend::new(api_url)?;
    let options = AdminOptions {
        debounce: Duration::from_millis(debounce_ms),
        ..AdminOptions::default()
    };
    run_admin(&backend, options).await?;
    Ok(())
}

/// Launch the terminal admin UI bound to the API at `api_url`.
#[cfg(not(feature = "tui"))]
pub async fn launch_admin(_api_url: &str, _debounce_ms: u64) -> StorefrontResult<()> {
    use storefront_error::{ServerError, ServerErrorKind};

    Err(ServerError::new(ServerErrorKind::Configuration(
        "built without the tui feature".to_string(),
    ))
    .into())
}
