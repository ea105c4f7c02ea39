//! Backend calls driven by application state.
//!
//! Each function applies the outcome of one backend call to [`App`]: a
//! denial switches to the Forbidden view, field errors land in the open
//! form, and anything else raises an alert while keeping prior rows.

use crate::{Action, AdminBackend, App, FormState, ListState, Resource};
use std::time::Instant;
use storefront_core::Page;
use storefront_error::{StorefrontError, StorefrontErrorKind, StorefrontResult};
use tracing::{debug, instrument, warn};

/// Whether the server denied access.
pub fn is_forbidden(err: &StorefrontError) -> bool {
    matches!(err.kind(), StorefrontErrorKind::Http(http) if http.is_forbidden())
}

/// Short text for an alert, without source locations.
pub fn user_message(err: &StorefrontError) -> String {
    match err.kind() {
        StorefrontErrorKind::Http(http) => http.kind.to_string(),
        StorefrontErrorKind::Validation(validation) => validation
            .first_message()
            .unwrap_or("The given data was invalid.")
            .to_string(),
        StorefrontErrorKind::Tui(tui) => tui.kind.to_string(),
        other => other.to_string(),
    }
}

fn report(app: &mut App, context: &str, err: &StorefrontError, now: Instant) {
    if is_forbidden(err) {
        warn!(context, "Access forbidden");
        app.forbid();
    } else {
        warn!(context, error = %err, "Backend call failed");
        app.raise_alert(format!("{}: {}", context, user_message(err)), now);
    }
}

fn settle<T>(list: &mut ListState<T>, result: StorefrontResult<Page<T>>) -> Option<StorefrontError> {
    match result {
        Ok(page) => {
            list.finish_load(page);
            None
        }
        Err(e) => {
            list.fail_load();
            Some(e)
        }
    }
}

/// Load the active list if its inputs changed since the last load.
#[instrument(skip_all, fields(resource = %app.resource))]
pub async fn refresh(app: &mut App, backend: &dyn AdminBackend, now: Instant) {
    if app.mode == crate::AppMode::Forbidden {
        return;
    }
    let failure = match app.resource {
        Resource::Categories => match app.categories.pending_load() {
            Some(key) => {
                app.categories.begin_load(key.clone());
                debug!(?key, "Loading categories");
                let result = backend.list_categories(&key.query()).await;
                settle(&mut app.categories, result)
            }
            None => return,
        },
        Resource::Products => match app.products.pending_load() {
            Some(key) => {
                app.products.begin_load(key.clone());
                debug!(?key, "Loading products");
                let result = backend.list_products(&key.query()).await;
                settle(&mut app.products, result)
            }
            None => return,
        },
    };
    if let Some(err) = failure {
        let context = format!("Failed to load {}", app.resource.to_string().to_lowercase());
        report(app, &context, &err, now);
    }
}

/// Open the create form for the active resource.
pub fn open_create(app: &mut App) {
    let form = match app.resource {
        Resource::Categories => FormState::category(None),
        Resource::Products => FormState::product(None),
    };
    app.open_form(form);
}

/// Open the edit form, fetching the record so the form starts from its current state.
#[instrument(skip(app, backend, now))]
pub async fn open_edit(app: &mut App, backend: &dyn AdminBackend, id: i64, now: Instant) {
    let result = match app.resource {
        Resource::Categories => backend
            .category(id)
            .await
            .map(|category| FormState::category(Some(&category))),
        Resource::Products => backend
            .product(id)
            .await
            .map(|product| FormState::product(Some(&product))),
    };
    match result {
        Ok(form) => app.open_form(form),
        Err(e) => {
            let context = format!("Failed to open {}", app.resource.singular().to_lowercase());
            report(app, &context, &e, now);
        }
    }
}

/// Check and send the open form; close it and reload on success.
#[instrument(skip_all)]
pub async fn submit_form(app: &mut App, backend: &dyn AdminBackend, now: Instant) {
    let Some(form) = app.form.as_mut() else {
        return;
    };
    if !form.check_required() {
        app.status_message = "Fill in the required fields".to_string();
        return;
    }

    let submission = form.submission();
    let verb = if submission.id.is_some() { "updated" } else { "created" };
    match backend.save(&submission).await {
        Ok(()) => {
            app.close_form();
            match submission.resource {
                Resource::Categories => app.categories.request_reload(),
                Resource::Products => app.products.request_reload(),
            }
            app.status_message = format!("{} {} successfully", submission.resource.singular(), verb);
        }
        Err(e) => match e.kind() {
            StorefrontErrorKind::Validation(validation) => {
                if let Some(form) = app.form.as_mut() {
                    form.errors = validation.errors().clone();
                }
                app.status_message = "Fix the highlighted fields".to_string();
            }
            _ => {
                let context = format!("Failed to save {}", submission.resource.singular().to_lowercase());
                report(app, &context, &e, now);
            }
        },
    }
}

/// Delete a confirmed row and drop it locally without reloading.
#[instrument(skip(app, backend, now))]
pub async fn delete_confirmed(app: &mut App, backend: &dyn AdminBackend, id: i64, now: Instant) {
    let resource = app.resource;
    match backend.delete(resource, id).await {
        Ok(()) => {
            match resource {
                Resource::Categories => app.categories.remove_row(id),
                Resource::Products => app.products.remove_row(id),
            }
            app.status_message = format!("{} deleted successfully", resource.singular());
        }
        Err(e) => {
            let context = format!("Failed to delete {}", resource.singular().to_lowercase());
            report(app, &context, &e, now);
        }
    }
}

/// Run the backend work a key press asked for.
pub async fn perform(app: &mut App, backend: &dyn AdminBackend, action: Action, now: Instant) {
    match action {
        Action::OpenCreate => open_create(app),
        Action::OpenEdit(id) => open_edit(app, backend, id, now).await,
        Action::Submit => submit_form(app, backend, now).await,
        Action::Delete(id) => delete_confirmed(app, backend, id, now).await,
    }
}
