//! Terminal admin UI for the Storefront back-office.
//!
//! Lists categories and products with search, paging, create/edit forms and
//! confirmed deletes, talking to the HTTP API through an [`AdminBackend`].
//! State lives in [`App`] and is updated by pure key handling plus the
//! async functions in [`controller`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod backend;
pub mod controller;
mod debounce;
mod events;
mod form;
mod http;
mod list;
mod runner;
mod ui;

pub use app::{Action, Alert, App, AppMode, DEFAULT_ALERT_DURATION, Resource};
pub use backend::AdminBackend;
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use events::{Event, EventHandler};
pub use form::{FormField, FormState, Submission};
pub use http::HttpBackend;
pub use list::{ListState, LoadKey, PAGE_SIZES, Record};
pub use runner::{AdminOptions, run_admin};
pub use storefront_error::{TuiError, TuiErrorKind, TuiResult};
