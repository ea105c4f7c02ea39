//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storefront binary.

mod admin;
mod commands;
mod serve;

pub use admin::launch_admin;
pub use commands::{Cli, Commands};
pub use serve::handle_serve;
