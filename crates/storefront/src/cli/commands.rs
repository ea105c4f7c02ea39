//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storefront - catalog API server and terminal admin UI
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "E-commerce back-office: catalog API server and terminal admin UI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,

        /// Use an in-memory catalog instead of PostgreSQL
        #[arg(long)]
        memory: bool,

        /// Export tracing spans to stdout (requires the observability feature)
        #[arg(long)]
        trace_spans: bool,
    },

    /// Launch the terminal admin UI against a running API
    Admin {
        /// Base URL of the API
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        api_url: String,

        /// Milliseconds of quiet before search input is applied
        #[arg(long, default_value_t = 500)]
        debounce_ms: u64,

        /// Write logs to this file; the terminal is reserved for the UI
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from(["storefront", "serve", "--memory", "--bind", "0.0.0.0:9000"])
            .unwrap();
        match cli.command {
            Commands::Serve { bind, memory, .. } => {
                assert!(memory);
                assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn admin_defaults() {
        let cli = Cli::try_parse_from(["storefront", "admin"]).unwrap();
        match cli.command {
            Commands::Admin {
                api_url,
                debounce_ms,
                log_file,
            } => {
                assert_eq!(api_url, "http://127.0.0.1:8000");
                assert_eq!(debounce_ms, 500);
                assert!(log_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
