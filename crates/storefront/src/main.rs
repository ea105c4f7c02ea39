//! Storefront CLI binary.
//!
//! This binary provides command-line access to the storefront back-office:
//! - Serve the catalog HTTP API
//! - Launch the terminal admin UI against a running API

use clap::Parser;
use storefront::{ObservabilityConfig, init_observability_with_config};
use storefront_server::StorefrontConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_serve, launch_admin};

    // Pick up DATABASE_URL and STOREFRONT__* from .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = StorefrontConfig::load(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging().level().clone()
    };

    match cli.command {
        Commands::Serve {
            bind,
            memory,
            trace_spans,
        } => {
            let observability = ObservabilityConfig::new(env!("CARGO_PKG_NAME"))
                .with_log_level(log_level)
                .with_json_logs(*config.logging().json())
                .with_span_export(trace_spans);
            init_observability_with_config(observability)?;

            let config = match bind {
                Some(bind) => config.with_bind(bind),
                None => config,
            };
            handle_serve(config, memory).await?;
        }

        Commands::Admin {
            api_url,
            debounce_ms,
            log_file,
        } => {
            // Stdout belongs to the terminal UI
            if log_file.is_some() {
                let observability = ObservabilityConfig::new(env!("CARGO_PKG_NAME"))
                    .with_log_level(log_level)
                    .with_log_file(log_file);
                init_observability_with_config(observability)?;
            }
            launch_admin(&api_url, debounce_ms).await?;
        }
    }

    Ok(())
}
