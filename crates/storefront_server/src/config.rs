//! Configuration for the Storefront API server.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storefront_core::{PageLimits, Policies};
use storefront_error::{ConfigError, ConfigErrorKind, StorefrontResult};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../storefront.toml");

/// Prefix for environment overrides, e.g. `STOREFRONT__SERVER__BIND`.
pub const ENV_PREFIX: &str = "STOREFRONT";

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ServerSettings {
    /// Socket address to bind
    bind: String,
    /// Largest accepted request body in bytes
    body_limit_bytes: usize,
    /// Allowed CORS origins; `*` allows any
    #[serde(default)]
    cors_origins: Vec<String>,
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct DatabaseSettings {
    /// Connection string; `DATABASE_URL` is used when unset
    #[serde(default)]
    url: Option<String>,
    /// Maximum pooled connections
    pool_size: u32,
}

/// Image storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StorageSettings {
    /// Root directory; product images live in a namespace below it
    root: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    level: String,
    /// Emit JSON lines instead of text
    #[serde(default)]
    json: bool,
}

/// Complete server configuration.
///
/// # Example
///
/// ```
/// use storefront_server::StorefrontConfig;
///
/// let config = StorefrontConfig::bundled().unwrap();
/// assert_eq!(config.server().bind(), "127.0.0.1:8000");
/// assert_eq!(*config.page_limits().default_per_page(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StorefrontConfig {
    /// HTTP listener
    server: ServerSettings,
    /// Database connection
    database: DatabaseSettings,
    /// Image storage
    storage: StorageSettings,
    /// List endpoint page sizes
    pagination: PageLimits,
    /// Delete and image cleanup behavior
    #[serde(default)]
    policies: Policies,
    /// Log output
    logging: LoggingSettings,
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> StorefrontResult<StorefrontConfig> {
    let config: StorefrontConfig = builder
        .build()
        .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
        .try_deserialize()
        .map_err(|e| ConfigError::new(ConfigErrorKind::Invalid(e.to_string())))?;
    Ok(config)
}

impl StorefrontConfig {
    /// Only the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    pub fn bundled() -> StorefrontResult<Self> {
        build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file path layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StorefrontResult<Self> {
        debug!("Loading configuration from file");
        build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence (later sources override earlier):
    ///
    /// 1. Bundled defaults (storefront.toml shipped with the crate)
    /// 2. `./storefront.toml` in the current directory (optional)
    /// 3. `path`, when given (required)
    /// 4. `STOREFRONT__*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required source is missing or any value fails to parse.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> StorefrontResult<Self> {
        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::with_name("storefront").required(false));

        if let Some(path) = path {
            debug!(path = %path.display(), "Adding configuration file");
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        build(builder)
    }

    /// Page size limits with the default clamped into range.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(
            *self.pagination.default_per_page(),
            *self.pagination.max_per_page(),
        )
    }

    /// Replace the bind address.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.server.bind = bind.into();
        self
    }

    /// Replace the storage root.
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage.root = root.into();
        self
    }
}
