//! Errors raised while layering storefront settings.

/// Which stage of configuration loading failed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A source (bundled defaults, `storefront.toml`, an explicit file, env) could not be read or merged
    #[display("Failed to load settings: {}", _0)]
    Load(String),
    /// The merged settings do not match the expected sections
    #[display("Invalid settings: {}", _0)]
    Invalid(String),
}

/// Settings error with the location that raised it.
///
/// # Examples
///
/// ```
/// use storefront_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Invalid(
///     "pagination.max_per_page: invalid type".to_string(),
/// ));
/// assert!(err.to_string().contains("max_per_page"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Config Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// What failed
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Capture the caller's location alongside `kind`.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
