//! HTTP client error types.

/// HTTP client error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum HttpErrorKind {
    /// Request could not be sent or the connection dropped
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// Server refused access (HTTP 403)
    #[display("Access forbidden")]
    Forbidden,
    /// Server rejected the submitted fields (HTTP 422)
    #[display("Validation failed: {}", _0)]
    Validation(String),
    /// Server answered with a failure status
    #[display("Server returned {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Message from the response envelope, if any
        message: String,
    },
    /// Response body did not match the expected envelope
    #[display("Unexpected response body: {}", _0)]
    Decode(String),
}

/// HTTP error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", kind, line, file)]
pub struct HttpError {
    /// The kind of error that occurred
    pub kind: HttpErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a transport-level HttpError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storefront_error::{HttpError, HttpErrorKind};
    ///
    /// let err = HttpError::new("Connection refused");
    /// assert!(matches!(err.kind, HttpErrorKind::Transport(_)));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(HttpErrorKind::Transport(message.into()))
    }

    /// Create an HttpError of a specific kind at the current location.
    #[track_caller]
    pub fn with_kind(kind: HttpErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the server denied access.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.kind, HttpErrorKind::Forbidden)
    }
}
