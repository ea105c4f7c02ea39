//! Errors from the terminal admin client.

/// What went wrong while driving the admin terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TuiErrorKind {
    /// Raw mode or the alternate screen could not be entered
    #[display("Failed to set up terminal: {}", _0)]
    TerminalSetup(String),
    /// The shell's terminal could not be handed back on exit
    #[display("Failed to restore terminal: {}", _0)]
    TerminalRestore(String),
    /// Keyboard input could not be polled or read
    #[display("Failed to read input: {}", _0)]
    Input(String),
    /// A frame of the catalog screens could not be drawn
    #[display("Failed to render: {}", _0)]
    Rendering(String),
    /// A product image picked in the form could not be read from disk
    #[display("Failed to read upload: {}", _0)]
    Upload(String),
}

impl TuiErrorKind {
    /// Whether the failure came from the local image file rather than the terminal.
    pub fn is_upload(&self) -> bool {
        matches!(self, TuiErrorKind::Upload(_))
    }
}

/// Admin client error tagged with the location that raised it.
///
/// # Examples
///
/// ```
/// use storefront_error::{TuiError, TuiErrorKind};
///
/// let err = TuiError::new(TuiErrorKind::Upload("photo.png: not found".to_string()));
/// assert!(err.kind.is_upload());
/// assert!(err.to_string().contains("photo.png"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Admin UI Error: {} at line {} in {}", kind, line, file)]
pub struct TuiError {
    /// What failed
    pub kind: TuiErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl TuiError {
    /// Capture the caller's location alongside `kind`.
    #[track_caller]
    pub fn new(kind: TuiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for admin client operations.
pub type TuiResult<T> = Result<T, TuiError>;
