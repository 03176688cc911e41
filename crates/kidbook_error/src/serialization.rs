//! Serialization error types for the JSON and YAML boundaries.

/// Which serialization format failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Format {
    /// JSON payloads
    #[display("JSON")]
    Json,
    /// YAML payloads
    #[display("YAML")]
    Yaml,
}

/// Serialization/deserialization error with source location.
///
/// # Examples
///
/// ```
/// use kidbook_error::{Format, SerializationError};
///
/// let err = SerializationError::new(Format::Yaml, "unexpected end of stream");
/// assert!(format!("{}", err).contains("YAML Error"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("{} Error: {} at line {} in {}", format, message, line, file)]
pub struct SerializationError {
    /// Format that failed
    pub format: Format,
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl SerializationError {
    /// Create a new SerializationError at the current location.
    #[track_caller]
    pub fn new(format: Format, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            format,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a JSON failure.
    #[track_caller]
    pub fn json(message: impl Into<String>) -> Self {
        Self::new(Format::Json, message)
    }

    /// Shorthand for a YAML failure.
    #[track_caller]
    pub fn yaml(message: impl Into<String>) -> Self {
        Self::new(Format::Yaml, message)
    }
}

/// File system error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("I/O Error: {} at line {} in {}", message, line, file)]
pub struct IoError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl IoError {
    /// Create a new IoError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
