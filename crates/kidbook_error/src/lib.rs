//! Error types for the Kidbook storybook generator.
//!
//! Every error family records the file and line where it was created. The
//! families map onto three handling rules:
//!
//! - [`ValidationError`]: malformed input; aborts the run, never retried.
//! - [`ModelError`], [`HttpError`]: failures of mandatory collaborators;
//!   propagated unchanged.
//! - Best-effort collaborators (identity extraction) swallow their errors and
//!   log them instead of returning them.

mod config;
mod http;
mod model;
mod serialization;
mod validation;

pub use config::ConfigError;
pub use http::HttpError;
pub use model::{ModelError, ModelErrorKind};
pub use serialization::{Format, IoError, SerializationError};
pub use validation::{ValidationError, ValidationErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum KidbookErrorKind {
    /// Input validation failure
    Validation(ValidationError),
    /// Collaborator (LLM or image model) failure
    Model(ModelError),
    /// HTTP transport error
    Http(HttpError),
    /// JSON or YAML error
    Serialization(SerializationError),
    /// Configuration error
    Config(ConfigError),
    /// File system error
    Io(IoError),
}

impl std::fmt::Display for KidbookErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KidbookErrorKind::Validation(e) => write!(f, "{}", e),
            KidbookErrorKind::Model(e) => write!(f, "{}", e),
            KidbookErrorKind::Http(e) => write!(f, "{}", e),
            KidbookErrorKind::Serialization(e) => write!(f, "{}", e),
            KidbookErrorKind::Config(e) => write!(f, "{}", e),
            KidbookErrorKind::Io(e) => write!(f, "{}", e),
        }
    }
}

/// Kidbook error with kind discrimination.
#[derive(Debug)]
pub struct KidbookError(Box<KidbookErrorKind>);

impl KidbookError {
    /// Create a new error from a kind.
    pub fn new(kind: KidbookErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &KidbookErrorKind {
        &self.0
    }

    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationErrorKind> {
        match self.kind() {
            KidbookErrorKind::Validation(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Returns the model failure, if this is one.
    pub fn as_model(&self) -> Option<&ModelErrorKind> {
        match self.kind() {
            KidbookErrorKind::Model(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl std::fmt::Display for KidbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Kidbook Error: {}", self.0)
    }
}

impl std::error::Error for KidbookError {}

// Generic From implementation for any type that converts to KidbookErrorKind
impl<T> From<T> for KidbookError
where
    T: Into<KidbookErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Kidbook operations.
pub type KidbookResult<T> = std::result::Result<T, KidbookError>;
