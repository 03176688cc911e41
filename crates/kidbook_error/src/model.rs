//! Model collaborator error types.

/// Failures raised by chat completion and image generation collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelErrorKind {
    /// Credentials were not configured
    #[display("Missing credentials: {}", _0)]
    MissingCredentials(String),
    /// Provider answered with a non-success status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body returned by the provider
        message: String,
    },
    /// Response had no extractable text
    #[display("LLM response did not contain any text content")]
    EmptyResponse,
    /// Response could not be decoded
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),
    /// Image model has no configured input payload
    #[display("Model identifier '{}' is not configured with a default input payload. Supported models: {}", model, supported)]
    UnsupportedModel {
        /// Requested model identifier
        model: String,
        /// Comma-separated list of known models
        supported: String,
    },
    /// Reference image could not be prepared
    #[display("Input image not usable: {}", _0)]
    ImageInput(String),
    /// Prediction finished without output
    #[display("Image generation failed: {}", _0)]
    ImageGeneration(String),
    /// Request could not be assembled
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
}

/// Model collaborator error with location tracking.
///
/// # Examples
///
/// ```
/// use kidbook_error::{ModelError, ModelErrorKind};
///
/// let err = ModelError::new(ModelErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("did not contain any text"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Model Error: {} at line {} in {}", kind, line, file)]
pub struct ModelError {
    /// The specific failure
    pub kind: ModelErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ModelError {
    /// Create a new ModelError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ModelErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ModelErrorKind {
        &self.kind
    }
}
