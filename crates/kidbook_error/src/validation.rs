//! Validation error types.
//!
//! Validation errors are surfaced immediately and abort a pipeline run.

/// Specific validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Profile mapping has no usable `name`
    #[display("Profile data must include a non-empty 'name' field")]
    MissingName,
    /// Age could not be interpreted as an integer
    #[display("Expected an integer-compatible value for age, got {}", _0)]
    InvalidAge(String),
    /// Hobbies were neither a string nor a list
    #[display("hobbies must be a string or sequence of strings, got {}", _0)]
    InvalidHobbies(String),
    /// A profile field had an unusable shape
    #[display("Invalid profile field '{}': {}", field, message)]
    InvalidProfileField {
        /// Field name
        field: String,
        /// What was wrong with it
        message: String,
    },
    /// Requested page count falls outside the allowed range
    #[display("desired_pages must fall between {} and {}, received {}", lower, upper, requested)]
    PageCountOutOfRange {
        /// Lowest accepted count
        lower: usize,
        /// Highest accepted count
        upper: usize,
        /// What was asked for
        requested: usize,
    },
    /// Generated page list has the wrong length
    #[display("Expected between {} and {} pages, received {}", lower, upper, received)]
    UnexpectedPageCount {
        /// Lowest accepted count
        lower: usize,
        /// Highest accepted count
        upper: usize,
        /// What came back
        received: usize,
    },
    /// Page numbers are not 1..N without gaps
    #[display("Page numbers must be sequential starting from 1: expected {}, found {}", expected, found)]
    NonContiguousPages {
        /// Page number that should have appeared
        expected: u32,
        /// Page number that did appear
        found: u32,
    },
    /// A page entry is missing a mandatory field or has a malformed one
    #[display("Invalid page entry: {}", _0)]
    InvalidPage(String),
    /// Scene response lacks a mandatory field
    #[display("Scene description response missing '{}'", _0)]
    MissingSceneField(String),
    /// Story text was blank
    #[display("Story text must be a non-empty string")]
    EmptyStory,
    /// Package payload lacks a top-level key
    #[display("Story package payload must include '{}'", _0)]
    MissingPackageField(String),
    /// Package payload has the wrong shape
    #[display("Invalid story package: {}", _0)]
    InvalidPackage(String),
    /// A prompt input was blank
    #[display("{} must be a non-empty string", _0)]
    BlankPromptInput(String),
    /// File extension not recognized as YAML or JSON
    #[display("Unsupported file format '{}'. Use YAML or JSON", _0)]
    UnsupportedFormat(String),
    /// Command-line argument could not be parsed
    #[display("Invalid argument: {}", _0)]
    InvalidArgument(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use kidbook_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::MissingName);
/// assert!(format!("{}", err).contains("non-empty 'name'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific validation failure
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}

impl From<ValidationErrorKind> for ValidationError {
    #[track_caller]
    fn from(kind: ValidationErrorKind) -> Self {
        Self::new(kind)
    }
}
