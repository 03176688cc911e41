//! `KEY=VALUE` image arguments.

use kidbook_error::{KidbookError, ValidationError, ValidationErrorKind};
use serde_json::Value;

/// Parse one `KEY=VALUE` argument.
///
/// The value is read as JSON when it parses (`30`, `true`, `["a.png"]`),
/// otherwise it is kept as a plain string.
///
/// # Examples
///
/// ```
/// use kidbook::cli::parse_image_arg;
/// use serde_json::json;
///
/// assert_eq!(parse_image_arg("steps=30").unwrap(), ("steps".to_string(), json!(30)));
/// assert_eq!(parse_image_arg("style=watercolor").unwrap().1, json!("watercolor"));
/// assert!(parse_image_arg("no-equals-sign").is_err());
/// ```
pub fn parse_image_arg(raw: &str) -> Result<(String, Value), KidbookError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(ValidationError::new(ValidationErrorKind::InvalidArgument(format!(
            "image argument '{}' must look like KEY=VALUE",
            raw
        )))
        .into());
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::InvalidArgument(format!(
            "image argument '{}' has an empty key",
            raw
        )))
        .into());
    }

    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
