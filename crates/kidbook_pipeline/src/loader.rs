//! Profile files on disk.

use kidbook_core::RawMapping;
use kidbook_error::{IoError, KidbookResult, SerializationError, ValidationError, ValidationErrorKind};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument};

/// Read a profile mapping from a `.yaml`, `.yml` or `.json` file.
///
/// # Errors
///
/// Unknown extensions, unreadable files, malformed documents and documents
/// whose top level is not a mapping are all rejected.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_profile_mapping(path: &Path) -> KidbookResult<RawMapping> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let parse: fn(&str) -> KidbookResult<Value> = match extension.as_str() {
        "yaml" | "yml" => |text| {
            serde_yaml::from_str(text)
                .map_err(|e| SerializationError::yaml(format!("Failed to parse profile: {}", e)).into())
        },
        "json" => |text| {
            serde_json::from_str(text)
                .map_err(|e| SerializationError::json(format!("Failed to parse profile: {}", e)).into())
        },
        _ => {
            return Err(ValidationError::new(ValidationErrorKind::UnsupportedFormat(
                path.display().to_string(),
            ))
            .into());
        }
    };

    let text = std::fs::read_to_string(path)
        .map_err(|e| IoError::new(format!("Failed to read {}: {}", path.display(), e)))?;

    match parse(&text)? {
        Value::Object(mapping) => {
            debug!(keys = mapping.len(), "Loaded profile mapping");
            Ok(mapping)
        }
        other => Err(ValidationError::new(ValidationErrorKind::InvalidProfileField {
            field: "profile".to_string(),
            message: format!("expected a mapping at the top level, got {}", other),
        })
        .into()),
    }
}
