//! Reference image sources and their transport encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Where a reference image lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaSource {
    /// Remote `http(s)` URL
    Url(String),
    /// Inline `data:` URI
    DataUri(String),
    /// File on the local disk
    Path(PathBuf),
}

impl MediaSource {
    /// Classify a reference string by its scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use kidbook_core::MediaSource;
    /// use std::path::PathBuf;
    ///
    /// assert!(matches!(MediaSource::classify("HTTPS://cdn/img.png"), MediaSource::Url(_)));
    /// assert!(matches!(MediaSource::classify("data:image/png;base64,AAA"), MediaSource::DataUri(_)));
    /// assert_eq!(MediaSource::classify("photos/mia.png"), MediaSource::Path(PathBuf::from("photos/mia.png")));
    /// ```
    pub fn classify(reference: &str) -> Self {
        let reference = reference.trim();
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            MediaSource::Url(reference.to_string())
        } else if lower.starts_with("data:") {
            MediaSource::DataUri(reference.to_string())
        } else {
            MediaSource::Path(PathBuf::from(reference))
        }
    }

    /// Whether the source must be read from disk before sending.
    pub fn is_local(&self) -> bool {
        matches!(self, MediaSource::Path(_))
    }

    /// A string a remote API can consume: URLs and data URIs pass through,
    /// local files are read and inlined as base64 data URIs.
    ///
    /// # Errors
    ///
    /// Returns [`ModelErrorKind::ImageInput`] when a local file cannot be read.
    #[instrument(skip(self))]
    pub fn to_transport(&self) -> KidbookResult<String> {
        match self {
            MediaSource::Url(url) => Ok(url.clone()),
            MediaSource::DataUri(uri) => Ok(uri.clone()),
            MediaSource::Path(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    ModelError::new(ModelErrorKind::ImageInput(format!(
                        "Input image not found at '{}': {}",
                        path.display(),
                        e
                    )))
                })?;
                debug!(path = %path.display(), bytes = bytes.len(), "Encoded local reference image");
                Ok(encode_data_uri(&bytes, guess_image_mime(path)))
            }
        }
    }
}

/// Encode raw bytes as a `data:` URI.
pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// MIME type for an image path by extension, `image/jpeg` when unknown.
pub fn guess_image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("svg") => "image/svg+xml",
        _ => DEFAULT_IMAGE_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_defaults_to_jpeg() {
        assert_eq!(guess_image_mime(Path::new("photo.heic")), "image/jpeg");
        assert_eq!(guess_image_mime(Path::new("photo")), "image/jpeg");
        assert_eq!(guess_image_mime(Path::new("photo.PNG")), "image/png");
    }

    #[test]
    fn data_uri_shape() {
        assert_eq!(encode_data_uri(b"hi", "image/png"), "data:image/png;base64,aGk=");
    }
}
