//! Image generator outputs, tagged by shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an image generator hands back.
///
/// Providers return a single reference, a (possibly nested) list of
/// references, or nothing. The tag is decided once at the collaborator
/// boundary so a string is never mistaken for a sequence of characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ImageOutput {
    /// One already-joined reference (URL, path, data URI)
    Text(String),
    /// An ordered collection of outputs
    List(Vec<ImageOutput>),
    /// No output
    Empty,
}

impl ImageOutput {
    /// Classify a decoded JSON payload.
    ///
    /// Objects carrying a `url` or `output` key are unwrapped; other objects
    /// and booleans/numbers become their JSON text.
    ///
    /// # Examples
    ///
    /// ```
    /// use kidbook_core::ImageOutput;
    /// use serde_json::json;
    ///
    /// let output = ImageOutput::from_json(&json!(["a.png", ["b.png", null], "c.png"]));
    /// assert_eq!(output.flatten(), vec!["a.png", "b.png", "c.png"]);
    ///
    /// let single = ImageOutput::from_json(&json!("https://img/1.png"));
    /// assert_eq!(single.flatten(), vec!["https://img/1.png"]);
    /// ```
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ImageOutput::Empty,
            Value::String(s) => ImageOutput::Text(s.clone()),
            Value::Array(items) => ImageOutput::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => match map.get("url").or_else(|| map.get("output")) {
                Some(inner) => Self::from_json(inner),
                None => ImageOutput::Text(value.to_string()),
            },
            other => ImageOutput::Text(other.to_string()),
        }
    }

    /// Flatten into an ordered list of reference strings.
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            ImageOutput::Text(text) => out.push(text.clone()),
            ImageOutput::List(items) => items.iter().for_each(|item| item.flatten_into(out)),
            ImageOutput::Empty => {}
        }
    }
}

impl From<String> for ImageOutput {
    fn from(text: String) -> Self {
        ImageOutput::Text(text)
    }
}

impl From<&str> for ImageOutput {
    fn from(text: &str) -> Self {
        ImageOutput::Text(text.to_string())
    }
}

impl<T: Into<ImageOutput>> From<Vec<T>> for ImageOutput {
    fn from(items: Vec<T>) -> Self {
        ImageOutput::List(items.into_iter().map(Into::into).collect())
    }
}
