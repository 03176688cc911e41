//! JSON extraction from model replies.

use kidbook_error::{KidbookResult, SerializationError};
use serde_json::Value;

/// Extract the JSON part of a reply that may be wrapped in a code fence or prose.
///
/// Fenced blocks win; otherwise the span from the first `{` to the last `}`
/// is taken; otherwise the trimmed text is returned unchanged.
///
/// # Examples
///
/// ```
/// use kidbook_story::extract_json;
///
/// assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(extract_json("Sure! {\"a\": 1} Enjoy."), "{\"a\": 1}");
/// ```
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```json") {
        let content_start = start + 7;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    if let Some(start) = text.find("```") {
        let content_start = start + 3;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parse a model reply as a JSON value, tolerating fences and surrounding prose.
pub fn parse_json(text: &str, what: &str) -> KidbookResult<Value> {
    serde_json::from_str(extract_json(text)).map_err(|e| {
        SerializationError::json(format!("Failed to parse {} response as JSON: {}", what, e)).into()
    })
}
