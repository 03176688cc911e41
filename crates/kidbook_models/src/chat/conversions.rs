//! Conversions between Kidbook chat types and the OpenAI wire format.

use super::ChatRequest;
use super::dto::{ChatResponse, WireContent, WireImageUrl, WireMessage, WirePart, WireRequest};
use kidbook_core::ContentPart;
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind};
use serde_json::Value;

/// Converts a [`ChatRequest`] to the OpenAI request body.
///
/// Messages made only of text are sent as a plain string; any image part
/// switches that message to the list-of-parts form.
pub fn to_wire_request(request: &ChatRequest) -> KidbookResult<Value> {
    let messages = request
        .messages()
        .iter()
        .map(|message| {
            let has_image = message
                .content()
                .iter()
                .any(|part| matches!(part, ContentPart::ImageUrl(_)));
            let content = if has_image {
                WireContent::Parts(
                    message
                        .content()
                        .iter()
                        .map(|part| match part {
                            ContentPart::Text(text) => WirePart::Text { text: text.clone() },
                            ContentPart::ImageUrl(url) => WirePart::ImageUrl {
                                image_url: WireImageUrl { url: url.clone() },
                            },
                        })
                        .collect(),
                )
            } else {
                WireContent::Text(message.text())
            };
            WireMessage {
                role: message.role().to_string(),
                content,
            }
        })
        .collect::<Vec<_>>();

    let mut builder = WireRequest::builder();
    builder
        .model(request.model().clone())
        .messages(messages)
        .max_tokens(*request.max_tokens())
        .temperature(*request.temperature());

    let wire = builder.build().map_err(|e| {
        ModelError::new(ModelErrorKind::InvalidRequest(format!(
            "Failed to build request: {}",
            e
        )))
    })?;

    serde_json::to_value(&wire).map_err(|e| {
        ModelError::new(ModelErrorKind::InvalidRequest(format!(
            "Failed to encode request: {}",
            e
        )))
        .into()
    })
}

/// Extracts the trimmed reply text from a raw response body.
///
/// # Errors
///
/// [`ModelErrorKind::ResponseParsing`] when the body is not a chat
/// response, [`ModelErrorKind::EmptyResponse`] when it holds no text.
///
/// # Examples
///
/// ```
/// use kidbook_models::parse_chat_response;
/// use serde_json::json;
///
/// let body = json!({"choices": [{"message": {"content": "  Once upon a time  "}}]});
/// assert_eq!(parse_chat_response(&body).unwrap(), "Once upon a time");
/// ```
pub fn parse_chat_response(body: &Value) -> KidbookResult<String> {
    let response: ChatResponse = serde_json::from_value(body.clone()).map_err(|e| {
        ModelError::new(ModelErrorKind::ResponseParsing(format!(
            "Unexpected chat response format: {}",
            e
        )))
    })?;

    let choice = response.choices.first().ok_or_else(|| {
        ModelError::new(ModelErrorKind::ResponseParsing(
            "No choices in response".to_string(),
        ))
    })?;

    let text = match &choice.message.content {
        Value::String(text) => text.trim().to_string(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(text) => Some(text.as_str()),
                other => other.get("text").and_then(Value::as_str),
            })
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string(),
        _ => String::new(),
    };

    if text.is_empty() {
        return Err(ModelError::new(ModelErrorKind::EmptyResponse).into());
    }
    Ok(text)
}
