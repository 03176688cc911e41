//! Wire types for OpenAI-compatible chat completions.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One content part of a multimodal wire message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WirePart {
    /// Text part
    Text {
        /// The text
        text: String,
    },
    /// Image part
    ImageUrl {
        /// Image location
        image_url: WireImageUrl,
    },
}

/// Image location inside an `image_url` part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireImageUrl {
    /// URL or `data:` URI
    pub url: String,
}

/// Message content: plain text, or a list of parts when images are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireContent {
    /// Text only
    Text(String),
    /// Text and image parts
    Parts(Vec<WirePart>),
}

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: WireContent,
}

/// OpenAI chat completion request body.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct WireRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<WireMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl WireRequest {
    /// Creates a new builder for WireRequest.
    pub fn builder() -> WireRequestBuilder {
        WireRequestBuilder::default()
    }
}

/// Assistant message in a response; content may be text, parts or null.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Raw content value
    #[serde(default)]
    pub content: Value,
}

/// A choice in the OpenAI response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The message content
    pub message: ChoiceMessage,
    /// Reason for finishing
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response choices
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}
