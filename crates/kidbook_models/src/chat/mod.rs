//! Chat completion against OpenAI-compatible endpoints.

mod client;
mod conversions;
mod dto;

pub use client::OpenAICompatibleClient;
pub use conversions::{parse_chat_response, to_wire_request};

use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use kidbook_core::ChatMessage;
use kidbook_error::KidbookResult;

/// A provider-neutral chat completion request.
///
/// # Examples
///
/// ```
/// use kidbook_core::ChatMessage;
/// use kidbook_models::ChatRequest;
///
/// let request = ChatRequest::builder()
///     .model("gpt-4.1-mini")
///     .messages(vec![ChatMessage::user("Tell me a story")])
///     .temperature(0.7_f32)
///     .max_tokens(1400u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.model(), "gpt-4.1-mini");
/// assert_eq!(*request.temperature(), Some(0.7));
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[builder(default, setter(into, strip_option))]
    temperature: Option<f32>,
    /// Maximum tokens to generate
    #[builder(default, setter(into, strip_option))]
    max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Something that turns a chat request into reply text.
///
/// Implementations return the trimmed text of the first choice and treat a
/// reply without text as an error.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run the completion.
    async fn complete(&self, request: &ChatRequest) -> KidbookResult<String>;
}

#[async_trait]
impl<T: ChatCompletion + ?Sized> ChatCompletion for std::sync::Arc<T> {
    async fn complete(&self, request: &ChatRequest) -> KidbookResult<String> {
        (**self).complete(request).await
    }
}
