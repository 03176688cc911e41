//! Chat messages sent to completion models.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One piece of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text(String),
    /// Image addressed by URL or `data:` URI
    ImageUrl(String),
}

/// A multimodal chat message.
///
/// # Examples
///
/// ```
/// use kidbook_core::{ChatMessage, ContentPart, Role};
///
/// let message = ChatMessage::user_with_image("Describe the child.", "https://img/ref.png");
///
/// assert_eq!(*message.role(), Role::User);
/// assert_eq!(message.content().len(), 2);
/// assert_eq!(message.content()[1], ContentPart::ImageUrl("https://img/ref.png".to_string()));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct ChatMessage {
    /// The role of the message sender
    role: Role,
    /// The content of the message
    content: Vec<ContentPart>,
}

impl ChatMessage {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    /// Returns a builder for constructing a ChatMessage.
    pub fn builder() -> ChatMessageBuilder {
        ChatMessageBuilder::default()
    }

    /// System message with a single text part.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![ContentPart::Text(text.into())])
    }

    /// User message with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::Text(text.into())])
    }

    /// User message with text followed by an image.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self::new(
            Role::User,
            vec![
                ContentPart::Text(text.into()),
                ContentPart::ImageUrl(image_url.into()),
            ],
        )
    }

    /// Concatenated text parts, ignoring images.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::ImageUrl(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
