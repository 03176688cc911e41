//! Story writing through a chat model.

use crate::StoryWriter;
use crate::prompting::{DEFAULT_LENGTH_GUIDANCE, DEFAULT_STRUCTURE_GUIDANCE, story_prompt};
use async_trait::async_trait;
use kidbook_core::{ChatMessage, Profile};
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind};
use kidbook_models::{ChatCompletion, ChatRequest};
use tracing::{debug, info, instrument};

/// Story writer backed by a chat completion model.
#[derive(Debug, Clone)]
pub struct LlmStoryWriter<C> {
    client: C,
    model: String,
    temperature: f32,
    max_tokens: u32,
    length_guidance: String,
    structure_guidance: String,
}

impl<C: ChatCompletion> LlmStoryWriter<C> {
    /// Creates a writer calling `model` through `client`.
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1400,
            length_guidance: DEFAULT_LENGTH_GUIDANCE.to_string(),
            structure_guidance: DEFAULT_STRUCTURE_GUIDANCE.to_string(),
        }
    }

    /// Replace the length instruction.
    pub fn with_length_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.length_guidance = guidance.into();
        self
    }

    /// Replace the Markdown layout instruction.
    pub fn with_structure_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.structure_guidance = guidance.into();
        self
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl<C: ChatCompletion> StoryWriter for LlmStoryWriter<C> {
    #[instrument(skip(self, profile), fields(model = %self.model, child = %profile.name()))]
    async fn write_story(&self, profile: &Profile) -> KidbookResult<String> {
        let prompt = story_prompt(profile, &self.length_guidance, &self.structure_guidance);
        let request = ChatRequest::builder()
            .model(self.model.clone())
            .messages(vec![
                ChatMessage::system(prompt.system().clone()),
                ChatMessage::user(prompt.user().clone()),
            ])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| ModelError::new(ModelErrorKind::InvalidRequest(e.to_string())))?;

        let story = self.client.complete(&request).await?;
        let story = story.trim();
        if story.is_empty() {
            return Err(ModelError::new(ModelErrorKind::EmptyResponse).into());
        }

        debug!(chars = story.len(), "Story text received");
        info!(words = story.split_whitespace().count(), "Story written");
        Ok(story.to_string())
    }
}
