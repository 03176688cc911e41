//! Scene briefs through a chat model.

use crate::prompting::scene_prompt;
use crate::{SceneWriter, parse_json};
use async_trait::async_trait;
use kidbook_core::{ChatMessage, Profile, SceneDescription, StoryPage};
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind, ValidationError, ValidationErrorKind};
use kidbook_models::{ChatCompletion, ChatRequest};
use serde_json::Value;
use tracing::{debug, instrument};

/// Scene writer backed by a chat completion model.
#[derive(Debug, Clone)]
pub struct LlmSceneWriter<C> {
    client: C,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl<C: ChatCompletion> LlmSceneWriter<C> {
    /// Creates a scene writer calling `model` through `client`.
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: 0.4,
            max_tokens: 900,
        }
    }
}

#[async_trait]
impl<C: ChatCompletion> SceneWriter for LlmSceneWriter<C> {
    #[instrument(skip(self, page, profile), fields(model = %self.model, page_number = *page.page_number()))]
    async fn page_to_scene(
        &self,
        page: &StoryPage,
        profile: &Profile,
    ) -> KidbookResult<SceneDescription> {
        let prompt = scene_prompt(profile, page);
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

        let reply = self.client.complete(&request).await?;
        let payload = parse_json(&reply, "scene description")?;

        let field = |key: &str| -> String {
            match payload.get(key) {
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            }
        };

        let scene_description = field("scene_description");
        if scene_description.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::MissingSceneField(
                "scene_description".to_string(),
            ))
            .into());
        }

        let scene = SceneDescription::builder()
            .page_number(*page.page_number())
            .scene_description(scene_description)
            .outfit_description(field("outfit_description"))
            .facial_expression(field("facial_expression"))
            .pose_description(field("pose_description"))
            .supporting_details(field("supporting_details"))
            .build()
            .map_err(|e| ModelError::new(ModelErrorKind::ResponseParsing(e.to_string())))?;

        debug!(
            has_outfit = !scene.outfit_description().is_empty(),
            has_supporting = !scene.supporting_details().is_empty(),
            "Scene brief ready"
        );
        Ok(scene)
    }
}
