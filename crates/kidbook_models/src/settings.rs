//! Model settings: which models to call and with which credentials.
//!
//! Settings are loaded once, at the edge of the program, and passed to the
//! clients explicitly. Clients never read the environment themselves.

use derive_getters::Getters;
use kidbook_error::{ConfigError, KidbookResult, ModelError, ModelErrorKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const REPLICATE_API_URL: &str = "https://api.replicate.com/v1";
const DEFAULT_TEXT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_IDENTITY_MODEL: &str = "gpt-4o-mini";

/// Settings for one chat completion role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatModelSettings {
    /// Model identifier
    model: String,
    /// Bearer token
    #[serde(default)]
    api_key: Option<String>,
    /// Full chat completions endpoint
    #[serde(default = "default_chat_url")]
    base_url: String,
}

impl ChatModelSettings {
    /// Settings for `model` at the OpenAI endpoint, without a key.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: default_chat_url(),
        }
    }

    /// The API key, or a missing-credentials error.
    pub fn require_api_key(&self) -> KidbookResult<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            ModelError::new(ModelErrorKind::MissingCredentials(format!(
                "No API key configured for model '{}'. Set OPENAI_API_KEY",
                self.model
            )))
            .into()
        })
    }

    fn fill_api_key(&mut self, fallback: Option<&str>) {
        if self.api_key.is_none() {
            self.api_key = fallback.map(str::to_string);
        }
    }
}

/// Settings for the image generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImageModelSettings {
    /// Replicate API token
    #[serde(default)]
    api_token: Option<String>,
    /// `owner/model` or `owner/model:version`
    #[serde(default)]
    model: Option<String>,
    /// API base URL
    #[serde(default = "default_replicate_url")]
    base_url: String,
}

impl Default for ImageModelSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            model: None,
            base_url: default_replicate_url(),
        }
    }
}

/// All model settings, one entry per collaborator role.
///
/// # Examples
///
/// ```
/// use kidbook_models::ModelSettings;
///
/// let settings = ModelSettings::default();
/// assert_eq!(settings.story().model(), "gpt-4.1-mini");
/// assert_eq!(settings.identity().model(), "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ModelSettings {
    /// Story writer
    story: ChatModelSettings,
    /// Page splitter
    pages: ChatModelSettings,
    /// Scene writer
    scene: ChatModelSettings,
    /// Identity extractor
    identity: ChatModelSettings,
    /// Illustration generator
    image: ImageModelSettings,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            story: ChatModelSettings::new(DEFAULT_TEXT_MODEL),
            pages: ChatModelSettings::new(DEFAULT_TEXT_MODEL),
            scene: ChatModelSettings::new(DEFAULT_TEXT_MODEL),
            identity: ChatModelSettings::new(DEFAULT_IDENTITY_MODEL),
            image: ImageModelSettings::default(),
        }
    }
}

impl ModelSettings {
    /// Layer defaults, an optional TOML file, then `KIDBOOK_*` variables.
    ///
    /// Nested keys use a double underscore (`KIDBOOK_STORY__MODEL`). After
    /// layering, `OPENAI_API_KEY`, `REPLICATE_API_TOKEN` and
    /// `REPLICATE_MODEL` fill whatever is still unset.
    ///
    /// # Errors
    ///
    /// The file cannot be read or a value has the wrong type.
    #[instrument(skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> KidbookResult<Self> {
        let mut builder = config::Config::builder().add_source(
            config::Config::try_from(&Self::default())
                .map_err(|e| ConfigError::new(format!("Invalid default settings: {}", e)))?,
        );

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("KIDBOOK")
                .prefix_separator("_")
                .separator("__"),
        );

        let mut settings: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::new(format!("Failed to load model settings: {}", e)))?;

        settings.apply_fallbacks(
            std::env::var("OPENAI_API_KEY").ok().as_deref(),
            std::env::var("REPLICATE_API_TOKEN").ok().as_deref(),
            std::env::var("REPLICATE_MODEL").ok().as_deref(),
        );

        debug!(
            story_model = %settings.story.model,
            image_model = ?settings.image.model,
            "Loaded model settings"
        );
        Ok(settings)
    }

    /// Fill unset credentials and the image model from conventional values.
    pub fn apply_fallbacks(
        &mut self,
        openai_api_key: Option<&str>,
        replicate_api_token: Option<&str>,
        replicate_model: Option<&str>,
    ) {
        for role in [
            &mut self.story,
            &mut self.pages,
            &mut self.scene,
            &mut self.identity,
        ] {
            role.fill_api_key(openai_api_key);
        }
        if self.image.api_token.is_none() {
            self.image.api_token = replicate_api_token.map(str::to_string);
        }
        if self.image.model.is_none() {
            self.image.model = replicate_model.map(str::to_string);
        }
    }
}

fn default_chat_url() -> String {
    OPENAI_CHAT_URL.to_string()
}

fn default_replicate_url() -> String {
    REPLICATE_API_URL.to_string()
}
