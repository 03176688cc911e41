//! External collaborators for the Kidbook pipeline.
//!
//! - [`ChatCompletion`] with [`OpenAICompatibleClient`], used for story text,
//!   page splitting, scene briefs and identity extraction.
//! - [`ImageGenerator`] with [`ReplicateImageGenerator`], used for page
//!   illustrations.
//! - [`ModelSettings`], the explicit settings object every client is built
//!   from.

mod chat;
mod image;
mod settings;

pub use chat::{
    ChatCompletion, ChatRequest, ChatRequestBuilder, OpenAICompatibleClient, parse_chat_response,
    to_wire_request,
};
pub use image::{
    DEFAULT_CAMERA_SHOT, ImageGenerator, ImageRequest, ImageRequestBuilder, NEGATIVE_PROMPT,
    REFERENCE_HISTORY_KEY, ReplicateImageGenerator, StorybookPrompt, build_prediction_input,
    build_storybook_prompt, prediction_output, supported_image_models,
};
pub use settings::{ChatModelSettings, ImageModelSettings, ModelSettings};
