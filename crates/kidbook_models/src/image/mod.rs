//! Illustration generation.

mod prompting;
mod replicate;

pub use prompting::{DEFAULT_CAMERA_SHOT, NEGATIVE_PROMPT, StorybookPrompt, build_storybook_prompt};
pub use replicate::{
    REFERENCE_HISTORY_KEY, ReplicateImageGenerator, build_prediction_input, prediction_output,
    supported_image_models,
};

use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use kidbook_core::ImageOutput;
use kidbook_error::KidbookResult;
use serde_json::{Map, Value};

/// Everything an image generator needs to illustrate one page.
///
/// `extra` carries model arguments merged for this page (seed, reference
/// history, caller knobs); they are applied on top of the model's default
/// input.
#[derive(Debug, Clone, PartialEq, Default, Builder, Getters)]
#[builder(setter(into), default)]
pub struct ImageRequest {
    /// Name of the child in the scene
    kid_name: String,
    /// Narrative description of the scene
    scene_description: String,
    /// Primary reference image (URL, data URI or local path)
    input_image: String,
    /// Camera framing override
    #[builder(setter(into, strip_option))]
    camera_shot: Option<String>,
    /// Thematic colouring for palette and wardrobe motifs
    #[builder(setter(into, strip_option))]
    favorite_theme: Option<String>,
    /// Wardrobe guidance for this page
    #[builder(setter(into, strip_option))]
    outfit_description: Option<String>,
    /// Facial expression guidance
    #[builder(setter(into, strip_option))]
    facial_expression: Option<String>,
    /// Pose guidance
    #[builder(setter(into, strip_option))]
    pose_description: Option<String>,
    /// Replaces the default negative prompt
    #[builder(setter(into, strip_option))]
    negative_prompt_override: Option<String>,
    /// Physical identity traits restated in the prompt
    #[builder(setter(into, strip_option))]
    identity_traits: Option<String>,
    /// Carry-over cues from earlier pages
    continuity_notes: Vec<String>,
    /// Recurring supporting character notes
    supporting_cast_notes: Vec<String>,
    /// Additional model arguments
    extra: Map<String, Value>,
}

impl ImageRequest {
    /// Creates a new builder for ImageRequest.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

/// Something that renders a page illustration.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate the illustration and return the provider's output references.
    async fn generate(&self, request: &ImageRequest) -> KidbookResult<ImageOutput>;
}
