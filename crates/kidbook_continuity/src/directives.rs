//! Per-page generation directives.

use derive_getters::Getters;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Key the page seed is stored under in [`GenerationDirectives::model_overrides`].
pub const SEED_OVERRIDE_KEY: &str = "seed";

/// Fully resolved instructions for one illustration request.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct GenerationDirectives {
    /// Image the model should anchor likeness on
    primary_reference_image: String,
    /// Extra references, most recent first
    additional_reference_images: Vec<String>,
    /// Identity description, fixed for the whole run
    identity_notes: Option<String>,
    /// Static, carried and current-scene continuity notes
    continuity_notes: Vec<String>,
    /// `name: description` lines for recurring characters
    supporting_cast_notes: Vec<String>,
    /// Image argument for the extra references, set only when history is carried
    reference_history_parameter: Option<String>,
    /// Arguments to merge into the image request (currently the seed)
    model_overrides: Map<String, Value>,
}

impl GenerationDirectives {
    pub(crate) fn new(
        primary_reference_image: String,
        additional_reference_images: Vec<String>,
        identity_notes: Option<String>,
        continuity_notes: Vec<String>,
        supporting_cast_notes: Vec<String>,
        reference_history_parameter: Option<String>,
        model_overrides: Map<String, Value>,
    ) -> Self {
        Self {
            primary_reference_image,
            additional_reference_images,
            identity_notes,
            continuity_notes,
            supporting_cast_notes,
            reference_history_parameter,
            model_overrides,
        }
    }

    /// The page seed, if one was resolved.
    pub fn seed(&self) -> Option<u64> {
        self.model_overrides
            .get(SEED_OVERRIDE_KEY)
            .and_then(Value::as_u64)
    }

    /// The note fields that end up in the image prompt.
    pub fn prompt_payload(&self) -> Value {
        json!({
            "identity_notes": self.identity_notes,
            "continuity_notes": self.continuity_notes,
            "supporting_cast_notes": self.supporting_cast_notes,
        })
    }
}
