//! Story pages and their scene briefs.

use derive_getters::Getters;
use kidbook_error::{KidbookResult, ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};

/// A single illustrated page cut from the full story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct StoryPage {
    /// 1-based page number
    page_number: u32,
    /// Short playful title
    title: String,
    /// Text printed on the page
    story_text: String,
}

/// Illustration brief distilled from a page.
///
/// Only `scene_description` is mandatory; the remaining fields are empty
/// strings when the scene writer did not provide them.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct SceneDescription {
    /// Page this scene belongs to
    page_number: u32,
    /// Visual description of the scene
    scene_description: String,
    /// Wardrobe for the child in this scene
    outfit_description: String,
    /// Facial expression guidance
    facial_expression: String,
    /// Pose or body-language guidance
    pose_description: String,
    /// Props, side characters and other continuity notes
    supporting_details: String,
}

impl SceneDescription {
    /// Returns a builder for constructing a SceneDescription.
    pub fn builder() -> SceneDescriptionBuilder {
        SceneDescriptionBuilder::default()
    }

    /// Minimal scene with only the mandatory description and supporting details.
    pub fn simple(
        page_number: u32,
        scene_description: impl Into<String>,
        supporting_details: impl Into<String>,
    ) -> Self {
        Self {
            page_number,
            scene_description: scene_description.into(),
            supporting_details: supporting_details.into(),
            ..Self::default()
        }
    }
}

/// Verify page numbers run 1..N without gaps or repeats.
///
/// # Examples
///
/// ```
/// use kidbook_core::ensure_contiguous;
///
/// assert!(ensure_contiguous([1, 2, 3]).is_ok());
/// assert!(ensure_contiguous([1, 2, 4]).is_err());
/// ```
pub fn ensure_contiguous<I>(page_numbers: I) -> KidbookResult<()>
where
    I: IntoIterator<Item = u32>,
{
    for (expected, found) in (1u32..).zip(page_numbers) {
        if found != expected {
            return Err(
                ValidationError::new(ValidationErrorKind::NonContiguousPages { expected, found })
                    .into(),
            );
        }
    }
    Ok(())
}
