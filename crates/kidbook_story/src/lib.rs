//! Story collaborators for the Kidbook pipeline.
//!
//! Three steps turn a [`Profile`] into illustration briefs: a
//! [`StoryWriter`] writes the full story, a [`PageSplitter`] cuts it into
//! pages, and a [`SceneWriter`] turns each page into a [`SceneDescription`].
//! The `Llm*` implementations drive any [`kidbook_models::ChatCompletion`].

mod extraction;
mod prompting;
mod scene;
mod splitter;
mod writer;

pub use extraction::{extract_json, parse_json};
pub use prompting::{
    DEFAULT_LENGTH_GUIDANCE, DEFAULT_STRUCTURE_GUIDANCE, PromptPair, page_split_prompt,
    scene_prompt, story_prompt,
};
pub use scene::LlmSceneWriter;
pub use splitter::{DEFAULT_PAGE_RANGE, LlmPageSplitter};
pub use writer::LlmStoryWriter;

use async_trait::async_trait;
use kidbook_core::{Profile, SceneDescription, StoryPage};
use kidbook_error::KidbookResult;

/// Writes the complete story for a child.
#[async_trait]
pub trait StoryWriter: Send + Sync {
    /// Return the story text; never empty.
    async fn write_story(&self, profile: &Profile) -> KidbookResult<String>;
}

/// Cuts a story into illustrated pages.
#[async_trait]
pub trait PageSplitter: Send + Sync {
    /// Return pages numbered 1..N without gaps.
    async fn split_story(
        &self,
        story: &str,
        profile: &Profile,
        desired_pages: Option<usize>,
    ) -> KidbookResult<Vec<StoryPage>>;
}

/// Turns a page into an illustration brief.
#[async_trait]
pub trait SceneWriter: Send + Sync {
    /// Return the scene for `page`; `scene_description` is never blank.
    async fn page_to_scene(
        &self,
        page: &StoryPage,
        profile: &Profile,
    ) -> KidbookResult<SceneDescription>;
}
