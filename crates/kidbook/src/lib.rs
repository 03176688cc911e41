//! Personalized children's storybooks with consistent illustrations.
//!
//! This crate re-exports the Kidbook workspace behind one dependency and
//! hosts the `kidbook` command-line tool.
//!
//! - [`Profile`] describes the child
//! - [`Orchestrator`] turns a profile and a reference photo into a
//!   [`StoryPackage`]
//! - [`ContinuityState`] keeps the child, props and side characters
//!   consistent from page to page

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;

pub use kidbook_continuity::{
    ChatIdentityExtractor, ContinuityAssembly, ContinuityConfig, ContinuityOptions,
    ContinuityState, GenerationDirectives, IdentityExtractor, SEED_MODULUS, SeedPolicy,
    assemble_continuity_config, derive_seed, seed_for_page,
};
pub use kidbook_core::{
    ImageOutput, PageAsset, Profile, SceneDescription, StoryPackage, StoryPage, SupportingCast,
    init_tracing,
};
pub use kidbook_error::{KidbookError, KidbookErrorKind, KidbookResult};
pub use kidbook_models::{
    ChatCompletion, ImageGenerator, ModelSettings, OpenAICompatibleClient, ReplicateImageGenerator,
};
pub use kidbook_pipeline::{Orchestrator, PipelineStage, ProgressEvent, RunOptions};
pub use kidbook_story::{
    LlmPageSplitter, LlmSceneWriter, LlmStoryWriter, PageSplitter, SceneWriter, StoryWriter,
};
