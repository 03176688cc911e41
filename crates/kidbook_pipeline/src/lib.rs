//! Storybook pipeline orchestration.
//!
//! The [`Orchestrator`] runs one book end to end: parse the profile, write
//! the story, split it into pages, then for every page write a scene brief,
//! resolve continuity directives, generate the illustration and record the
//! result. Each transition is reported as a [`ProgressEvent`].

mod arguments;
mod events;
mod loader;
mod orchestrator;

pub use arguments::{CAMERA_SHOT_KEY, merge_image_args, take_camera_shot};
pub use events::{PipelineStage, ProgressCallback, ProgressEvent};
pub use loader::load_profile_mapping;
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RunOptions, RunOptionsBuilder};
