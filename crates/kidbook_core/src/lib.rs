//! Core data types for the Kidbook storybook generator.
//!
//! This crate holds the data model shared by every other Kidbook crate: the
//! child's [`Profile`], story pages and scene briefs, image generator
//! outputs, the final [`StoryPackage`], and the chat message types sent to
//! language models.

mod image_output;
mod media;
mod message;
mod notes;
mod observability;
mod package;
mod page;
mod profile;
mod role;
mod supporting;

pub use image_output::ImageOutput;
pub use media::{MediaSource, encode_data_uri, guess_image_mime};
pub use message::{ChatMessage, ChatMessageBuilder, ContentPart};
pub use notes::{collect_note_lines, dedupe_case_insensitive, non_blank};
pub use observability::init_tracing;
pub use package::{PageAsset, StoryPackage};
pub use page::{SceneDescription, SceneDescriptionBuilder, StoryPage, ensure_contiguous};
pub use profile::{Profile, RawMapping};
pub use role::Role;
pub use supporting::SupportingCast;
