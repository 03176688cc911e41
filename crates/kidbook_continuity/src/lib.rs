//! Illustration continuity engine.
//!
//! A storybook is illustrated one page at a time, and every request to the
//! image model must describe the same child with the same face, the same
//! recurring props and the same side characters. This crate keeps that
//! consistency:
//!
//! - [`seed`] derives a reproducible image seed from the child's profile
//! - [`ContinuityConfig`] is the resolved, immutable policy for one run
//! - [`assemble_continuity_config`] reconciles notes from the profile, the
//!   caller and an optional [`IdentityExtractor`] into that policy
//! - [`ContinuityState`] carries bounded reference and detail history from
//!   page to page and resolves [`GenerationDirectives`] for each one
//!
//! # Examples
//!
//! ```
//! use kidbook_continuity::{ContinuityConfig, ContinuityState};
//! use kidbook_core::{Profile, SceneDescription};
//! use serde_json::json;
//!
//! let profile = Profile::from_mapping(json!({"name": "Mia"}).as_object().unwrap()).unwrap();
//! let config = ContinuityConfig::builder()
//!     .carry_reference_image_forward(true)
//!     .reference_history_size(1usize)
//!     .promote_latest_reference(true)
//!     .build()
//!     .unwrap();
//! let mut state = ContinuityState::new(&profile, "mia.jpg", config);
//!
//! let scene = SceneDescription::simple(1, "Mia waves at the moon", "");
//! let first = state.build_directives(&scene, 1);
//! assert_eq!(first.primary_reference_image(), "mia.jpg");
//!
//! state.record_generation(&scene, &["url_a".to_string()]);
//! let second = state.build_directives(&scene, 2);
//! assert_eq!(second.primary_reference_image(), "url_a");
//! assert_eq!(second.additional_reference_images(), &vec!["mia.jpg".to_string()]);
//! ```

mod assembly;
mod config;
mod directives;
mod identity;
pub mod seed;
mod state;

pub use assembly::{
    ContinuityAssembly, ContinuityOptions, ContinuityOptionsBuilder, assemble_continuity_config,
};
pub use config::{ContinuityConfig, ContinuityConfigBuilder};
pub use directives::{GenerationDirectives, SEED_OVERRIDE_KEY};
pub use identity::{ChatIdentityExtractor, IdentityExtractor, filter_physical_identity_notes};
pub use seed::{SEED_MODULUS, SeedPolicy, derive_seed, resolve_base_seed, seed_for_page};
pub use state::{ContinuityState, MAX_DETAIL_CHARS, summarize_supporting_details};
