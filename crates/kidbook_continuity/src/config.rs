//! Resolved continuity policy for one run.

use crate::SeedPolicy;
use derive_builder::Builder;
use derive_getters::Getters;
use kidbook_core::SupportingCast;
use serde::{Deserialize, Serialize};

/// Everything the continuity engine needs to know up front.
///
/// Immutable once built. With the defaults, reference history is off,
/// supporting details propagate across the last two pages and the seed is
/// derived from the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
#[serde(default)]
pub struct ContinuityConfig {
    /// Fixed identity description; the profile summary is used when absent
    #[builder(default, setter(into, strip_option))]
    pub(crate) identity_notes: Option<String>,
    /// Recurring side characters, by name
    #[builder(default)]
    pub(crate) supporting_character_notes: SupportingCast,
    /// Notes repeated on every page
    #[builder(default)]
    pub(crate) static_continuity_notes: Vec<String>,
    /// Feed earlier illustrations back in as references
    #[builder(default)]
    pub(crate) carry_reference_image_forward: bool,
    /// How many earlier illustrations to remember; zero keeps none
    #[builder(default)]
    pub(crate) reference_history_size: usize,
    /// Image model argument that receives the extra references
    #[builder(default, setter(into, strip_option))]
    pub(crate) reference_history_parameter: Option<String>,
    /// Use the latest illustration as the primary reference
    #[builder(default)]
    pub(crate) promote_latest_reference: bool,
    /// Carry scene supporting details onto later pages
    #[builder(default = "true")]
    pub(crate) propagate_supporting_details: bool,
    /// How many supporting detail lines to carry
    #[builder(default = "2")]
    pub(crate) supporting_details_history: usize,
    /// How the base seed is chosen
    #[builder(default)]
    pub(crate) seed_policy: SeedPolicy,
    /// Step the seed by one for each page
    #[builder(default)]
    pub(crate) vary_seed_per_page: bool,
}

impl ContinuityConfig {
    /// Creates a new builder for ContinuityConfig.
    pub fn builder() -> ContinuityConfigBuilder {
        ContinuityConfigBuilder::default()
    }

    /// Whether reference history is both enabled and able to hold anything.
    pub fn carries_history(&self) -> bool {
        self.carry_reference_image_forward && self.reference_history_size > 0
    }
}

impl Default for ContinuityConfig {
    fn default() -> Self {
        Self {
            identity_notes: None,
            supporting_character_notes: SupportingCast::default(),
            static_continuity_notes: Vec::new(),
            carry_reference_image_forward: false,
            reference_history_size: 0,
            reference_history_parameter: None,
            promote_latest_reference: false,
            propagate_supporting_details: true,
            supporting_details_history: 2,
            seed_policy: SeedPolicy::Auto,
            vary_seed_per_page: false,
        }
    }
}
