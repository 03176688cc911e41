//! One-time reconciliation of continuity sources into a [`ContinuityConfig`].

use crate::{ContinuityConfig, IdentityExtractor, SeedPolicy};
use derive_builder::Builder;
use derive_getters::Getters;
use kidbook_core::{Profile, SupportingCast, collect_note_lines, dedupe_case_insensitive, non_blank};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Caller-side adjustments applied on top of the profile.
///
/// Every field is optional; unset fields fall back to the profile or to
/// [`ContinuityConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
#[serde(default)]
pub struct ContinuityOptions {
    /// Ask the identity extractor for notes
    #[builder(default = "true")]
    automatic_identity_notes: bool,
    /// Identity lines that take precedence over every other source
    #[builder(default)]
    identity_note_overrides: Vec<String>,
    /// Supporting characters that replace or extend the profile's
    #[builder(default)]
    supporting_character_overrides: SupportingCast,
    /// Extra notes repeated on every page
    #[builder(default)]
    static_continuity_overrides: Vec<String>,
    /// Reference history capacity
    #[builder(default, setter(into, strip_option))]
    reference_history_size: Option<usize>,
    /// Image argument that receives the extra references
    #[builder(default, setter(into, strip_option))]
    reference_history_parameter: Option<String>,
    /// Use the latest illustration as the primary reference
    #[builder(default, setter(into, strip_option))]
    promote_latest_reference: Option<bool>,
    /// Seed policy; derived from the profile when unset
    #[builder(default, setter(into, strip_option))]
    seed_policy: Option<SeedPolicy>,
    /// Step the seed by one for each page
    #[builder(default, setter(into, strip_option))]
    vary_seed_per_page: Option<bool>,
}

impl ContinuityOptions {
    /// Creates a new builder for ContinuityOptions.
    pub fn builder() -> ContinuityOptionsBuilder {
        ContinuityOptionsBuilder::default()
    }
}

impl Default for ContinuityOptions {
    fn default() -> Self {
        Self {
            automatic_identity_notes: true,
            identity_note_overrides: Vec::new(),
            supporting_character_overrides: SupportingCast::default(),
            static_continuity_overrides: Vec::new(),
            reference_history_size: None,
            reference_history_parameter: None,
            promote_latest_reference: None,
            seed_policy: None,
            vary_seed_per_page: None,
        }
    }
}

/// The resolved config plus what each source contributed.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct ContinuityAssembly {
    /// Config ready for [`ContinuityState`](crate::ContinuityState)
    config: ContinuityConfig,
    /// Merged identity text as `- ` bullets
    identity_notes: Option<String>,
    /// Raw extractor output, when it produced anything
    auto_identity_notes: Option<String>,
    /// Merged supporting cast
    supporting_character_notes: SupportingCast,
    /// Merged static notes
    static_continuity_notes: Vec<String>,
}

impl ContinuityAssembly {
    /// Take the config, dropping the per-source detail.
    pub fn into_config(self) -> ContinuityConfig {
        self.config
    }
}

/// Reconcile the profile, caller options and extracted identity notes.
///
/// The extractor is the only external call. Its errors are logged and treated
/// as an empty contribution, so assembly itself cannot fail. A resolved
/// history size of zero turns reference carrying, promotion and the history
/// parameter off.
#[instrument(skip_all, fields(child = %profile.name(), extractor = extractor.is_some()))]
pub async fn assemble_continuity_config(
    profile: &Profile,
    reference_image: &str,
    options: &ContinuityOptions,
    extractor: Option<&dyn IdentityExtractor>,
) -> ContinuityAssembly {
    let defaults = ContinuityConfig::default();

    let history_size = options
        .reference_history_size
        .unwrap_or(*defaults.reference_history_size());
    let history_parameter = options
        .reference_history_parameter
        .as_deref()
        .and_then(non_blank)
        .map(str::to_string)
        .or_else(|| defaults.reference_history_parameter().clone());
    let promote_latest = options
        .promote_latest_reference
        .unwrap_or(*defaults.promote_latest_reference());

    let auto_identity_notes = match extractor {
        Some(extractor) if options.automatic_identity_notes => {
            match extractor.extract(reference_image).await {
                Ok(notes) => non_blank(&notes).map(str::to_string),
                Err(e) => {
                    warn!(error = %e, "Identity extraction failed; proceeding without automatic notes");
                    None
                }
            }
        }
        _ => None,
    };

    let identity_lines = dedupe_case_insensitive(
        collect_note_lines(&options.identity_note_overrides)
            .into_iter()
            .chain(collect_note_lines(profile.identity_traits()))
            .chain(collect_note_lines(&auto_identity_notes)),
    );
    let identity_notes = (!identity_lines.is_empty()).then(|| {
        identity_lines
            .iter()
            .map(|line| format!("- {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    });

    let mut supporting_character_notes = profile.supporting_characters().clone();
    supporting_character_notes.merge(&options.supporting_character_overrides);

    let static_continuity_notes = dedupe_case_insensitive(
        profile
            .continuity_notes()
            .iter()
            .cloned()
            .chain(collect_note_lines(&options.static_continuity_overrides)),
    );

    let carry = history_size > 0;
    if !carry && (history_parameter.is_some() || promote_latest) {
        warn!(
            history_parameter = ?history_parameter,
            promote_latest,
            "Reference history size is zero; history parameter and promotion are ignored"
        );
    }

    let config = ContinuityConfig {
        identity_notes: identity_notes.clone(),
        supporting_character_notes: supporting_character_notes.clone(),
        static_continuity_notes: static_continuity_notes.clone(),
        carry_reference_image_forward: carry,
        reference_history_size: history_size,
        reference_history_parameter: history_parameter.filter(|_| carry),
        promote_latest_reference: carry && promote_latest,
        propagate_supporting_details: true,
        seed_policy: options.seed_policy.unwrap_or(defaults.seed_policy),
        vary_seed_per_page: options
            .vary_seed_per_page
            .unwrap_or(defaults.vary_seed_per_page),
        ..defaults
    };

    debug!(
        identity_lines = identity_lines.len(),
        supporting_characters = supporting_character_notes.len(),
        static_notes = static_continuity_notes.len(),
        "Continuity sources merged"
    );
    info!(
        carry_history = carry,
        history_size,
        automatic_identity = auto_identity_notes.is_some(),
        "Continuity config assembled"
    );

    ContinuityAssembly {
        config,
        identity_notes,
        auto_identity_notes,
        supporting_character_notes,
        static_continuity_notes,
    }
}
