//! Page-to-page continuity state and the directive resolver.

use crate::directives::{GenerationDirectives, SEED_OVERRIDE_KEY};
use crate::{ContinuityConfig, resolve_base_seed, seed_for_page};
use kidbook_core::{Profile, SceneDescription, non_blank};
use serde_json::{Map, Value};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, instrument, trace};

/// Supporting detail lines longer than this are shortened.
pub const MAX_DETAIL_CHARS: usize = 220;

const DETAIL_TRUNCATED_CHARS: usize = MAX_DETAIL_CHARS - 3;

fn is_detail_noise(c: char) -> bool {
    matches!(c, ' ' | '\t' | '-' | '•' | '—')
}

/// Break supporting detail text into short bullet fragments.
///
/// Text without any line structure becomes a single line. Lines longer than
/// [`MAX_DETAIL_CHARS`] are cut and end with `…`.
///
/// # Examples
///
/// ```
/// use kidbook_continuity::summarize_supporting_details;
///
/// let lines = summarize_supporting_details("- Pip the owl\r\n• red kite\n\n");
/// assert_eq!(lines, vec!["Pip the owl", "red kite"]);
/// assert!(summarize_supporting_details("   ").is_empty());
/// ```
pub fn summarize_supporting_details(details: &str) -> Vec<String> {
    let Some(trimmed) = non_blank(details) else {
        return Vec::new();
    };

    let mut lines: Vec<&str> = details
        .split(['\r', '\n'])
        .map(|raw| raw.trim_matches(is_detail_noise))
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        lines.push(trimmed);
    }

    lines
        .into_iter()
        .map(|line| {
            if line.chars().count() > MAX_DETAIL_CHARS {
                let cut: String = line.chars().take(DETAIL_TRUNCATED_CHARS).collect();
                format!("{}…", cut.trim_end())
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Push to the front of a bounded buffer, dropping from the back.
fn push_front_bounded(buffer: &mut VecDeque<String>, capacity: usize, item: String) {
    if capacity == 0 {
        return;
    }
    buffer.push_front(item);
    buffer.truncate(capacity);
}

/// Mutable continuity state for one pipeline run.
///
/// Owned by the orchestrator loop. For each page, in increasing page order,
/// call [`build_directives`](Self::build_directives) then
/// [`record_generation`](Self::record_generation).
#[derive(Debug, Clone)]
pub struct ContinuityState {
    config: ContinuityConfig,
    base_reference_image: String,
    identity_notes: Option<String>,
    base_seed: Option<u64>,
    reference_history: VecDeque<String>,
    supporting_history: VecDeque<String>,
}

impl ContinuityState {
    /// Start a run for `profile` anchored on `base_reference_image`.
    ///
    /// Identity text and the base seed are resolved here, once.
    #[instrument(skip(profile, config), fields(child = %profile.name()))]
    pub fn new(profile: &Profile, base_reference_image: &str, config: ContinuityConfig) -> Self {
        let identity_notes = config
            .identity_notes()
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string)
            .or_else(|| {
                let lines: Vec<String> = profile
                    .context_bullets()
                    .iter()
                    .filter_map(|line| non_blank(line).map(str::to_string))
                    .collect();
                (!lines.is_empty()).then(|| lines.join("\n"))
            });
        let base_seed = resolve_base_seed(config.seed_policy(), profile, base_reference_image);

        if *config.carry_reference_image_forward() && *config.reference_history_size() == 0 {
            debug!("Reference history has zero capacity; carrying is inactive");
        }
        debug!(
            base_seed,
            carries_history = config.carries_history(),
            history_size = config.reference_history_size(),
            "Continuity state ready"
        );

        Self {
            reference_history: VecDeque::with_capacity(*config.reference_history_size()),
            supporting_history: VecDeque::with_capacity(*config.supporting_details_history()),
            base_reference_image: base_reference_image.to_string(),
            identity_notes,
            base_seed,
            config,
        }
    }

    /// Resolve the directives for `page_number`.
    ///
    /// Continuity notes keep their first occurrence; later repeats are
    /// dropped regardless of case.
    #[instrument(skip(self, scene))]
    pub fn build_directives(&self, scene: &SceneDescription, page_number: u32) -> GenerationDirectives {
        let identity_notes = self
            .identity_notes
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string);

        let carried = self
            .config
            .propagate_supporting_details()
            .then_some(&self.supporting_history)
            .into_iter()
            .flatten()
            .cloned();
        let mut seen = HashSet::new();
        let continuity_notes: Vec<String> = self
            .config
            .static_continuity_notes()
            .iter()
            .filter_map(|note| non_blank(note).map(str::to_string))
            .chain(carried)
            .chain(summarize_supporting_details(scene.supporting_details()))
            .filter(|note| seen.insert(note.to_lowercase()))
            .collect();

        let supporting_cast_notes = self
            .config
            .supporting_character_notes()
            .iter()
            .filter_map(|(name, description)| {
                Some(format!("{}: {}", non_blank(name)?, non_blank(description)?))
            })
            .collect();

        let carries = self.config.carries_history();
        let mut primary = self.base_reference_image.clone();
        let mut additional = Vec::new();
        if carries {
            let mut candidates: Vec<String> = self.reference_history.iter().cloned().collect();
            if *self.config.promote_latest_reference() && !candidates.is_empty() {
                primary = candidates.remove(0);
                if !candidates.contains(&self.base_reference_image) {
                    candidates.push(self.base_reference_image.clone());
                }
            }
            additional = candidates;
        }

        let reference_history_parameter = if carries {
            self.config.reference_history_parameter().clone()
        } else {
            None
        };

        let mut model_overrides = Map::new();
        if let Some(seed) = self.seed_for_page(page_number) {
            model_overrides.insert(SEED_OVERRIDE_KEY.to_string(), Value::from(seed));
        }

        debug!(
            primary = %primary,
            additional = additional.len(),
            continuity_notes = continuity_notes.len(),
            "Resolved page directives"
        );

        GenerationDirectives::new(
            primary,
            additional,
            identity_notes,
            continuity_notes,
            supporting_cast_notes,
            reference_history_parameter,
            model_overrides,
        )
    }

    /// Fold a finished page back into the history buffers.
    ///
    /// Only the first non-blank output is remembered as a reference, even
    /// when the generator produced several images.
    #[instrument(skip(self, scene, image_outputs), fields(page = scene.page_number(), outputs = image_outputs.len()))]
    pub fn record_generation(&mut self, scene: &SceneDescription, image_outputs: &[String]) {
        if *self.config.propagate_supporting_details() {
            let capacity = *self.config.supporting_details_history();
            for line in summarize_supporting_details(scene.supporting_details()) {
                let key = line.to_lowercase();
                if !self
                    .supporting_history
                    .iter()
                    .any(|seen| seen.to_lowercase() == key)
                {
                    push_front_bounded(&mut self.supporting_history, capacity, line);
                }
            }
        }

        if !self.config.carries_history() {
            return;
        }

        if let Some(anchor) = image_outputs.iter().find_map(|output| non_blank(output)) {
            if self.reference_history.iter().any(|seen| seen == anchor) {
                trace!(anchor, "Reference already in history");
            } else {
                push_front_bounded(
                    &mut self.reference_history,
                    *self.config.reference_history_size(),
                    anchor.to_string(),
                );
            }
        }
    }

    /// Seed for `page_number` under this run's policy.
    pub fn seed_for_page(&self, page_number: u32) -> Option<u64> {
        seed_for_page(
            self.base_seed,
            self.config.seed_policy(),
            *self.config.vary_seed_per_page(),
            page_number,
        )
    }

    /// Base seed resolved at construction.
    pub fn base_seed(&self) -> Option<u64> {
        self.base_seed
    }

    /// Remembered reference images, most recent first.
    pub fn reference_history(&self) -> &VecDeque<String> {
        &self.reference_history
    }

    /// Carried supporting detail lines, most recent first.
    pub fn supporting_history(&self) -> &VecDeque<String> {
        &self.supporting_history
    }

    /// The configuration this state was built with.
    pub fn config(&self) -> &ContinuityConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_lines_are_truncated_with_ellipsis() {
        let long = "a".repeat(300);
        let lines = summarize_supporting_details(&long);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].chars().count(), DETAIL_TRUNCATED_CHARS + 1);
        assert!(lines[0].ends_with('…'));
    }

    #[test]
    fn exactly_max_length_is_kept() {
        let line = "b".repeat(MAX_DETAIL_CHARS);
        assert_eq!(summarize_supporting_details(&line), vec![line]);
    }

    #[test]
    fn dash_only_text_is_kept_whole() {
        assert_eq!(summarize_supporting_details(" --- "), vec!["---"]);
    }

    #[test]
    fn bounded_push_drops_oldest() {
        let mut buffer = VecDeque::new();
        for item in ["a", "b", "c"] {
            push_front_bounded(&mut buffer, 2, item.to_string());
        }
        assert_eq!(buffer, VecDeque::from(vec!["c".to_string(), "b".to_string()]));

        push_front_bounded(&mut buffer, 0, "d".to_string());
        assert_eq!(buffer.len(), 2);
    }
}
