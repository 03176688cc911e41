//! Normalization helpers for bullet-style note text.

use std::collections::HashSet;

/// Characters stripped from both ends of a note line.
fn is_bullet_noise(c: char) -> bool {
    matches!(c, ' ' | '\t' | '-' | '•' | '—')
}

/// Split note sources into cleaned, non-blank lines.
///
/// Each source may hold several lines. Carriage returns count as line breaks
/// and bullet markers are stripped from both ends of every line.
///
/// # Examples
///
/// ```
/// use kidbook_core::collect_note_lines;
///
/// let lines = collect_note_lines(["- Curly hair\r\n• Freckles", "", "Green eyes"]);
/// assert_eq!(lines, vec!["Curly hair", "Freckles", "Green eyes"]);
/// ```
pub fn collect_note_lines<I, S>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sources
        .into_iter()
        .flat_map(|source| {
            source
                .as_ref()
                .replace('\r', "\n")
                .split('\n')
                .map(|raw| raw.trim_matches(is_bullet_noise).to_string())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Remove case-insensitive duplicates, keeping the first occurrence and its casing.
///
/// # Examples
///
/// ```
/// use kidbook_core::dedupe_case_insensitive;
///
/// let notes = dedupe_case_insensitive(["Wears red cap", "wears red cap", "Carries a kite"]);
/// assert_eq!(notes, vec!["Wears red cap", "Carries a kite"]);
/// ```
pub fn dedupe_case_insensitive<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for item in items {
        let item = item.into();
        if seen.insert(item.to_lowercase()) {
            ordered.push(item);
        }
    }
    ordered
}

/// Trim text and map blank results to `None`.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
