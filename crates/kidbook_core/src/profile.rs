//! The child's profile: the single input that personalizes a storybook.

use crate::{SupportingCast, collect_note_lines, dedupe_case_insensitive};
use derive_getters::Getters;
use kidbook_error::{KidbookResult, ValidationError, ValidationErrorKind};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Raw key/value mapping a profile is parsed from (decoded YAML or JSON).
pub type RawMapping = Map<String, Value>;

const DEFAULT_STORY_LANGUAGE: &str = "English";

/// Canonical, validated representation of the child.
///
/// Built once per pipeline run with [`Profile::from_mapping`] and never
/// mutated afterwards.
///
/// # Examples
///
/// ```
/// use kidbook_core::Profile;
/// use serde_json::json;
///
/// let raw = json!({"name": " Mia ", "hobbies": "stargazing, painting", "language": "Spanish"});
/// let profile = Profile::from_mapping(raw.as_object().unwrap()).unwrap();
///
/// assert_eq!(profile.name(), "Mia");
/// assert_eq!(profile.hobbies(), &vec!["stargazing".to_string(), "painting".to_string()]);
/// assert_eq!(profile.story_language(), "Spanish");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Profile {
    /// Child's primary name
    name: String,
    /// Age in years
    age: Option<u32>,
    /// Gender or pronoun preference
    gender: Option<String>,
    /// Familiar nickname
    nickname: Option<String>,
    /// Hobbies and interests
    hobbies: Vec<String>,
    /// High-level adventure theme
    favorite_theme: Option<String>,
    /// Lesson or emotional takeaway for the ending
    desired_takeaway: Option<String>,
    /// Free-form notes
    personal_notes: Option<String>,
    /// Language the story is written in
    story_language: String,
    /// Parent or guardian name
    guardian_name: Option<String>,
    /// Declared physical identity traits
    identity_traits: Option<String>,
    /// Recurring supporting characters
    supporting_characters: SupportingCast,
    /// Always-on continuity reminders
    continuity_notes: Vec<String>,
}

impl Profile {
    /// Build a profile from a decoded mapping, accepting common field aliases.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `name` is missing or blank, when `age`
    /// is not an integer, or when a field has an unusable shape.
    #[instrument(skip(data), fields(keys = data.len()))]
    pub fn from_mapping(data: &RawMapping) -> KidbookResult<Self> {
        let name = data
            .get("name")
            .and_then(scalar_text)
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::MissingName))?;

        let profile = Self {
            name,
            age: coerce_age(data.get("age"))?,
            gender: optional_text(data, &["gender", "sex", "pronouns"])?,
            nickname: optional_text(data, &["nickname"])?,
            hobbies: normalize_hobbies(data.get("hobbies"))?,
            favorite_theme: optional_text(data, &["preferred_theme", "favorite_theme"])?,
            desired_takeaway: optional_text(data, &["desired_takeaway", "lesson"])?,
            personal_notes: optional_text(data, &["personal_notes"])?,
            story_language: optional_text(data, &["story_language", "language"])?
                .unwrap_or_else(|| DEFAULT_STORY_LANGUAGE.to_string()),
            guardian_name: optional_text(
                data,
                &["guardian_name", "parent_name", "caregiver_name"],
            )?,
            identity_traits: identity_traits(data)?,
            supporting_characters: supporting_characters(data)?,
            continuity_notes: continuity_notes(data.get("continuity_notes"))?,
        };

        debug!(
            name = %profile.name,
            hobbies = profile.hobbies.len(),
            supporting_characters = profile.supporting_characters.len(),
            continuity_notes = profile.continuity_notes.len(),
            "Parsed profile"
        );

        Ok(profile)
    }

    /// Bullet-friendly lines describing the child, for prompt conditioning.
    pub fn context_bullets(&self) -> Vec<String> {
        let mut bullets = vec![format!("Name: {}", self.name)];

        if let Some(nickname) = &self.nickname {
            bullets.push(format!("Nickname: {}", nickname));
        }
        if let Some(age) = self.age {
            bullets.push(format!("Age: {}", age));
        }
        if let Some(gender) = &self.gender {
            bullets.push(format!("Gender/pronouns: {}", gender));
        }
        if !self.hobbies.is_empty() {
            bullets.push(format!("Hobbies/interests: {}", self.hobbies.join(", ")));
        }
        if let Some(theme) = &self.favorite_theme {
            bullets.push(format!("Preferred theme: {}", theme));
        }
        if let Some(takeaway) = &self.desired_takeaway {
            bullets.push(format!("Desired takeaway: {}", takeaway));
        }
        if let Some(notes) = &self.personal_notes {
            bullets.push(format!("Special notes: {}", notes));
        }
        if let Some(guardian) = &self.guardian_name {
            bullets.push(format!("Guardian name: {}", guardian));
        }
        bullets.push(format!("Story language: {}", self.story_language));

        bullets
    }

    /// The profile as a `- ` bulleted block for LLM prompts.
    pub fn summary_for_prompt(&self) -> String {
        self.context_bullets()
            .iter()
            .map(|line| format!("- {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text form of a scalar value, trimmed; blank and null map to `None`.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A value counts as present when it is neither null nor blank text.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// First present value among `aliases`, coerced to text.
fn optional_text(data: &RawMapping, aliases: &[&str]) -> KidbookResult<Option<String>> {
    let Some((key, value)) = aliases
        .iter()
        .find_map(|key| data.get(*key).filter(|v| is_present(v)).map(|v| (*key, v)))
    else {
        return Ok(None);
    };

    match value {
        Value::Array(_) | Value::Object(_) => Err(ValidationError::new(
            ValidationErrorKind::InvalidProfileField {
                field: key.to_string(),
                message: "expected a text value".to_string(),
            },
        )
        .into()),
        other => Ok(scalar_text(other)),
    }
}

fn coerce_age(value: Option<&Value>) -> KidbookResult<Option<u32>> {
    let invalid = |v: &Value| ValidationError::new(ValidationErrorKind::InvalidAge(v.to_string()));

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| invalid(&Value::String(s.clone())).into()),
        Some(v @ Value::Number(n)) => {
            if let Some(age) = n.as_u64() {
                u32::try_from(age).map(Some).map_err(|_| invalid(v).into())
            } else if let Some(age) = n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
            {
                Ok(Some(age as u32))
            } else {
                Err(invalid(v).into())
            }
        }
        Some(other) => Err(invalid(other).into()),
    }
}

fn normalize_hobbies(value: Option<&Value>) -> KidbookResult<Vec<String>> {
    let parts: Vec<String> = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) => s.split(',').map(|p| p.trim().to_string()).collect(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => {
            return Err(
                ValidationError::new(ValidationErrorKind::InvalidHobbies(other.to_string())).into(),
            );
        }
    };
    Ok(parts.into_iter().filter(|p| !p.is_empty()).collect())
}

fn text_lines(field: &str, value: &Value) -> KidbookResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().filter_map(scalar_text).collect()),
        Value::Object(_) => Err(ValidationError::new(ValidationErrorKind::InvalidProfileField {
            field: field.to_string(),
            message: "expected text or a list of text".to_string(),
        })
        .into()),
        scalar => Ok(scalar_text(scalar).into_iter().collect()),
    }
}

fn identity_traits(data: &RawMapping) -> KidbookResult<Option<String>> {
    for key in ["identity_traits", "identity_notes", "appearance"] {
        if let Some(value) = data.get(key).filter(|v| is_present(v)) {
            let lines = text_lines(key, value)?;
            return Ok((!lines.is_empty()).then(|| lines.join("\n")));
        }
    }
    Ok(None)
}

fn supporting_characters(data: &RawMapping) -> KidbookResult<SupportingCast> {
    let mut cast = SupportingCast::default();
    let Some((field, value)) = ["supporting_characters", "supporting_cast"]
        .iter()
        .find_map(|key| data.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
    else {
        return Ok(cast);
    };

    match value {
        Value::Object(entries) => {
            for (name, description) in entries {
                if let Some(description) = scalar_text(description) {
                    cast.insert_trimmed(name, &description);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                let name = item.get("name").and_then(scalar_text);
                let description = item.get("description").and_then(scalar_text);
                if let (Some(name), Some(description)) = (name, description) {
                    cast.insert_trimmed(&name, &description);
                }
            }
        }
        _ => {
            return Err(ValidationError::new(ValidationErrorKind::InvalidProfileField {
                field: field.to_string(),
                message: "expected a mapping of names to descriptions".to_string(),
            })
            .into());
        }
    }

    Ok(cast)
}

fn continuity_notes(value: Option<&Value>) -> KidbookResult<Vec<String>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let lines = collect_note_lines(text_lines("continuity_notes", value)?);
    Ok(dedupe_case_insensitive(lines))
}
