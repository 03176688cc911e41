//! The final story package and its flat YAML/JSON form.

use crate::{ImageOutput, Profile, SceneDescription, StoryPage, ensure_contiguous};
use derive_getters::Getters;
use kidbook_error::{
    IoError, KidbookResult, SerializationError, ValidationError, ValidationErrorKind,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Everything produced for one page.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct PageAsset {
    /// Page text and title
    page: StoryPage,
    /// Scene brief the illustration was generated from
    scene: SceneDescription,
    /// Flattened image references, in generator order
    image_outputs: Vec<String>,
}

/// Aggregated output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct StoryPackage {
    /// The child the book was written for
    profile: Profile,
    /// Full story text as returned by the story writer
    story_markdown: String,
    /// Page assets ordered by page number
    pages: Vec<PageAsset>,
}

/// Flat serialized page record.
#[derive(Debug, Serialize)]
struct PageRecord<'a> {
    page_number: u32,
    title: &'a str,
    story_text: &'a str,
    scene_description: &'a str,
    supporting_details: &'a str,
    image_outputs: &'a [String],
}

/// Flat serialized package document.
#[derive(Debug, Serialize)]
struct PackageRecord<'a> {
    child_profile: &'a Profile,
    story_markdown: &'a str,
    pages: Vec<PageRecord<'a>>,
}

impl StoryPackage {
    fn record(&self) -> PackageRecord<'_> {
        PackageRecord {
            child_profile: &self.profile,
            story_markdown: &self.story_markdown,
            pages: self
                .pages
                .iter()
                .map(|asset| PageRecord {
                    page_number: *asset.page.page_number(),
                    title: asset.page.title(),
                    story_text: asset.page.story_text(),
                    scene_description: asset.scene.scene_description(),
                    supporting_details: asset.scene.supporting_details(),
                    image_outputs: &asset.image_outputs,
                })
                .collect(),
        }
    }

    /// Flat mapping with `child_profile`, `story_markdown` and `pages`.
    pub fn to_mapping(&self) -> KidbookResult<Value> {
        serde_json::to_value(self.record())
            .map_err(|e| SerializationError::json(format!("Failed to encode package: {}", e)).into())
    }

    /// Serialize as YAML, keeping field order.
    pub fn to_yaml(&self) -> KidbookResult<String> {
        serde_yaml::to_string(&self.record())
            .map_err(|e| SerializationError::yaml(format!("Failed to encode package: {}", e)).into())
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> KidbookResult<String> {
        serde_json::to_string_pretty(&self.record())
            .map_err(|e| SerializationError::json(format!("Failed to encode package: {}", e)).into())
    }

    /// Rebuild a package from its flat mapping.
    ///
    /// # Errors
    ///
    /// Fails when `child_profile` or `pages` is missing, when a page lacks a
    /// number, title or story text, or when page numbers are not 1..N.
    #[instrument(skip(payload))]
    pub fn from_mapping(payload: &Value) -> KidbookResult<Self> {
        let Some(payload) = payload.as_object() else {
            return Err(ValidationError::new(ValidationErrorKind::InvalidPackage(
                "payload must be a mapping".to_string(),
            ))
            .into());
        };

        let profile = match payload.get("child_profile") {
            Some(Value::Object(map)) => Profile::from_mapping(map)?,
            Some(_) => {
                return Err(ValidationError::new(ValidationErrorKind::InvalidPackage(
                    "'child_profile' must be a mapping".to_string(),
                ))
                .into());
            }
            None => return Err(missing_field("child_profile")),
        };

        let entries = match payload.get("pages") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(ValidationError::new(ValidationErrorKind::InvalidPackage(
                    "'pages' must be a list".to_string(),
                ))
                .into());
            }
            None => return Err(missing_field("pages")),
        };

        let story_markdown = payload
            .get("story_markdown")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        let pages = entries
            .iter()
            .map(page_from_entry)
            .collect::<KidbookResult<Vec<_>>>()?;
        ensure_contiguous(pages.iter().map(|asset| *asset.page.page_number()))?;

        debug!(pages = pages.len(), "Decoded story package");
        Ok(Self::new(profile, story_markdown, pages))
    }

    /// Parse a package from YAML text.
    pub fn from_yaml_str(text: &str) -> KidbookResult<Self> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| SerializationError::yaml(format!("Failed to parse package: {}", e)))?;
        Self::from_mapping(&value)
    }

    /// Load a package from a YAML file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> KidbookResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            IoError::new(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Write the package to a YAML file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_yaml_file(&self, path: impl AsRef<Path>) -> KidbookResult<()> {
        let yaml = self.to_yaml()?;
        std::fs::write(path.as_ref(), yaml).map_err(|e| {
            IoError::new(format!(
                "Failed to write {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        info!(pages = self.pages.len(), "Saved story package");
        Ok(())
    }
}

#[track_caller]
fn missing_field(field: &str) -> kidbook_error::KidbookError {
    ValidationError::new(ValidationErrorKind::MissingPackageField(field.to_string())).into()
}

fn page_from_entry(entry: &Value) -> KidbookResult<PageAsset> {
    let invalid = || ValidationError::new(ValidationErrorKind::InvalidPage(entry.to_string()));

    let page_number = entry
        .get("page_number")
        .and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(invalid)?;
    let title = required_text(entry, "title").ok_or_else(invalid)?;
    let story_text = required_text(entry, "story_text").ok_or_else(invalid)?;

    let optional = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let scene = SceneDescription::simple(
        page_number,
        optional("scene_description"),
        optional("supporting_details"),
    );
    let image_outputs = entry
        .get("image_outputs")
        .map(|raw| ImageOutput::from_json(raw).flatten())
        .unwrap_or_default();

    Ok(PageAsset::new(
        StoryPage::new(page_number, title, story_text),
        scene,
        image_outputs,
    ))
}

fn required_text(entry: &Value, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
