//! Progress reporting.

use derive_getters::Getters;
use serde::Serialize;
use serde_json::{Map, Value};

/// Named transitions of a pipeline run, in the order they occur.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
pub enum PipelineStage {
    /// Profile input is being read
    #[serde(rename = "profile:parsing")]
    #[strum(serialize = "profile:parsing")]
    ProfileParsing,
    /// Profile validated
    #[serde(rename = "profile:ready")]
    #[strum(serialize = "profile:ready")]
    ProfileReady,
    /// Story writer called
    #[serde(rename = "story:generating")]
    #[strum(serialize = "story:generating")]
    StoryGenerating,
    /// Story text received
    #[serde(rename = "story:generated")]
    #[strum(serialize = "story:generated")]
    StoryGenerated,
    /// Page splitter called
    #[serde(rename = "pages:splitting")]
    #[strum(serialize = "pages:splitting")]
    PagesSplitting,
    /// Pages received
    #[serde(rename = "pages:ready")]
    #[strum(serialize = "pages:ready")]
    PagesReady,
    /// A page is being illustrated
    #[serde(rename = "page:processing")]
    #[strum(serialize = "page:processing")]
    PageProcessing,
    /// A page is finished
    #[serde(rename = "page:done")]
    #[strum(serialize = "page:done")]
    PageDone,
    /// Assets are being packaged
    #[serde(rename = "pipeline:packaging")]
    #[strum(serialize = "pipeline:packaging")]
    PipelinePackaging,
    /// Package ready
    #[serde(rename = "pipeline:complete")]
    #[strum(serialize = "pipeline:complete")]
    PipelineComplete,
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, derive_new::new)]
pub struct ProgressEvent {
    /// Which transition happened
    stage: PipelineStage,
    /// Small structured detail, such as page number or word count
    payload: Map<String, Value>,
}

/// Caller hook invoked for every [`ProgressEvent`].
///
/// Purely observational: a run produces the same package with or without it.
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(&ProgressEvent) + Send);

/// Emits events to an optional callback and to the trace log.
pub(crate) struct Progress<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(callback: Option<ProgressCallback<'a>>) -> Self {
        Self { callback }
    }

    pub(crate) fn notify(&mut self, stage: PipelineStage, payload: Value) {
        let payload = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        tracing::debug!(stage = %stage, payload = ?payload, "Pipeline progress");

        if let Some(callback) = self.callback.as_deref_mut() {
            callback(&ProgressEvent::new(stage, payload));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_match_wire_names() {
        assert_eq!(PipelineStage::ProfileParsing.to_string(), "profile:parsing");
        assert_eq!(PipelineStage::PageDone.as_ref(), "page:done");
        assert_eq!(
            serde_json::to_value(PipelineStage::PipelineComplete).unwrap(),
            "pipeline:complete"
        );
    }

    #[test]
    fn absent_callback_is_a_no_op() {
        let mut progress = Progress::new(None);
        progress.notify(PipelineStage::StoryGenerating, serde_json::json!({}));
    }
}
