//! End-to-end storybook runs.

use crate::arguments::{merge_image_args, take_camera_shot};
use crate::events::{PipelineStage, Progress, ProgressCallback};
use crate::loader::load_profile_mapping;
use derive_builder::Builder;
use derive_getters::Getters;
use kidbook_continuity::{
    ContinuityConfig, ContinuityOptions, ContinuityState, GenerationDirectives, IdentityExtractor,
    assemble_continuity_config,
};
use kidbook_core::{
    PageAsset, Profile, RawMapping, SceneDescription, StoryPackage, StoryPage, non_blank,
};
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind};
use kidbook_models::{ImageGenerator, ImageRequest};
use kidbook_story::{PageSplitter, SceneWriter, StoryWriter};
use serde_json::{Map, Value, json};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Per-run inputs that are not part of the profile.
#[derive(Debug, Clone, PartialEq, Default, Getters, Builder)]
#[builder(setter(into))]
pub struct RunOptions {
    /// Page count to ask the splitter for; its default when unset
    #[builder(default, setter(into, strip_option))]
    desired_pages: Option<usize>,
    /// The child's photo: URL, data URI or local path
    reference_image: String,
    /// Extra image model arguments applied to every page
    #[builder(default)]
    image_args: Map<String, Value>,
}

impl RunOptions {
    /// Creates a new builder for RunOptions.
    pub fn builder() -> RunOptionsBuilder {
        RunOptionsBuilder::default()
    }
}

/// Chains the story, page, scene and image collaborators into one run.
///
/// Pages are processed strictly in order; each page's directives depend on
/// the continuity state left by the pages before it. The first error from
/// any collaborator ends the run.
#[derive(Clone, Builder)]
pub struct Orchestrator {
    /// Writes the full story
    story_writer: Arc<dyn StoryWriter>,
    /// Cuts the story into pages
    page_splitter: Arc<dyn PageSplitter>,
    /// Writes each page's scene brief
    scene_writer: Arc<dyn SceneWriter>,
    /// Renders each page
    image_generator: Arc<dyn ImageGenerator>,
    /// Continuity policy used when no per-run assembly is configured
    #[builder(default)]
    continuity_config: ContinuityConfig,
    /// When set, the continuity policy is assembled per run from the profile
    #[builder(default, setter(strip_option))]
    continuity_options: Option<ContinuityOptions>,
    /// Identity extractor used by per-run assembly
    #[builder(default, setter(strip_option))]
    identity_extractor: Option<Arc<dyn IdentityExtractor>>,
}

impl Orchestrator {
    /// Creates a new builder for Orchestrator.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// The fixed continuity policy.
    pub fn continuity_config(&self) -> &ContinuityConfig {
        &self.continuity_config
    }

    /// Run the pipeline from an in-memory profile mapping.
    ///
    /// # Errors
    ///
    /// Profile validation failures and collaborator errors end the run; no
    /// partial package is produced.
    #[instrument(skip_all, fields(reference = %options.reference_image))]
    pub async fn run_from_profile_mapping(
        &self,
        mapping: &RawMapping,
        options: &RunOptions,
        callback: Option<ProgressCallback<'_>>,
    ) -> KidbookResult<StoryPackage> {
        let mut progress = Progress::new(callback);
        progress.notify(PipelineStage::ProfileParsing, json!({"source": "mapping"}));
        self.run_parsed(mapping, options, &mut progress).await
    }

    /// Run the pipeline from a YAML or JSON profile file.
    ///
    /// # Errors
    ///
    /// In addition to the mapping errors, unknown file extensions and
    /// unreadable or malformed files are rejected before any model call.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn run_from_profile_file(
        &self,
        path: &Path,
        options: &RunOptions,
        callback: Option<ProgressCallback<'_>>,
    ) -> KidbookResult<StoryPackage> {
        let mut progress = Progress::new(callback);
        progress.notify(
            PipelineStage::ProfileParsing,
            json!({"source": path.display().to_string()}),
        );
        let mapping = load_profile_mapping(path)?;
        self.run_parsed(&mapping, options, &mut progress).await
    }

    async fn run_parsed(
        &self,
        mapping: &RawMapping,
        options: &RunOptions,
        progress: &mut Progress<'_>,
    ) -> KidbookResult<StoryPackage> {
        let profile = Profile::from_mapping(mapping)?;
        progress.notify(
            PipelineStage::ProfileReady,
            json!({"name": profile.name(), "story_language": profile.story_language()}),
        );

        progress.notify(PipelineStage::StoryGenerating, json!({}));
        let story = self.story_writer.write_story(&profile).await?;
        progress.notify(
            PipelineStage::StoryGenerated,
            json!({"word_count": story.split_whitespace().count()}),
        );

        progress.notify(PipelineStage::PagesSplitting, json!({}));
        let pages = self
            .page_splitter
            .split_story(&story, &profile, options.desired_pages)
            .await?;
        progress.notify(PipelineStage::PagesReady, json!({"total_pages": pages.len()}));

        let config = self.resolve_continuity(&profile, &options.reference_image).await;
        let assets = self
            .illustrate_pages(&profile, &pages, options, config, progress)
            .await?;

        let summary = json!({"total_pages": assets.len(), "profile_name": profile.name()});
        progress.notify(PipelineStage::PipelinePackaging, summary.clone());
        let package = StoryPackage::new(profile, story, assets);
        progress.notify(PipelineStage::PipelineComplete, summary);

        info!(pages = package.pages().len(), "Storybook complete");
        Ok(package)
    }

    async fn resolve_continuity(&self, profile: &Profile, reference_image: &str) -> ContinuityConfig {
        match &self.continuity_options {
            Some(options) => assemble_continuity_config(
                profile,
                reference_image,
                options,
                self.identity_extractor.as_deref(),
            )
            .await
            .into_config(),
            None => self.continuity_config.clone(),
        }
    }

    async fn illustrate_pages(
        &self,
        profile: &Profile,
        pages: &[StoryPage],
        options: &RunOptions,
        config: ContinuityConfig,
        progress: &mut Progress<'_>,
    ) -> KidbookResult<Vec<PageAsset>> {
        let total_pages = pages.len();
        let mut state = ContinuityState::new(profile, &options.reference_image, config);
        let mut assets = Vec::with_capacity(total_pages);

        for (index, page) in pages.iter().enumerate() {
            let page_index = index + 1;
            progress.notify(
                PipelineStage::PageProcessing,
                json!({
                    "page_number": page.page_number(),
                    "page_index": page_index,
                    "total_pages": total_pages,
                    "title": page.title(),
                }),
            );

            let scene = self.scene_writer.page_to_scene(page, profile).await?;
            let directives = state.build_directives(&scene, *page.page_number());
            let mut args = merge_image_args(&options.image_args, &directives);
            let camera_shot = take_camera_shot(&mut args);

            let request = image_request(profile, &scene, &directives, camera_shot, args)?;
            let image_outputs = self.image_generator.generate(&request).await?.flatten();
            debug!(
                page = page.page_number(),
                outputs = image_outputs.len(),
                "Page illustrated"
            );

            state.record_generation(&scene, &image_outputs);
            assets.push(PageAsset::new(page.clone(), scene, image_outputs));

            progress.notify(
                PipelineStage::PageDone,
                json!({
                    "page_number": page.page_number(),
                    "page_index": page_index,
                    "total_pages": total_pages,
                }),
            );
        }

        Ok(assets)
    }
}

fn image_request(
    profile: &Profile,
    scene: &SceneDescription,
    directives: &GenerationDirectives,
    camera_shot: Option<String>,
    extra: Map<String, Value>,
) -> KidbookResult<ImageRequest> {
    let mut builder = ImageRequest::builder();
    builder
        .kid_name(profile.name().clone())
        .scene_description(scene.scene_description().clone())
        .input_image(directives.primary_reference_image().clone())
        .continuity_notes(directives.continuity_notes().clone())
        .supporting_cast_notes(directives.supporting_cast_notes().clone())
        .extra(extra);

    if let Some(shot) = camera_shot {
        builder.camera_shot(shot);
    }
    if let Some(theme) = profile.favorite_theme() {
        builder.favorite_theme(theme.clone());
    }
    if let Some(identity) = directives.identity_notes() {
        builder.identity_traits(identity.clone());
    }
    if let Some(outfit) = non_blank(scene.outfit_description()) {
        builder.outfit_description(outfit);
    }
    if let Some(expression) = non_blank(scene.facial_expression()) {
        builder.facial_expression(expression);
    }
    if let Some(pose) = non_blank(scene.pose_description()) {
        builder.pose_description(pose);
    }

    builder
        .build()
        .map_err(|e| ModelError::new(ModelErrorKind::InvalidRequest(e.to_string())).into())
}
