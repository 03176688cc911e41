//! `kidbook run`

use super::{RunArgs, load_continuity_options};
use kidbook_continuity::{ChatIdentityExtractor, IdentityExtractor};
use kidbook_error::{ConfigError, KidbookResult};
use kidbook_models::{ModelSettings, OpenAICompatibleClient, ReplicateImageGenerator};
use kidbook_pipeline::{Orchestrator, ProgressEvent, RunOptions};
use kidbook_story::{LlmPageSplitter, LlmSceneWriter, LlmStoryWriter};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Generate a storybook and write the package to `args.output`.
///
/// # Errors
///
/// Settings that cannot be loaded, missing credentials for a required
/// model, and any failure reported by the pipeline.
#[instrument(skip_all, fields(profile = %args.profile.display()))]
pub async fn handle_run_command(args: RunArgs) -> KidbookResult<()> {
    let settings = ModelSettings::load(args.config.as_deref())?;
    let continuity_options = load_continuity_options(&args)?;

    let story_client = OpenAICompatibleClient::from_settings(settings.story())?;
    let pages_client = OpenAICompatibleClient::from_settings(settings.pages())?;
    let scene_client = OpenAICompatibleClient::from_settings(settings.scene())?;
    let image_generator = ReplicateImageGenerator::from_settings(settings.image())?;

    let mut builder = Orchestrator::builder();
    builder
        .story_writer(Arc::new(LlmStoryWriter::new(
            story_client,
            settings.story().model().clone(),
        )))
        .page_splitter(Arc::new(LlmPageSplitter::new(
            pages_client,
            settings.pages().model().clone(),
        )))
        .scene_writer(Arc::new(LlmSceneWriter::new(
            scene_client,
            settings.scene().model().clone(),
        )))
        .image_generator(Arc::new(image_generator));

    if *continuity_options.automatic_identity_notes() {
        match OpenAICompatibleClient::from_settings(settings.identity()) {
            Ok(client) => {
                let extractor: Arc<dyn IdentityExtractor> = Arc::new(ChatIdentityExtractor::new(
                    client,
                    settings.identity().model().clone(),
                ));
                builder.identity_extractor(extractor);
            }
            Err(e) => warn!(error = %e, "Identity extraction disabled"),
        }
    }
    builder.continuity_options(continuity_options);

    let orchestrator = builder
        .build()
        .map_err(|e| ConfigError::new(format!("Failed to build orchestrator: {}", e)))?;

    let mut options = RunOptions::builder();
    options
        .reference_image(args.reference_image.clone())
        .image_args(args.image_args.iter().cloned().collect::<Map<_, _>>());
    if let Some(pages) = args.pages {
        options.desired_pages(pages);
    }
    let options = options
        .build()
        .map_err(|e| ConfigError::new(format!("Invalid run options: {}", e)))?;

    let mut log_progress = |event: &ProgressEvent| {
        let payload = Value::Object(event.payload().clone());
        info!(stage = %event.stage(), payload = %payload, "Progress");
    };

    let package = orchestrator
        .run_from_profile_file(&args.profile, &options, Some(&mut log_progress))
        .await?;

    package.write_yaml_file(&args.output)?;
    info!(
        output = %args.output.display(),
        pages = package.pages().len(),
        "Story package written"
    );
    Ok(())
}
