//! Continuity options from the settings file and the command line.

use super::RunArgs;
use kidbook_continuity::ContinuityOptions;
use kidbook_error::{ConfigError, KidbookResult};
use serde::Deserialize;
use tracing::{debug, instrument};

/// The part of the settings file this module reads.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    continuity: ContinuityOptions,
}

/// Read the `[continuity]` table of the settings file, then apply flags.
///
/// Flags win over the file. A missing `[continuity]` table yields the
/// defaults.
///
/// # Errors
///
/// The settings file cannot be read or has values of the wrong type.
#[instrument(skip_all, fields(config = ?args.config))]
pub fn load_continuity_options(args: &RunArgs) -> KidbookResult<ContinuityOptions> {
    let mut builder = config::Config::builder();
    if let Some(path) = &args.config {
        builder = builder.add_source(config::File::from(path.as_path()).required(true));
    }

    let overrides: [(&str, Option<config::Value>); 4] = [
        (
            "continuity.reference_history_size",
            args.history_size.map(|size| (size as u64).into()),
        ),
        (
            "continuity.reference_history_parameter",
            args.history_parameter.clone().map(Into::into),
        ),
        (
            "continuity.promote_latest_reference",
            args.promote_latest.then(|| true.into()),
        ),
        (
            "continuity.automatic_identity_notes",
            args.no_identity_extraction.then(|| false.into()),
        ),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            builder = builder
                .set_override(key, value)
                .map_err(|e| ConfigError::new(format!("Invalid override for {}: {}", key, e)))?;
        }
    }

    let file: SettingsFile = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| ConfigError::new(format!("Failed to load continuity settings: {}", e)))?;

    debug!(options = ?file.continuity, "Continuity options resolved");
    Ok(file.continuity)
}
