//! Argument definitions.

use super::image_args::parse_image_arg;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

/// Personalized storybooks with consistent illustrations.
#[derive(Parser, Debug)]
#[command(name = "kidbook")]
#[command(about = "Generate a personalized, illustrated storybook from a child profile")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write and illustrate a storybook
    Run(RunArgs),

    /// Validate a saved story package and print its pages
    Inspect {
        /// Path to a package YAML file
        package: PathBuf,
    },
}

/// Options for `kidbook run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Child profile (YAML or JSON)
    #[arg(short, long)]
    pub profile: PathBuf,

    /// Photo of the child: local path, URL or data URI
    #[arg(short, long)]
    pub reference_image: String,

    /// Where to write the story package
    #[arg(short, long, default_value = "kidbook_package.yaml")]
    pub output: PathBuf,

    /// Number of pages to ask for
    #[arg(long)]
    pub pages: Option<usize>,

    /// Extra image model argument, KEY=VALUE (repeatable)
    #[arg(long = "image-arg", value_name = "KEY=VALUE", value_parser = parse_image_arg)]
    pub image_args: Vec<(String, Value)>,

    /// Settings file (TOML) with model and continuity sections
    #[arg(short, long, env = "KIDBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// How many earlier illustrations to feed back as references
    #[arg(long)]
    pub history_size: Option<usize>,

    /// Image model argument that receives the earlier illustrations
    #[arg(long)]
    pub history_parameter: Option<String>,

    /// Use the latest illustration as the primary reference
    #[arg(long)]
    pub promote_latest: bool,

    /// Skip reading identity traits from the reference photo
    #[arg(long)]
    pub no_identity_extraction: bool,
}
