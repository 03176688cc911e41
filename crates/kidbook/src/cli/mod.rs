//! Command-line interface for the `kidbook` binary.

mod commands;
mod image_args;
mod inspect;
mod run;
mod settings;

pub use commands::{Cli, Commands, RunArgs};
pub use image_args::parse_image_arg;
pub use inspect::{handle_inspect_command, package_summary};
pub use run::handle_run_command;
pub use settings::load_continuity_options;
