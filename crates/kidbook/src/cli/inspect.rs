//! `kidbook inspect`

use kidbook_core::StoryPackage;
use kidbook_error::KidbookResult;
use std::path::Path;
use tracing::instrument;

/// Load a package file and print one line per page.
///
/// # Errors
///
/// The file is missing, not YAML, or fails package validation.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn handle_inspect_command(path: &Path) -> KidbookResult<()> {
    let package = StoryPackage::from_yaml_file(path)?;
    println!("{}", package_summary(&package));
    Ok(())
}

/// Human-readable listing of a package.
pub fn package_summary(package: &StoryPackage) -> String {
    let mut lines = vec![format!(
        "{} ({} pages)",
        package.profile().name(),
        package.pages().len()
    )];
    for asset in package.pages() {
        let page = asset.page();
        lines.push(format!(
            "  {:>2}. {} [{} image(s)]",
            page.page_number(),
            page.title(),
            asset.image_outputs().len()
        ));
    }
    lines.join("\n")
}
