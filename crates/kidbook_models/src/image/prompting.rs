//! Storybook illustration prompt.

use super::ImageRequest;
use kidbook_core::non_blank;
use kidbook_error::{KidbookResult, ValidationError, ValidationErrorKind};

/// Camera framing used when a page does not ask for one.
pub const DEFAULT_CAMERA_SHOT: &str =
    "medium (waist-up), eye-level, natural lens (~65mm), stable flattering perspective";

/// Guardrails against likeness and quality failures.
pub const NEGATIVE_PROMPT: &str = "identity drift, age change, plastic skin, uncanny valley, harsh shadows, blown highlights, excessive stylization, obscured face, cluttered background, watermark, text, logo";

/// Positive and negative prompt pair.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StorybookPrompt {
    /// What to render
    positive: String,
    /// What to avoid
    negative: String,
}

/// Build the prompt for one page illustration.
///
/// # Errors
///
/// Blank kid name or scene description.
///
/// # Examples
///
/// ```
/// use kidbook_models::{ImageRequest, build_storybook_prompt};
///
/// let request = ImageRequest::builder()
///     .kid_name("Mia")
///     .scene_description("Mia waves from a paper boat")
///     .continuity_notes(vec!["Pip the owl rides along".to_string()])
///     .build()
///     .unwrap();
///
/// let prompt = build_storybook_prompt(&request).unwrap();
/// assert!(prompt.positive().contains("storybook illustration of Mia"));
/// assert!(prompt.positive().contains("- Pip the owl rides along"));
/// ```
pub fn build_storybook_prompt(request: &ImageRequest) -> KidbookResult<StorybookPrompt> {
    let kid_name = non_blank(request.kid_name()).ok_or_else(|| {
        ValidationError::new(ValidationErrorKind::BlankPromptInput("kid_name".to_string()))
    })?;
    let scene = non_blank(request.scene_description()).ok_or_else(|| {
        ValidationError::new(ValidationErrorKind::BlankPromptInput(
            "scene_description".to_string(),
        ))
    })?;
    let shot = request
        .camera_shot()
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(DEFAULT_CAMERA_SHOT);

    let mut positive = format!(
        "TASK
Edit the input photo(s) to create a high-definition storybook illustration of {kid_name}, while strictly preserving the child's facial identity and age.

IDENTITY LOCK (do not change)
- Keep the same face shape, eye shape, nose, mouth, skin tone, hair color/style, and overall proportions as in the input image(s).
- Maintain age and ethnicity exactly. Do not beautify, slim, or exaggerate features. No caricature.
- Preserve the natural expression and personality cues from the reference (joy, curiosity, calm).

SCENE (apply to background, wardrobe, pose as needed - do not alter the face)
- {scene}
- Child remains the clear focal point; background supports the narrative without stealing focus.

ART DIRECTION - Pixar/Disney-like 3D cinematic realism
- Smooth but natural skin (not plastic), clean materials, stylized-real anatomy.
- Vivid, balanced color palette; storybook ambience; gentle bokeh (subtle depth-of-field).
- Camera: {shot}.

LIGHTING & MOOD
- Soft, radiant key light with warm rim light that creates a magical glow; believable soft shadowing.
- Wholesome, uplifting, imaginative mood; joyful and comforting.

ENVIRONMENT & WARDROBE
- Storybook background matching the scene (enchanted forest / cozy lantern-lit town / futuristic city / starry sky).
- Wardrobe consistent with the scene (e.g., small superhero cape, explorer outfit); no real-world logos or text.

RENDERING QUALITY
- Ultra-sharp, print-ready detail; premium filmic contrast; clean shading and reflections; 8K-ready upscale look.
- Composition keeps the child's face readable and instantly recognizable."
    );

    let optional = |value: &Option<String>| value.as_deref().and_then(non_blank).map(str::to_string);

    if let Some(theme) = optional(request.favorite_theme()) {
        push_section(&mut positive, "THEME", &[theme]);
    }
    let page_direction: Vec<String> = [
        ("Outfit", optional(request.outfit_description())),
        ("Expression", optional(request.facial_expression())),
        ("Pose", optional(request.pose_description())),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| format!("{}: {}", label, v)))
    .collect();
    push_section(&mut positive, "PAGE DIRECTION", &page_direction);

    if let Some(traits) = optional(request.identity_traits()) {
        let lines: Vec<String> = traits.lines().map(str::to_string).collect();
        push_section(&mut positive, "IDENTITY TRAITS (reinforce likeness)", &lines);
    }
    push_section(&mut positive, "CONTINUITY", request.continuity_notes());
    push_section(&mut positive, "SUPPORTING CAST", request.supporting_cast_notes());

    let negative = request
        .negative_prompt_override()
        .clone()
        .unwrap_or_else(|| NEGATIVE_PROMPT.to_string());

    Ok(StorybookPrompt { positive, negative })
}

/// Append a titled bullet section, skipping blank lines and empty sections.
fn push_section(prompt: &mut String, title: &str, lines: &[String]) {
    let bullets: Vec<String> = lines
        .iter()
        .filter_map(|line| non_blank(line))
        .map(|line| {
            let line = line.trim_start_matches(['-', ' ']);
            format!("- {}", line)
        })
        .collect();
    if bullets.is_empty() {
        return;
    }
    prompt.push_str("\n\n");
    prompt.push_str(title);
    prompt.push('\n');
    prompt.push_str(&bullets.join("\n"));
}
