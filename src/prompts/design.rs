use super::{ContentBoundary, TEXT_BOUNDARY};
use crate::models::{DecorStyle, Lighting, RoomType};

pub const INTERIOR_BOUNDARY: ContentBoundary = ContentBoundary {
    scope: "You are an interior design AI. Your sole function is to depict room interiors, furniture and decor.",
    prohibited: &[
        "Humans or human-like figures (of any age).",
        "Animals or pets.",
        "Logos, brands, or copyrighted materials.",
        "Text or watermarks.",
        "Exterior scenes or landscapes.",
        "Vehicles.",
        "Food items.",
        "Any subject matter that is not directly related to interior design.",
    ],
};

pub fn rationale_prompt(description: &str, room_type: RoomType) -> String {
    format!(
        r#"You are an expert interior designer and writer. Turn the user's description of a room into a clear, concise and inspiring design rationale.

**User's Vision:** "{description}"
**Room Type:** {room_type}

**Instructions:**
1.  Work out the desired mood, functionality and key elements from the user's vision.
2.  Cover the color palette, furniture choices, lighting and material textures in a logical order.
3.  Explain why these choices work together to reach the user's aesthetic and functional goals.
4.  Use evocative, descriptive language that complements a visual rendering of the room.

{boundary}

Return ONLY the design rationale."#,
        boundary = TEXT_BOUNDARY.clause(Some(description)),
    )
}

/// Image prompt for the single design variant.
///
/// A reference style digest, when present, is declared the overriding
/// instruction and the generic decor style is demoted to a fallback.
pub fn artifact_prompt(
    description: &str,
    room_type: RoomType,
    style: DecorStyle,
    lighting: Lighting,
    reference_style: Option<&str>,
) -> String {
    let style_rule = match reference_style {
        Some(digest) => format!(
            "4.  **CRITICAL STYLE MANDATE:** The following style guide, derived from reference images, \
is the most important instruction. Adhere to it strictly; it OVERRIDES the general '{}' decor style \
wherever they conflict. The aesthetic MUST be an exact match. Style Guide: **{}**",
            style,
            digest.trim()
        ),
        None => format!("4.  The primary decor style MUST be: **{}**.", style),
    };

    format!(
        r#"**Primary Task:** Generate a single, high-quality, photorealistic image of a room's interior design. Your capabilities are strictly limited to creating images of interior spaces and decor.

**Instructions:**
1.  You are an expert interior design visualizer. Your ONLY output must be a single image of a room.
2.  The room concept is: "{description}".
3.  The room type MUST be: **{room_type}**.
{style_rule}
5.  The lighting MUST be: **{lighting}** ({lighting_note})
6.  The image must be a beautifully composed, well-lit, realistic interior photograph with attention to textures, shadows and how light falls on surfaces.

{boundary}

**IMAGE QUALITY:**
*   **AVOID:** distorted perspectives, unrealistic proportions, blurry results.
*   **ENSURE:** a clean, aspirational, high-resolution result that looks like a photograph from an architecture magazine.

Based on these strict instructions, generate the interior design image."#,
        lighting_note = lighting.description(),
        boundary = INTERIOR_BOUNDARY.clause(Some(description)),
    )
}
