//! Instruction text for the generation backends.
//!
//! Every builder here is pure and total. Each one embeds a content-boundary
//! clause naming what the backend must never produce, and telling it to drop
//! those parts of a user request silently instead of refusing outright.

pub mod design;
pub mod social;

pub use design::{artifact_prompt, rationale_prompt};
pub use social::{posts_prompt, social_image_prompt};

use crate::models::{EditInstruction, Flow, GenerationRequest, OutputVariant, RequestOptions};

/// Critique reply meaning "no edit needed".
pub const PERFECT_SENTINEL: &str = "PERFECT";

#[derive(Debug, Clone, Copy)]
pub struct ContentBoundary {
    pub scope: &'static str,
    pub prohibited: &'static [&'static str],
}

impl ContentBoundary {
    pub fn clause(&self, user_text: Option<&str>) -> String {
        let list = self
            .prohibited
            .iter()
            .map(|item| format!("    *   **{}**", item))
            .collect::<Vec<_>>()
            .join("\n");
        let source = match user_text {
            Some(text) => format!("the user's request (\"{}\")", text),
            None => "any part of the request".to_string(),
        };
        format!(
            "**CONTENT BOUNDARIES (NON-NEGOTIABLE):**\n\
*   **SCOPE:** {scope}\n\
*   **STRICTLY PROHIBITED CONTENT:** Never produce any of the following:\n\
{list}\n\
*   **SILENT OMISSION:** If {source} asks for anything prohibited above, leave that \
part out and complete the rest of the task. Do not refuse, apologise or mention the omission.",
            scope = self.scope,
        )
    }
}

pub const GENERIC_IMAGE_BOUNDARY: ContentBoundary = ContentBoundary {
    scope: "Work only on the subject of the provided image and its original instruction.",
    prohibited: &[
        "People or human-like figures (of any age).",
        "Text, captions or watermarks.",
        "Subject matter unrelated to the original instruction.",
    ],
};

pub const TEXT_BOUNDARY: ContentBoundary = ContentBoundary {
    scope: "Write only about the user's stated topic.",
    prohibited: &[
        "Personal data about private individuals.",
        "Hateful, harassing or sexually explicit content.",
        "Subject matter unrelated to the user's topic.",
    ],
};

/// Text-step prompt for whichever flow the request selects.
pub fn text_prompt(request: &GenerationRequest) -> String {
    match request.options {
        RequestOptions::Design { room_type, .. } => {
            rationale_prompt(request.trimmed_subject(), room_type)
        }
        RequestOptions::Social { tone, audience } => posts_prompt(
            request.trimmed_subject(),
            tone,
            audience,
            request.use_grounding,
        ),
    }
}

/// Image prompt for one output variant of the request.
pub fn image_prompt(
    request: &GenerationRequest,
    variant: OutputVariant,
    reference_style: Option<&str>,
) -> String {
    match request.options {
        RequestOptions::Design {
            room_type,
            style,
            lighting,
        } => artifact_prompt(
            request.trimmed_subject(),
            room_type,
            style,
            lighting,
            reference_style,
        ),
        RequestOptions::Social { tone, .. } => {
            social_image_prompt(request.trimmed_subject(), variant, tone, reference_style)
        }
    }
}

pub fn critique_prompt(original_prompt: &str) -> String {
    format!(
        r#"You are a meticulous, world-class art director. Rigorously compare the provided image against the prompt it was generated from. Find any deviation, flaw or missed opportunity and express the single most valuable fix as one precise, actionable command for an image-editing AI.

**Original Generation Prompt:**
---
{original_prompt}
---

**Review checklist (internal, do not show in output):**
1.  **Style adherence:** does the aesthetic match the requested style?
2.  **Concept accuracy:** are the key elements of the description present?
3.  **Realism and quality:** is the lighting believable, are materials rendered well, are there artifacts or odd proportions?
4.  **Composition:** is the framing appealing, could a small change improve it?

{boundary}
An image that shows prohibited content is flawed: the fix is to remove it.

**Output rules:**
*   Reply with exactly one of:
    1.  A single direct editing command if you found a flaw.
    2.  The exact word "{sentinel}" if the image meets every criterion.
*   No explanations, no conversational text.

**Examples:**
*   The prompt asked for a warm throw blanket but the blanket is cold blue. Output: Change the color of the throw blanket on the armchair to a warm, burnt orange.
*   The scene is too dark for "plenty of natural light". Output: Increase the natural light coming from the window to make the room brighter and airier.
*   Everything matches and looks great. Output: {sentinel}

Now review the provided image."#,
        boundary = GENERIC_IMAGE_BOUNDARY.clause(None),
        sentinel = PERFECT_SENTINEL,
    )
}

pub fn edit_prompt(instruction: &EditInstruction) -> String {
    let boundary = GENERIC_IMAGE_BOUNDARY.clause(None);
    match instruction {
        EditInstruction::Plain { prompt } => format!(
            "You are an expert AI image editor. Modify the provided image as follows: {}\n\n\
Keep everything the instruction does not mention unchanged and return only the edited image.\n\n{}",
            prompt.trim(),
            boundary
        ),
        EditInstruction::Annotated { comments, .. } => {
            let has_overlay = instruction.overlay().is_some();
            let comments_text = if comments.is_empty() {
                "No specific comments were provided; interpret the drawings on the overlay image."
                    .to_string()
            } else {
                comments
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        format!(
                            "- Comment {} (near x:{}%, y:{}%): \"{}\"",
                            i + 1,
                            c.x.round() as i64,
                            c.y.round() as i64,
                            c.text.trim()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            if !has_overlay {
                return format!(
                    r#"You are an expert AI image editor. Modify the provided image according to the user's comments. Each comment is anchored to a point given as a percentage of the image width and height.

**User's Comments:**
{comments_text}

Apply these edits precisely near the given points and return only the new version of the image.

{boundary}"#
                );
            }
            format!(
                r#"You are an expert AI image editor. Modify the provided base image according to the user's annotations.
The second image is a transparent overlay whose drawings mark the areas to change. The comments below give specific instructions.

**User's Comments:**
{comments_text}

Apply these edits precisely to the base image and return only the new version of the image. The drawings on the overlay are the primary guide for where to apply changes.

{boundary}"#
            )
        }
    }
}

pub fn reference_style_prompt(flow: Flow) -> String {
    let (role, subject) = match flow {
        Flow::Design => ("interior design consultant", "rooms"),
        Flow::Social => ("brand art director", "social media visuals"),
    };
    format!(
        r#"You are a world-class {role} and prompt engineer. Analyze the provided reference images of {subject} and write a detailed, prescriptive style guide that an image-generation AI will follow to reproduce the style with maximum fidelity.

**Analysis checklist (be specific):**
*   **Dominant color palette:** primary, secondary and accent colors by name (e.g. "sage green", "burnt orange"), never just "neutral".
*   **Forms and composition:** shapes, silhouettes, named styles where identifiable (e.g. Mid-Century Modern, Art Deco).
*   **Materials and textures:** list everything visible, e.g. "light oak wood", "bouclé fabric", "honed marble".
*   **Lighting:** quality and source, e.g. "diffuse indirect daylight", "warm low-level lamp light".
*   **Decorative elements and mood:** key accessories and the overall vibe.

**Output:** a detailed, comma-separated list of descriptive phrases written as a forceful style mandate, leaving the next AI no ambiguity.

{boundary}

Now analyze the provided reference images."#,
        boundary = GENERIC_IMAGE_BOUNDARY.clause(None),
    )
}

pub fn text_edit_prompt(original_text: &str, instruction: &str) -> String {
    format!(
        r#"You are an expert writer. Rewrite the following text so that it fulfils the instruction precisely.

**Original Text:**
"{original_text}"

**Instruction:**
"{instruction}"

{boundary}

Return ONLY the rewritten text. Do not add introductory phrases or markdown formatting."#,
        original_text = original_text.trim(),
        instruction = instruction.trim(),
        boundary = TEXT_BOUNDARY.clause(Some(instruction.trim())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, ImageData};

    #[test]
    fn test_critique_prompt_embeds_original_and_sentinel() {
        let prompt = critique_prompt("A sunny kitchen with copper pans");
        assert!(prompt.contains("A sunny kitchen with copper pans"));
        assert!(prompt.contains("\"PERFECT\""));
        assert!(prompt.contains("STRICTLY PROHIBITED CONTENT"));
    }

    #[test]
    fn test_annotated_edit_lists_comments_in_order() {
        let instruction = EditInstruction::annotated(
            ImageData::png(vec![0]),
            vec![
                Comment::new(12.4, 80.6, "Replace the rug"),
                Comment::new(50.5, 10.0, "Add a pendant lamp"),
            ],
        );
        let prompt = edit_prompt(&instruction);
        let first = prompt
            .find("- Comment 1 (near x:12%, y:81%): \"Replace the rug\"")
            .unwrap();
        let second = prompt
            .find("- Comment 2 (near x:51%, y:10%): \"Add a pendant lamp\"")
            .unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_annotated_edit_without_comments_defers_to_overlay() {
        let prompt = edit_prompt(&EditInstruction::annotated(ImageData::png(vec![0]), vec![]));
        assert!(prompt.contains("interpret the drawings on the overlay image"));
    }

    #[test]
    fn test_comments_only_edit_omits_overlay_wording() {
        let prompt = edit_prompt(&EditInstruction::annotated(
            ImageData::png(Vec::new()),
            vec![Comment::new(40.0, 40.0, "Add a rug")],
        ));
        assert!(prompt.contains("- Comment 1 (near x:40%, y:40%): \"Add a rug\""));
        assert!(!prompt.contains("overlay"));
        assert!(prompt.contains(&GENERIC_IMAGE_BOUNDARY.clause(None)));
    }

    #[test]
    fn test_every_generic_builder_has_boundary_clause() {
        let prompts = [
            critique_prompt("x"),
            edit_prompt(&EditInstruction::plain("make it blue")),
            reference_style_prompt(Flow::Design),
            reference_style_prompt(Flow::Social),
            text_edit_prompt("old", "shorter"),
        ];
        for prompt in prompts {
            assert!(prompt.contains("CONTENT BOUNDARIES"));
            assert!(prompt.contains("SILENT OMISSION"));
        }
    }
}
