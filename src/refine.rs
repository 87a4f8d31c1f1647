use crate::{
    client::GenerationClient,
    error::Result,
    models::{AspectRatio, EditInstruction, ImageData, ImageQuality},
    prompts::{critique_prompt, PERFECT_SENTINEL},
};

/// What the critique step decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refined {
    Accepted,
    Edited { instruction: String },
}

#[derive(Debug, Clone)]
pub struct RefinedImage {
    pub image: ImageData,
    pub outcome: Refined,
}

/// Generate, critique, and apply at most one corrective edit.
///
/// The edited image is never critiqued again. A failing edit fails the whole
/// run rather than falling back to the unedited base.
pub struct RefinementLoop<'a> {
    client: &'a dyn GenerationClient,
}

impl<'a> RefinementLoop<'a> {
    pub fn new(client: &'a dyn GenerationClient) -> Self {
        Self { client }
    }

    pub async fn run(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        quality: ImageQuality,
    ) -> Result<RefinedImage> {
        let base = self
            .client
            .generate_image(prompt, aspect_ratio, quality)
            .await?;

        let critique = self
            .client
            .analyze_image(&base, &critique_prompt(prompt))
            .await?;

        if is_perfect(&critique) {
            log::debug!("Critique accepted the {} image as generated", aspect_ratio);
            return Ok(RefinedImage {
                image: base,
                outcome: Refined::Accepted,
            });
        }

        let instruction = critique.trim().to_string();
        log::info!("Refining {} image: {}", aspect_ratio, instruction);
        let edited = self
            .client
            .edit_image(&base, &EditInstruction::plain(instruction.clone()))
            .await?;

        Ok(RefinedImage {
            image: edited,
            outcome: Refined::Edited { instruction },
        })
    }
}

pub fn is_perfect(critique: &str) -> bool {
    critique.trim().eq_ignore_ascii_case(PERFECT_SENTINEL)
}
