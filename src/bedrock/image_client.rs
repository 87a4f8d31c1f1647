use super::invoke_json;
use crate::{
    error::{Result, StudioError},
    models::{AspectRatio, EditInstruction, ImageData, ImageQuality, StabilityImageResponse},
    prompts,
};
use aws_sdk_bedrockruntime::Client;
use serde_json::{json, Value};

const EDIT_MODEL: &str = "stability.sd3-5-large-v1:0";
const EDIT_STRENGTH: f64 = 0.6;

/// Stability image models on Bedrock.
#[derive(Clone)]
pub struct BedrockImageClient {
    client: Client,
}

impl BedrockImageClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn model_for(quality: ImageQuality) -> &'static str {
        match quality {
            ImageQuality::Ultra => "stability.stable-image-ultra-v1:1",
            ImageQuality::Balanced => "stability.sd3-5-large-v1:0",
            ImageQuality::Fastest => "stability.stable-image-core-v1:1",
        }
    }

    /// Stability has no 3:4, so tall portraits use the nearest supported ratio.
    pub fn stability_ratio(aspect_ratio: AspectRatio) -> &'static str {
        match aspect_ratio {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::PortraitTall => "4:5",
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        quality: ImageQuality,
    ) -> Result<ImageData> {
        let model_id = Self::model_for(quality);
        let payload = json!({
            "prompt": prompt,
            "aspect_ratio": Self::stability_ratio(aspect_ratio),
            "output_format": "png",
        });

        log::info!("Generating {} image with model: {}", aspect_ratio, model_id);
        let response: StabilityImageResponse = invoke_json(&self.client, model_id, &payload).await?;
        first_image(response, model_id)
    }

    pub async fn edit(&self, base: &ImageData, instruction: &EditInstruction) -> Result<ImageData> {
        let payload = build_edit_payload(base, instruction)?;
        log::info!("Editing image with model: {}", EDIT_MODEL);
        let response: StabilityImageResponse =
            invoke_json(&self.client, EDIT_MODEL, &payload).await?;
        first_image(response, EDIT_MODEL)
    }
}

/// Stability cannot read an overlay layer, so annotated edits are reduced to
/// their comment text.
fn edit_instruction_text(instruction: &EditInstruction) -> Result<String> {
    match instruction {
        EditInstruction::Plain { .. } => Ok(prompts::edit_prompt(instruction)),
        EditInstruction::Annotated { comments, .. } => {
            if instruction.overlay().is_some() {
                log::warn!("{} ignores annotation overlays; using comments only", EDIT_MODEL);
            }
            let joined = comments
                .iter()
                .map(|c| c.text.trim())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(". ");
            if joined.is_empty() {
                return Err(StudioError::generation(format!(
                    "{} cannot apply an overlay without comments",
                    EDIT_MODEL
                )));
            }
            Ok(prompts::edit_prompt(&EditInstruction::plain(joined)))
        }
    }
}

fn build_edit_payload(base: &ImageData, instruction: &EditInstruction) -> Result<Value> {
    Ok(json!({
        "prompt": edit_instruction_text(instruction)?,
        "mode": "image-to-image",
        "image": base.to_base64(),
        "strength": EDIT_STRENGTH,
        "output_format": "png",
    }))
}

fn first_image(response: StabilityImageResponse, model_id: &str) -> Result<ImageData> {
    if let Some(Some(reason)) = response.finish_reasons.first() {
        log::warn!("{} withheld the image: {}", model_id, reason);
        return Err(StudioError::generation(format!(
            "{} withheld the image: {}",
            model_id, reason
        )));
    }

    let data = response
        .images
        .first()
        .ok_or_else(|| StudioError::generation("No images generated"))?;

    ImageData::from_base64(data, "image/png")
        .map_err(|e| StudioError::generation(format!("undecodable image: {}", e)))
}
