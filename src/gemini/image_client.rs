use super::{inline_part, GeminiTransport};
use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    models::{AspectRatio, EditInstruction, ImageData, ImageQuality, ImagenPredictResponse},
    prompts,
};
use serde_json::{json, Value};

#[derive(Clone)]
pub struct GeminiImageClient {
    transport: GeminiTransport,
    edit_model: String,
}

impl GeminiImageClient {
    pub fn new(transport: GeminiTransport, config: &GeminiConfig) -> Self {
        Self {
            transport,
            edit_model: config.edit_model.clone(),
        }
    }

    pub fn model_for(quality: ImageQuality) -> &'static str {
        match quality {
            ImageQuality::Ultra => "imagen-4.0-ultra-generate-001",
            ImageQuality::Balanced => "imagen-4.0-generate-001",
            ImageQuality::Fastest => "imagen-4.0-fast-generate-001",
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
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": aspect_ratio.as_str(),
            },
        });

        log::info!("Generating {} image with model: {}", aspect_ratio, model_id);
        let response: ImagenPredictResponse =
            self.transport.post(model_id, "predict", &payload).await?;

        let prediction = response
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some())
            .ok_or_else(|| StudioError::generation("No images generated"))?;

        if let Some(reason) = &prediction.rai_filtered_reason {
            log::warn!("Imagen filtered part of the output: {}", reason);
        }

        let data = prediction.bytes_base64_encoded.unwrap_or_default();
        let mime_type = prediction.mime_type.unwrap_or_else(|| "image/png".to_string());
        ImageData::from_base64(&data, mime_type)
            .map_err(|e| StudioError::generation(format!("undecodable image: {}", e)))
    }

    pub async fn edit(&self, base: &ImageData, instruction: &EditInstruction) -> Result<ImageData> {
        let payload = build_edit_payload(base, instruction);

        log::info!("Editing image with model: {}", self.edit_model);
        let response = self
            .transport
            .generate_content(&self.edit_model, &payload)
            .await?;

        let inline = response.first_inline_data().ok_or_else(|| {
            StudioError::generation(format!(
                "{} returned no image part (finish reason: {})",
                self.edit_model,
                response.finish_reason().unwrap_or("unknown")
            ))
        })?;

        ImageData::from_base64(&inline.data, inline.mime_type.clone())
            .map_err(|e| StudioError::generation(format!("undecodable image: {}", e)))
    }
}

fn build_edit_payload(base: &ImageData, instruction: &EditInstruction) -> Value {
    let mut parts = vec![inline_part(base)];
    if let Some(overlay) = instruction.overlay() {
        parts.push(inline_part(overlay));
    }
    parts.push(json!({ "text": prompts::edit_prompt(instruction) }));

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "responseModalities": ["IMAGE"] },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comment;

    #[test]
    fn test_quality_selects_imagen_model() {
        assert_eq!(
            GeminiImageClient::model_for(ImageQuality::Ultra),
            "imagen-4.0-ultra-generate-001"
        );
        assert_eq!(
            GeminiImageClient::model_for(ImageQuality::Fastest),
            "imagen-4.0-fast-generate-001"
        );
    }

    #[test]
    fn test_plain_edit_sends_base_then_text() {
        let payload = build_edit_payload(
            &ImageData::png(vec![1]),
            &EditInstruction::plain("Make the sofa blue."),
        );
        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[1]["text"]
            .as_str()
            .unwrap()
            .contains("Make the sofa blue."));
        assert_eq!(payload["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_annotated_edit_sends_overlay_second() {
        let payload = build_edit_payload(
            &ImageData::png(vec![1]),
            &EditInstruction::annotated(
                ImageData::png(vec![9]),
                vec![Comment::new(10.0, 20.0, "brighter")],
            ),
        );
        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1]["inlineData"]["data"], "CQ==");
    }

    #[test]
    fn test_comments_without_overlay_skip_overlay_part() {
        let payload = build_edit_payload(
            &ImageData::png(vec![1]),
            &EditInstruction::annotated(
                ImageData::png(Vec::new()),
                vec![Comment::new(30.0, 60.0, "Swap the lamp for a floor lamp")],
            ),
        );
        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        let text = parts[1]["text"].as_str().unwrap();
        assert!(text.contains("Swap the lamp for a floor lamp"));
        assert!(!text.contains("overlay"));
    }
}
