use super::{inline_part, GeminiTransport};
use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    models::{ImageData, TextRequest},
};
use serde_json::{json, Map, Value};

#[derive(Clone)]
pub struct GeminiTextClient {
    transport: GeminiTransport,
    text_model: String,
    analysis_model: String,
    analysis_thinking_budget: Option<u32>,
}

impl GeminiTextClient {
    pub fn new(transport: GeminiTransport, config: &GeminiConfig) -> Self {
        Self {
            transport,
            text_model: config.text_model.clone(),
            analysis_model: config.analysis_model.clone(),
            analysis_thinking_budget: config.analysis_thinking_budget,
        }
    }

    pub async fn generate(&self, request: &TextRequest) -> Result<String> {
        let payload = build_text_payload(request);
        log::info!(
            "Invoking text model: {} (grounding: {}, images: {})",
            self.text_model,
            request.use_search_grounding,
            request.images.len()
        );

        let response = self
            .transport
            .generate_content(&self.text_model, &payload)
            .await?;

        response.text().ok_or_else(|| {
            StudioError::generation(format!(
                "{} returned no text (finish reason: {})",
                self.text_model,
                response.finish_reason().unwrap_or("unknown")
            ))
        })
    }

    /// Vision call used for critiques and free-form image questions.
    pub async fn analyze(&self, image: &ImageData, prompt: &str) -> Result<String> {
        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [inline_part(image), { "text": prompt }],
            }],
        });
        if let Some(budget) = self.analysis_thinking_budget {
            payload["generationConfig"] = json!({ "thinkingConfig": { "thinkingBudget": budget } });
        }

        log::info!("Invoking analysis model: {}", self.analysis_model);
        let response = self
            .transport
            .generate_content(&self.analysis_model, &payload)
            .await?;

        response.text().ok_or_else(|| {
            StudioError::generation(format!("{} returned no analysis", self.analysis_model))
        })
    }
}

fn build_text_payload(request: &TextRequest) -> Value {
    let mut parts: Vec<Value> = request.images.iter().map(inline_part).collect();
    parts.push(json!({ "text": request.prompt }));

    let mut payload = Map::new();
    payload.insert(
        "contents".to_string(),
        json!([{ "role": "user", "parts": parts }]),
    );

    if request.use_search_grounding {
        payload.insert("tools".to_string(), json!([{ "google_search": {} }]));
    }

    // The API rejects JSON mode combined with tools, so a grounded structured
    // request relies on the prompt and local validation instead.
    if let Some(schema) = &request.response_schema {
        if request.use_search_grounding {
            log::debug!("Grounded request: response schema enforced locally");
        } else {
            payload.insert(
                "generationConfig".to_string(),
                json!({
                    "responseMimeType": "application/json",
                    "responseSchema": schema,
                }),
            );
        }
    }

    Value::Object(payload)
}
