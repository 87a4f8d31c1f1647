use super::invoke_json;
use crate::{
    config::BedrockConfig,
    error::{Result, StudioError},
    models::{ClaudeResponse, ImageData, TextRequest},
};
use aws_sdk_bedrockruntime::Client;
use serde_json::{json, Value};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Claude on Bedrock through the messages API.
#[derive(Clone)]
pub struct BedrockTextClient {
    client: Client,
    model_id: String,
    max_tokens: u32,
}

impl BedrockTextClient {
    pub fn new(client: Client, config: &BedrockConfig) -> Self {
        Self {
            client,
            model_id: config.text_model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub async fn generate(&self, request: &TextRequest) -> Result<String> {
        if request.use_search_grounding {
            log::warn!(
                "Search grounding is not available on {}; answering from model knowledge",
                self.model_id
            );
        }

        let payload = build_messages_payload(request, self.max_tokens);
        log::info!("Invoking model: {}", self.model_id);
        self.invoke(&payload).await
    }

    pub async fn analyze(&self, image: &ImageData, prompt: &str) -> Result<String> {
        let request = TextRequest::new(prompt).with_images(vec![image.clone()]);
        let payload = build_messages_payload(&request, self.max_tokens);
        log::info!("Invoking analysis model: {}", self.model_id);
        self.invoke(&payload).await
    }

    async fn invoke(&self, payload: &Value) -> Result<String> {
        let response: ClaudeResponse = invoke_json(&self.client, &self.model_id, payload).await?;
        response.text().ok_or_else(|| {
            StudioError::generation(format!(
                "{} returned no text (stop reason: {})",
                self.model_id,
                response.stop_reason.as_deref().unwrap_or("unknown")
            ))
        })
    }
}

fn build_messages_payload(request: &TextRequest, max_tokens: u32) -> Value {
    let mut content: Vec<Value> = request
        .images
        .iter()
        .map(|image| {
            json!({
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": image.mime_type,
                    "data": image.to_base64(),
                }
            })
        })
        .collect();

    // No JSON mode on this API; the schema travels in the prompt and the
    // caller validates the reply.
    let prompt = match &request.response_schema {
        Some(schema) => format!(
            "{}\n\nRespond with ONLY a JSON object that matches this JSON schema, with no surrounding text:\n{}",
            request.prompt, schema
        ),
        None => request.prompt.clone(),
    };
    content.push(json!({ "type": "text", "text": prompt }));

    json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "max_tokens": max_tokens,
        "messages": [{ "role": "user", "content": content }],
    })
}
