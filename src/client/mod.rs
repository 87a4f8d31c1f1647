#[cfg(test)]
pub(crate) mod mock;

use crate::{
    bedrock::BedrockClient,
    config::StudioConfig,
    error::{Result, StudioError},
    gemini::GeminiClient,
    models::{AspectRatio, EditInstruction, ImageData, ImageQuality, TextRequest},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// The remote generation service as the rest of the crate sees it.
///
/// Calls are single attempts: no retry, no cancellation beyond dropping the
/// future.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate_text(&self, request: TextRequest) -> Result<String>;

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        quality: ImageQuality,
    ) -> Result<ImageData>;

    async fn edit_image(&self, base: &ImageData, instruction: &EditInstruction)
        -> Result<ImageData>;

    async fn analyze_image(&self, image: &ImageData, prompt: &str) -> Result<String>;
}

/// Requests JSON matching `schema` and parses it into `T`. Anything that does
/// not parse is a generation failure.
pub async fn generate_structured<T: DeserializeOwned>(
    client: &dyn GenerationClient,
    request: TextRequest,
    schema: Value,
) -> Result<T> {
    let raw = client.generate_text(request.with_schema(schema)).await?;
    parse_structured(&raw)
}

pub(crate) fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|e| {
        log::error!("Structured response did not match schema: {}", e);
        log::debug!("Unparseable structured response: {}", raw);
        StudioError::generation(format!("unparseable structured output: {}", e))
    })
}

// Models sometimes wrap JSON in ```json fences even in JSON mode.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub struct GenerationBackend;

impl GenerationBackend {
    /// Opens the backend the configuration selects. Gemini wins when both are
    /// enabled.
    pub async fn connect(config: &StudioConfig) -> Result<Arc<dyn GenerationClient>> {
        let client: Arc<dyn GenerationClient> = if config.use_gemini {
            let gemini_config = config
                .gemini
                .clone()
                .ok_or_else(|| StudioError::Config("Gemini config required".into()))?;
            Arc::new(GeminiClient::new(gemini_config)?)
        } else if config.use_bedrock {
            let bedrock_config = config.bedrock.clone().unwrap_or_default();
            Arc::new(BedrockClient::new(bedrock_config).await?)
        } else {
            return Err(StudioError::Config(
                "No generation backend configured".into(),
            ));
        };

        log::info!("Generation backend: {}", client.name());
        Ok(client)
    }
}
