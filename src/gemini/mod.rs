pub mod image_client;
pub mod text_client;

use crate::{
    client::GenerationClient,
    config::GeminiConfig,
    error::{Result, StudioError},
    models::{
        AspectRatio, EditInstruction, GeminiGenerateResponse, ImageData, ImageQuality,
        TextRequest,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

pub use image_client::GeminiImageClient;
pub use text_client::GeminiTextClient;

/// Shared HTTP plumbing for the Generative Language REST API.
#[derive(Clone)]
pub struct GeminiTransport {
    http: Client,
    api_base: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| StudioError::Config("GEMINI_API_KEY is required".into()))?;

        let mut builder = Client::builder().user_agent(concat!(
            "rgen-studio/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| StudioError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self, model: &str, method: &str) -> String {
        let model = model.trim();
        let model_path = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.api_base, model_path, method)
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        payload: &Value,
    ) -> Result<T> {
        let endpoint = self.endpoint(model, method);
        log::debug!("POST {} ({} bytes)", endpoint, payload.to_string().len());

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request to {} failed: {}", model, e);
                StudioError::generation(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini {} returned {}: {}", model, status, body);
            return Err(StudioError::generation(format!(
                "{} returned {}",
                model, status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StudioError::generation(format!("malformed response: {}", e)))
    }

    /// `generateContent` with the common "no usable candidate" handling.
    pub async fn generate_content(
        &self,
        model: &str,
        payload: &Value,
    ) -> Result<GeminiGenerateResponse> {
        let response: GeminiGenerateResponse = self.post(model, "generateContent", payload).await?;
        if response.candidates.is_empty() {
            log::warn!(
                "{} returned no candidates (feedback: {:?})",
                model,
                response.prompt_feedback
            );
        }
        Ok(response)
    }
}

pub fn inline_part(image: &ImageData) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type,
            "data": image.to_base64(),
        }
    })
}

#[derive(Clone)]
pub struct GeminiClient {
    text_client: GeminiTextClient,
    image_client: GeminiImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let transport = GeminiTransport::new(&config)?;
        Ok(Self {
            text_client: GeminiTextClient::new(transport.clone(), &config),
            image_client: GeminiImageClient::new(transport, &config),
        })
    }

    pub fn text(&self) -> &GeminiTextClient {
        &self.text_client
    }

    pub fn image(&self) -> &GeminiImageClient {
        &self.image_client
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_text(&self, request: TextRequest) -> Result<String> {
        self.text_client.generate(&request).await
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        quality: ImageQuality,
    ) -> Result<ImageData> {
        self.image_client.generate(prompt, aspect_ratio, quality).await
    }

    async fn edit_image(
        &self,
        base: &ImageData,
        instruction: &EditInstruction,
    ) -> Result<ImageData> {
        self.image_client.edit(base, instruction).await
    }

    async fn analyze_image(&self, image: &ImageData, prompt: &str) -> Result<String> {
        self.text_client.analyze(image, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_requires_api_key() {
        assert!(matches!(
            GeminiTransport::new(&GeminiConfig::new()),
            Err(StudioError::Config(_))
        ));
        assert!(GeminiTransport::new(&GeminiConfig::new().with_api_key("  ")).is_err());
    }

    #[test]
    fn test_endpoint_normalizes_model_path() {
        let transport = GeminiTransport::new(
            &GeminiConfig::new()
                .with_api_key("k")
                .with_api_base("https://example.test/v1beta/"),
        )
        .unwrap();
        assert_eq!(
            transport.endpoint("models/gemini-2.5-flash", "generateContent"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            transport.endpoint("imagen-4.0-generate-001", "predict"),
            "https://example.test/v1beta/models/imagen-4.0-generate-001:predict"
        );
    }

    #[test]
    fn test_inline_part_shape() {
        let part = inline_part(&ImageData::png(vec![1, 2, 3]));
        assert_eq!(part["inlineData"]["mimeType"], "image/png");
        assert_eq!(part["inlineData"]["data"], "AQID");
    }
}
