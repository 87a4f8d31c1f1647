pub mod image_client;
pub mod text_client;

use crate::{
    client::GenerationClient,
    config::BedrockConfig,
    error::{Result, StudioError},
    models::{AspectRatio, EditInstruction, ImageData, ImageQuality, TextRequest},
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::{
    config::{Credentials, Region},
    error::ProvideErrorMetadata,
    primitives::Blob,
    Client,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use image_client::BedrockImageClient;
pub use text_client::BedrockTextClient;

#[derive(Clone)]
pub struct BedrockClient {
    text_client: BedrockTextClient,
    image_client: BedrockImageClient,
}

impl BedrockClient {
    pub async fn new(bedrock_config: BedrockConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            loader = loader
                .credentials_provider(Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "rgen-studio",
                ))
                .region(Region::new(
                    bedrock_config
                        .region
                        .clone()
                        .unwrap_or_else(|| "us-east-1".to_string()),
                ));
        } else if let Some(region) = &bedrock_config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        let aws_config = loader.load().await;
        let client = Client::new(&aws_config);

        Ok(Self {
            text_client: BedrockTextClient::new(client.clone(), &bedrock_config),
            image_client: BedrockImageClient::new(client),
        })
    }

    pub fn text(&self) -> &BedrockTextClient {
        &self.text_client
    }

    pub fn image(&self) -> &BedrockImageClient {
        &self.image_client
    }
}

/// Single `InvokeModel` round trip with a JSON body on both sides.
pub(crate) async fn invoke_json<T: DeserializeOwned>(
    client: &Client,
    model_id: &str,
    payload: &Value,
) -> Result<T> {
    let request_json = serde_json::to_string(payload)?;
    log::debug!("Bedrock request to {} ({} bytes)", model_id, request_json.len());

    let response = client
        .invoke_model()
        .model_id(model_id)
        .content_type("application/json")
        .accept("application/json")
        .body(Blob::new(request_json.into_bytes()))
        .send()
        .await
        .map_err(|e| {
            log::error!("AWS SDK error details: {:?}", e);

            if let Some(service_error) = e.as_service_error() {
                log::error!("Service error code: {:?}", service_error.code());
                log::error!("Service error message: {:?}", service_error.message());
                StudioError::generation(format!(
                    "Bedrock service error: {} - {}",
                    service_error.code().unwrap_or("unknown"),
                    service_error.message().unwrap_or("no message")
                ))
            } else {
                StudioError::generation(format!("AWS SDK error: {}", e))
            }
        })?;

    let response_bytes = response.body.into_inner();
    serde_json::from_slice(&response_bytes).map_err(|e| {
        StudioError::generation(format!("malformed response from {}: {}", model_id, e))
    })
}

#[async_trait]
impl GenerationClient for BedrockClient {
    fn name(&self) -> &'static str {
        "bedrock"
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
