use super::traits::{decode_document, encode_document, ArtifactStore, StorageStats};
use crate::{
    config::UpstashConfig,
    error::{Result, StorageError, StudioError},
    models::{NewArtifact, SavedArtifact},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// Gallery document kept under one key in Upstash Redis, via its REST API.
pub struct UpstashArtifactStore {
    client: Client,
    base_url: String,
    token: String,
    key: String,
    quota_bytes: Option<u64>,
    write_lock: Mutex<()>,
}

#[derive(Debug, Deserialize)]
struct RedisReply {
    #[serde(default)]
    result: Value,
    error: Option<String>,
}

impl UpstashArtifactStore {
    pub async fn new(config: UpstashConfig, quota_bytes: Option<u64>) -> Result<Self> {
        let base_url = config
            .url
            .ok_or_else(|| StudioError::Config("Upstash URL is required".into()))?;

        let token = config
            .token
            .ok_or_else(|| StudioError::Config("Upstash token is required".into()))?;

        let storage = Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            key: config.key,
            quota_bytes,
            write_lock: Mutex::new(()),
        };

        // Test connection
        if !storage.health_check().await? {
            return Err(StorageError::Backend("Upstash did not answer PING".into()).into());
        }

        Ok(storage)
    }

    async fn command(&self, command: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("Upstash request failed: {}", e)))?;

        let status = response.status();
        let reply: RedisReply = response.json().await.map_err(|e| {
            StorageError::Backend(format!("Failed to parse Upstash response ({}): {}", status, e))
        })?;

        match reply.error {
            Some(error) => Err(classify_error(&error).into()),
            None if !status.is_success() => {
                Err(StorageError::Backend(format!("Upstash returned {}", status)).into())
            }
            None => Ok(reply.result),
        }
    }

    async fn read(&self) -> Result<Vec<SavedArtifact>> {
        let result = self.command(json!(["GET", self.key])).await?;
        Ok(result.as_str().map(decode_document).unwrap_or_default())
    }

    async fn write(&self, artifacts: &[SavedArtifact]) -> Result<()> {
        let document = encode_document(artifacts, self.quota_bytes)?;
        self.command(json!(["SET", self.key, document])).await?;
        Ok(())
    }
}

/// Memory and size limits on the Redis side surface as a full store.
fn classify_error(error: &str) -> StorageError {
    let lower = error.to_ascii_lowercase();
    if lower.starts_with("oom")
        || lower.contains("max request size")
        || lower.contains("max single record size")
        || lower.contains("limit exceeded")
    {
        StorageError::Full(error.to_string())
    } else {
        StorageError::Backend(error.to_string())
    }
}

#[async_trait]
impl ArtifactStore for UpstashArtifactStore {
    fn name(&self) -> &'static str {
        "upstash"
    }

    async fn list(&self) -> Result<Vec<SavedArtifact>> {
        self.read().await
    }

    async fn save(&self, artifact: NewArtifact) -> Result<Vec<SavedArtifact>> {
        let _guard = self.write_lock.lock().await;
        let mut artifacts = self.read().await?;
        artifacts.insert(0, artifact.into_saved());
        self.write(&artifacts).await?;
        Ok(artifacts)
    }

    async fn delete(&self, id: &str) -> Result<Vec<SavedArtifact>> {
        let _guard = self.write_lock.lock().await;
        let mut artifacts = self.read().await?;
        let before = artifacts.len();
        artifacts.retain(|artifact| artifact.id != id);
        if artifacts.len() != before {
            self.write(&artifacts).await?;
        }
        Ok(artifacts)
    }

    async fn stats(&self) -> Result<StorageStats> {
        let size = self.command(json!(["STRLEN", self.key])).await?;
        Ok(StorageStats {
            total_artifacts: self.read().await?.len(),
            storage_size_bytes: size.as_u64(),
            quota_bytes: self.quota_bytes,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let pong = self.command(json!(["PING"])).await?;
        Ok(pong.as_str() == Some("PONG"))
    }
}
