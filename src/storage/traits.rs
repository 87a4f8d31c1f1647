use crate::{
    error::{Result, StorageError},
    models::{NewArtifact, SavedArtifact},
};
use async_trait::async_trait;

/// Durable gallery of saved artifact sets, newest first.
///
/// Every mutating call returns the full list after the change so callers can
/// redraw without a second round trip.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<SavedArtifact>>;

    /// Assigns an id and timestamp and prepends the artifact.
    async fn save(&self, artifact: NewArtifact) -> Result<Vec<SavedArtifact>>;

    /// Unknown ids leave the list unchanged.
    async fn delete(&self, id: &str) -> Result<Vec<SavedArtifact>>;

    async fn stats(&self) -> Result<StorageStats>;

    async fn health_check(&self) -> Result<bool>;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageStats {
    pub total_artifacts: usize,
    pub storage_size_bytes: Option<u64>,
    pub quota_bytes: Option<u64>,
}

/// Serializes the whole gallery, refusing documents over `quota_bytes`.
pub(crate) fn encode_document(artifacts: &[SavedArtifact], quota_bytes: Option<u64>) -> Result<String> {
    let document = serde_json::to_string(artifacts)
        .map_err(|e| StorageError::Backend(format!("could not serialize artifacts: {}", e)))?;

    if let Some(quota) = quota_bytes {
        let size = document.len() as u64;
        if size > quota {
            log::warn!("Artifact document is {} bytes, quota is {}", size, quota);
            return Err(StorageError::Full(format!(
                "{} bytes exceeds the {} byte quota",
                size, quota
            ))
            .into());
        }
    }
    Ok(document)
}

/// A corrupt document reads as an empty gallery rather than an error.
pub(crate) fn decode_document(raw: &str) -> Vec<SavedArtifact> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::error!("Failed to load saved artifacts: {}", e);
        Vec::new()
    })
}
