use super::traits::{encode_document, ArtifactStore, StorageStats};
use crate::{
    error::Result,
    models::{NewArtifact, SavedArtifact},
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local store. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<Vec<SavedArtifact>>,
    quota_bytes: Option<u64>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota_bytes(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<SavedArtifact>> {
        Ok(self.artifacts.read().await.clone())
    }

    async fn save(&self, artifact: NewArtifact) -> Result<Vec<SavedArtifact>> {
        let mut artifacts = self.artifacts.write().await;
        let mut next = Vec::with_capacity(artifacts.len() + 1);
        next.push(artifact.into_saved());
        next.extend(artifacts.iter().cloned());

        if self.quota_bytes.is_some() {
            encode_document(&next, self.quota_bytes)?;
        }
        *artifacts = next;
        Ok(artifacts.clone())
    }

    async fn delete(&self, id: &str) -> Result<Vec<SavedArtifact>> {
        let mut artifacts = self.artifacts.write().await;
        artifacts.retain(|artifact| artifact.id != id);
        Ok(artifacts.clone())
    }

    async fn stats(&self) -> Result<StorageStats> {
        let artifacts = self.artifacts.read().await;
        Ok(StorageStats {
            total_artifacts: artifacts.len(),
            storage_size_bytes: None,
            quota_bytes: self.quota_bytes,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
