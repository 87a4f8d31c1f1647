pub mod file;
pub mod memory;
pub mod traits;
#[cfg(feature = "upstash")]
pub mod upstash;

use crate::{
    config::StorageConfig,
    error::{Result, StudioError},
    models::{NewArtifact, SavedArtifact},
};
use std::sync::Arc;
use traits::ArtifactStore;

pub use file::FileArtifactStore;
pub use memory::MemoryArtifactStore;
pub use traits::{ArtifactStore as ArtifactStoreTrait, StorageStats};

#[cfg(feature = "upstash")]
use upstash::UpstashArtifactStore;

/// The one artifact store the process uses, opened at startup and passed to
/// whoever needs it.
#[derive(Clone)]
pub struct ArtifactStoreManager {
    backend: Arc<dyn ArtifactStore>,
}

impl ArtifactStoreManager {
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let backend: Arc<dyn ArtifactStore> = if config.use_upstash {
            #[cfg(feature = "upstash")]
            {
                let upstash_config = config
                    .upstash
                    .clone()
                    .ok_or_else(|| StudioError::Config("Upstash config required".into()))?;
                Arc::new(UpstashArtifactStore::new(upstash_config, Some(config.quota_bytes)).await?)
            }
            #[cfg(not(feature = "upstash"))]
            {
                return Err(StudioError::Config("Upstash feature not enabled".into()));
            }
        } else {
            Arc::new(FileArtifactStore::new(config))
        };

        log::info!("Artifact store: {}", backend.name());
        Ok(Self { backend })
    }

    pub fn with_store(backend: Arc<dyn ArtifactStore>) -> Self {
        Self { backend }
    }

    pub fn storage(&self) -> &Arc<dyn ArtifactStore> {
        &self.backend
    }

    pub async fn list(&self) -> Result<Vec<SavedArtifact>> {
        self.backend.list().await
    }

    pub async fn save(&self, artifact: NewArtifact) -> Result<Vec<SavedArtifact>> {
        self.backend.save(artifact).await
    }

    pub async fn delete(&self, id: &str) -> Result<Vec<SavedArtifact>> {
        self.backend.delete(id).await
    }

    pub async fn stats(&self) -> Result<StorageStats> {
        self.backend.stats().await
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.backend.health_check().await
    }
}
