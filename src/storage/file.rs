use super::traits::{decode_document, encode_document, ArtifactStore, StorageStats};
use crate::{
    config::StorageConfig,
    error::{Result, StorageError},
    models::{NewArtifact, SavedArtifact},
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// The whole gallery as one JSON document on disk, capped at `quota_bytes`.
pub struct FileArtifactStore {
    path: PathBuf,
    quota_bytes: u64,
    write_lock: Mutex<()>,
}

impl FileArtifactStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: config.path.clone(),
            quota_bytes: config.quota_bytes,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<SavedArtifact>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(decode_document(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::Backend(format!(
                "could not read {}: {}",
                self.path.display(),
                e
            ))
            .into()),
        }
    }

    async fn write(&self, artifacts: &[SavedArtifact]) -> Result<()> {
        let document = encode_document(artifacts, Some(self.quota_bytes))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Backend(format!("could not create {}: {}", parent.display(), e)))?;
        }

        // Atomic replace: write a sibling file, then rename over the original.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, document.as_bytes())
            .await
            .map_err(|e| StorageError::Backend(format!("could not write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::Backend(format!("could not replace {}: {}", self.path.display(), e)))?;

        log::debug!("Wrote {} artifacts ({} bytes)", artifacts.len(), document.len());
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn list(&self) -> Result<Vec<SavedArtifact>> {
        self.read().await
    }

    async fn save(&self, artifact: NewArtifact) -> Result<Vec<SavedArtifact>> {
        let _guard = self.write_lock.lock().await;
        let mut artifacts = self.read().await?;
        let saved = artifact.into_saved();
        log::info!("Saving artifact {}", saved.id);
        artifacts.insert(0, saved);
        self.write(&artifacts).await?;
        Ok(artifacts)
    }

    async fn delete(&self, id: &str) -> Result<Vec<SavedArtifact>> {
        let _guard = self.write_lock.lock().await;
        let mut artifacts = self.read().await?;
        let before = artifacts.len();
        artifacts.retain(|artifact| artifact.id != id);
        if artifacts.len() == before {
            log::debug!("Artifact {} not found; nothing to delete", id);
            return Ok(artifacts);
        }
        self.write(&artifacts).await?;
        Ok(artifacts)
    }

    async fn stats(&self) -> Result<StorageStats> {
        let size = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Some(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Some(0),
            Err(_) => None,
        };
        Ok(StorageStats {
            total_artifacts: self.read().await?.len(),
            storage_size_bytes: size,
            quota_bytes: Some(self.quota_bytes),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.read().await.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneratedArtifactSet, GeneratedText, ImageData};
    use uuid::Uuid;

    fn temp_store(quota_bytes: u64) -> FileArtifactStore {
        let path = std::env::temp_dir()
            .join(format!("rgen-studio-{}", Uuid::new_v4()))
            .join("saved_artifacts.json");
        FileArtifactStore::new(
            &StorageConfig::new()
                .with_path(path)
                .with_quota_bytes(quota_bytes),
        )
    }

    fn new_artifact(subject: &str) -> NewArtifact {
        NewArtifact::new(
            subject,
            GeneratedArtifactSet {
                text: GeneratedText::rationale("Warm oak."),
                slots: Vec::new(),
            },
        )
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let store = temp_store(1024);
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_save_persists_newest_first() {
        let store = temp_store(64 * 1024);
        store.save(new_artifact("first")).await.unwrap();
        store.save(new_artifact("second")).await.unwrap();

        let reopened = FileArtifactStore::new(
            &StorageConfig::new()
                .with_path(store.path().to_path_buf())
                .with_quota_bytes(64 * 1024),
        );
        let list = reopened.list().await.unwrap();
        let subjects: Vec<&str> = list.iter().map(|a| a.subject.as_str()).collect();
        assert_eq!(subjects, vec!["second", "first"]);

        let after = reopened.delete(&list[1].id).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(store.list().await.unwrap()[0].subject, "second");
    }

    #[tokio::test]
    async fn test_over_quota_is_full_and_file_untouched() {
        let store = temp_store(600);
        store.save(new_artifact("small")).await.unwrap();

        let big = new_artifact("big").with_reference_images(vec![ImageData::png(vec![0; 2048])]);
        let err = store.save(big).await.unwrap_err();
        assert!(err.is_storage_full());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_lists_empty() {
        let store = temp_store(1024);
        tokio::fs::create_dir_all(store.path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(store.path(), b"[{\"id\":").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
