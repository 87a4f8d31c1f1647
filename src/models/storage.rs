use super::{artifact::GeneratedArtifactSet, image::ImageData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedArtifact {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub subject: String,
    pub artifact: GeneratedArtifactSet,
    #[serde(default)]
    pub reference_images: Vec<ImageData>,
}

/// What the caller hands to a store. Id and timestamp are assigned on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtifact {
    pub subject: String,
    pub artifact: GeneratedArtifactSet,
    #[serde(default)]
    pub reference_images: Vec<ImageData>,
}

impl NewArtifact {
    pub fn new(subject: impl Into<String>, artifact: GeneratedArtifactSet) -> Self {
        Self {
            subject: subject.into(),
            artifact,
            reference_images: Vec::new(),
        }
    }

    pub fn with_reference_images(mut self, images: Vec<ImageData>) -> Self {
        self.reference_images = images;
        self
    }

    pub fn into_saved(self) -> SavedArtifact {
        SavedArtifact {
            id: format!("artifact-{}", Uuid::new_v4()),
            created_at: Utc::now(),
            subject: self.subject,
            artifact: self.artifact,
            reference_images: self.reference_images,
        }
    }
}
