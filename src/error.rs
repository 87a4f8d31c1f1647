use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    /// Quota exceeded. Callers should offer to delete old artifacts.
    #[error("Storage full: {0}")]
    Full(String),
    #[error("Storage error: {0}")]
    Backend(String),
}

impl StudioError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn is_storage_full(&self) -> bool {
        matches!(self, StudioError::Storage(StorageError::Full(_)))
    }

    /// Message safe to show an end user. Generation details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Validation(msg) => msg.clone(),
            StudioError::Generation(_) => {
                "Failed to generate content. Please try again in a moment.".to_string()
            }
            StudioError::Storage(StorageError::Full(_)) => {
                "Could not save the artifact. Please delete some old artifacts to make space."
                    .to_string()
            }
            StudioError::Storage(StorageError::Backend(_)) => {
                "An unexpected error occurred while accessing saved artifacts.".to_string()
            }
            StudioError::Config(msg) => format!("Configuration error: {}", msg),
            StudioError::Serialization(_) => "An unexpected internal error occurred.".to_string(),
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
