//! Turns a short content idea or room description into AI-written copy and
//! platform-sized images, on top of Gemini or AWS Bedrock.
//!
//! [`Studio`] is the entry point. It fans out one text call and one image call
//! per output variant, optionally running each image through a single
//! critique-and-edit pass. Saved results live behind [`ArtifactStore`].

pub mod bedrock;
pub mod client;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod refine;
#[cfg(feature = "server")]
pub mod server;
pub mod storage;
pub mod templates;

pub use bedrock::BedrockClient;
pub use client::{GenerationBackend, GenerationClient};
pub use config::{BedrockConfig, GeminiConfig, StorageConfig, StudioConfig, UpstashConfig};
pub use error::{Result, StorageError, StudioError};
pub use gemini::GeminiClient;
pub use models::*;
pub use orchestrator::Studio;
pub use refine::{Refined, RefinementLoop};
pub use storage::{ArtifactStoreManager, ArtifactStoreTrait as ArtifactStore};
pub use templates::{InspirationTemplate, INSPIRATION_TEMPLATES};
