//! Reka AI provider
//!
//! Chat on `/chat` (blocking and streaming; streamed frames restate the
//! full accumulated text, which the translator reduces to suffix deltas)
//! and transcription through the multimodal chat endpoint.

pub mod chat;
pub mod config;
pub mod streaming;
pub mod transcription;

pub use config::RekaConfig;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::traits::{
    ChatCapability, ModelListingCapability, ModelProvider, TranscriptionCapability,
};
use crate::types::ModelInfo;

/// Reka AI provider exposing chat and transcription.
pub struct RekaProvider {
    chat: chat::RekaChat,
    transcription: transcription::RekaTranscription,
    catalog: RekaCatalog,
}

impl RekaProvider {
    /// Build a provider from configuration.
    pub fn new(config: RekaConfig) -> Result<Self, ProviderError> {
        let http_client = crate::utils::http::build_http_client(&config.http_config)?;
        Ok(Self {
            chat: chat::RekaChat::new(config.clone(), http_client.clone()),
            transcription: transcription::RekaTranscription::new(config, http_client),
            catalog: RekaCatalog,
        })
    }

    /// Build a provider resolving the key through `resolver`.
    pub fn from_resolver(resolver: &dyn ApiKeyResolver) -> Result<Self, ProviderError> {
        Self::new(RekaConfig::from_resolver(resolver)?)
    }
}

impl ModelProvider for RekaProvider {
    fn provider_id(&self) -> &'static str {
        "rekaai"
    }

    fn provider_name(&self) -> &'static str {
        "Reka AI"
    }

    fn chat(&self) -> Option<&dyn ChatCapability> {
        Some(&self.chat)
    }

    fn transcription(&self) -> Option<&dyn TranscriptionCapability> {
        Some(&self.transcription)
    }

    fn models(&self) -> Option<&dyn ModelListingCapability> {
        Some(&self.catalog)
    }
}

/// Static catalog; Reka has no model-listing endpoint.
struct RekaCatalog;

#[async_trait]
impl ModelListingCapability for RekaCatalog {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        Ok(vec![
            ModelInfo::new("reka-core", "rekaai", &["chat", "transcription"]),
            ModelInfo::new("reka-flash", "rekaai", &["chat", "transcription"]),
            ModelInfo::new("reka-edge", "rekaai", &["chat"]),
        ])
    }
}
