//! NLP Cloud provider
//!
//! Model-routed endpoints under `/v1/gpu/{model}/`: chatbot (blocking and
//! chunked token-text streaming) and asr transcription.

pub mod chat;
pub mod config;
pub mod transcription;

pub use config::NlpCloudConfig;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::traits::{
    ChatCapability, ModelListingCapability, ModelProvider, TranscriptionCapability,
};
use crate::types::ModelInfo;

/// NLP Cloud provider exposing chat and transcription.
pub struct NlpCloudProvider {
    chat: chat::NlpCloudChat,
    transcription: transcription::NlpCloudTranscription,
    catalog: NlpCloudCatalog,
}

impl NlpCloudProvider {
    /// Build a provider from configuration.
    pub fn new(config: NlpCloudConfig) -> Result<Self, ProviderError> {
        let http_client = crate::utils::http::build_http_client(&config.http_config)?;
        Ok(Self {
            chat: chat::NlpCloudChat::new(config.clone(), http_client.clone()),
            transcription: transcription::NlpCloudTranscription::new(config, http_client),
            catalog: NlpCloudCatalog,
        })
    }

    /// Build a provider resolving the key through `resolver`.
    pub fn from_resolver(resolver: &dyn ApiKeyResolver) -> Result<Self, ProviderError> {
        Self::new(NlpCloudConfig::from_resolver(resolver)?)
    }
}

impl ModelProvider for NlpCloudProvider {
    fn provider_id(&self) -> &'static str {
        "nlpcloud"
    }

    fn provider_name(&self) -> &'static str {
        "NLP Cloud"
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

/// Static catalog; NLP Cloud has no model-listing endpoint.
struct NlpCloudCatalog;

#[async_trait]
impl ModelListingCapability for NlpCloudCatalog {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        Ok(vec![
            ModelInfo::new("finetuned-llama-3-70b", "nlpcloud", &["chat"]),
            ModelInfo::new("chatdolphin", "nlpcloud", &["chat"]),
            ModelInfo::new("whisper", "nlpcloud", &["transcription"]),
        ])
    }
}
