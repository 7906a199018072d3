//! OpenAI provider
//!
//! Covers chat completions (blocking + streaming), image generation,
//! speech, transcription, long-running video jobs, OpenAI-compatible
//! reranking, realtime session tokens and model listing.

pub mod audio;
pub mod chat;
pub mod config;
pub mod images;
pub mod models;
pub mod realtime;
pub mod rerank;
pub mod streaming;
pub mod video;

pub use config::OpenAiConfig;

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::traits::{
    ChatCapability, ImageGenerationCapability, ModelListingCapability, ModelProvider,
    RealtimeCapability, RerankCapability, SpeechCapability, TranscriptionCapability,
    VideoGenerationCapability,
};

/// OpenAI provider exposing all supported capabilities.
pub struct OpenAiProvider {
    chat: chat::OpenAiChat,
    images: images::OpenAiImages,
    audio: audio::OpenAiAudio,
    video: video::OpenAiVideo,
    rerank: rerank::OpenAiRerank,
    realtime: realtime::OpenAiRealtime,
    models: models::OpenAiModels,
}

impl OpenAiProvider {
    /// Build a provider from configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let http_client = crate::utils::http::build_http_client(&config.http_config)?;
        Ok(Self {
            chat: chat::OpenAiChat::new(config.clone(), http_client.clone()),
            images: images::OpenAiImages::new(config.clone(), http_client.clone()),
            audio: audio::OpenAiAudio::new(config.clone(), http_client.clone()),
            video: video::OpenAiVideo::new(config.clone(), http_client.clone()),
            rerank: rerank::OpenAiRerank::new(config.clone(), http_client.clone()),
            realtime: realtime::OpenAiRealtime::new(config.clone(), http_client.clone()),
            models: models::OpenAiModels::new(config, http_client),
        })
    }

    /// Build a provider resolving the key through `resolver`.
    pub fn from_resolver(resolver: &dyn ApiKeyResolver) -> Result<Self, ProviderError> {
        Self::new(OpenAiConfig::from_resolver(resolver)?)
    }

    /// Direct access to the chat capability.
    pub fn chat_capability(&self) -> &chat::OpenAiChat {
        &self.chat
    }
}

impl ModelProvider for OpenAiProvider {
    fn provider_id(&self) -> &'static str {
        "openai"
    }

    fn provider_name(&self) -> &'static str {
        "OpenAI"
    }

    fn chat(&self) -> Option<&dyn ChatCapability> {
        Some(&self.chat)
    }

    fn images(&self) -> Option<&dyn ImageGenerationCapability> {
        Some(&self.images)
    }

    fn speech(&self) -> Option<&dyn SpeechCapability> {
        Some(&self.audio)
    }

    fn transcription(&self) -> Option<&dyn TranscriptionCapability> {
        Some(&self.audio)
    }

    fn video(&self) -> Option<&dyn VideoGenerationCapability> {
        Some(&self.video)
    }

    fn rerank(&self) -> Option<&dyn RerankCapability> {
        Some(&self.rerank)
    }

    fn realtime(&self) -> Option<&dyn RealtimeCapability> {
        Some(&self.realtime)
    }

    fn models(&self) -> Option<&dyn ModelListingCapability> {
        Some(&self.models)
    }
}
