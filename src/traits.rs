//! Capability traits
//!
//! Each provider implements the subset of capabilities its vendor offers
//! and is reached through [`ModelProvider`], which exposes capabilities as
//! optional trait objects. A capability a vendor lacks is simply absent;
//! helper methods on implementors may also return
//! `ProviderError::UnsupportedOperation` for options a vendor cannot
//! honor. No best-effort emulation is attempted.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::stream::ModelStream;
use crate::types::{
    ChatRequest, ChatResponse, ImageGenerationRequest, ImageGenerationResponse, ModelInfo,
    RealtimeSessionRequest, RealtimeSessionResponse, RerankRequest, RerankResponse, SpeechRequest,
    SpeechResponse, TranscriptionRequest, TranscriptionResponse, VideoGenerationRequest,
    VideoGenerationResponse,
};
use crate::utils::cancel::CancelHandle;

/// Chat completion, blocking and streaming.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    /// Run a chat completion to completion.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Stream a chat completion as normalized events.
    async fn chat_stream(&self, request: ChatRequest) -> Result<ModelStream, ProviderError>;

    /// Stream with a cancellation handle that aborts consumption.
    async fn chat_stream_with_cancel(
        &self,
        request: ChatRequest,
    ) -> Result<(ModelStream, CancelHandle), ProviderError> {
        let stream = self.chat_stream(request).await?;
        Ok(crate::utils::cancel::make_cancellable_stream(stream))
    }
}

/// Image generation.
#[async_trait]
pub trait ImageGenerationCapability: Send + Sync {
    /// Generate images from a prompt. `cancel` aborts at the next
    /// suspension point; for task-based vendors that is the next poll
    /// boundary.
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<ImageGenerationResponse, ProviderError>;
}

/// Text-to-speech.
#[async_trait]
pub trait SpeechCapability: Send + Sync {
    /// Synthesize speech audio from text.
    async fn generate_speech(&self, request: SpeechRequest)
        -> Result<SpeechResponse, ProviderError>;
}

/// Audio transcription.
#[async_trait]
pub trait TranscriptionCapability: Send + Sync {
    /// Transcribe audio to text.
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ProviderError>;
}

/// Video generation (long-running vendor tasks).
#[async_trait]
pub trait VideoGenerationCapability: Send + Sync {
    /// Create the generation task, poll until terminal, and return the
    /// finished asset. `cancel` aborts at the next poll boundary.
    async fn generate_video(
        &self,
        request: VideoGenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<VideoGenerationResponse, ProviderError>;
}

/// Document reranking.
#[async_trait]
pub trait RerankCapability: Send + Sync {
    /// Order documents by relevance to a query.
    async fn rerank(&self, request: RerankRequest) -> Result<RerankResponse, ProviderError>;
}

/// Ephemeral realtime session tokens.
#[async_trait]
pub trait RealtimeCapability: Send + Sync {
    /// Mint a short-lived client credential for a realtime session.
    async fn create_realtime_session(
        &self,
        request: RealtimeSessionRequest,
    ) -> Result<RealtimeSessionResponse, ProviderError>;
}

/// Model listing.
#[async_trait]
pub trait ModelListingCapability: Send + Sync {
    /// List the models this provider offers.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError>;
}

/// Umbrella trait implemented by each vendor provider.
///
/// Capability accessors default to `None`; providers override the ones
/// their vendor supports. Callers branch on presence instead of probing
/// with failing requests.
pub trait ModelProvider: Send + Sync {
    /// Stable provider id (e.g. "openai", "freepik").
    fn provider_id(&self) -> &'static str;

    /// Human-readable provider name.
    fn provider_name(&self) -> &'static str;

    /// Chat capability, if supported.
    fn chat(&self) -> Option<&dyn ChatCapability> {
        None
    }

    /// Image generation capability, if supported.
    fn images(&self) -> Option<&dyn ImageGenerationCapability> {
        None
    }

    /// Speech capability, if supported.
    fn speech(&self) -> Option<&dyn SpeechCapability> {
        None
    }

    /// Transcription capability, if supported.
    fn transcription(&self) -> Option<&dyn TranscriptionCapability> {
        None
    }

    /// Video generation capability, if supported.
    fn video(&self) -> Option<&dyn VideoGenerationCapability> {
        None
    }

    /// Rerank capability, if supported.
    fn rerank(&self) -> Option<&dyn RerankCapability> {
        None
    }

    /// Realtime session capability, if supported.
    fn realtime(&self) -> Option<&dyn RealtimeCapability> {
        None
    }

    /// Model listing capability, if supported.
    fn models(&self) -> Option<&dyn ModelListingCapability> {
        None
    }
}
