//! Unified request/response types shared by all providers

pub mod audio;
pub mod chat;
pub mod common;
pub mod image;
pub mod models;
pub mod realtime;
pub mod rerank;
pub mod video;

pub use audio::{
    SpeechRequest, SpeechResponse, TranscriptionRequest, TranscriptionResponse,
    TranscriptionSegment,
};
pub use chat::{
    ChatMessage, ChatRequest, ChatResponse, MessageRole, SourceReference, Tool, ToolCall,
};
pub use common::{CallWarning, FinishReason, HttpConfig, ResponseMetadata, Usage};
pub use image::{GeneratedImage, ImageGenerationRequest, ImageGenerationResponse};
pub use models::ModelInfo;
pub use realtime::{RealtimeSessionRequest, RealtimeSessionResponse};
pub use rerank::{RerankRequest, RerankResponse, RerankResult};
pub use video::{VideoGenerationRequest, VideoGenerationResponse, VideoTask, VideoTaskStatus};
