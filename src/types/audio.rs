//! Unified speech (TTS) and transcription types

use std::collections::HashMap;

use super::common::{CallWarning, ResponseMetadata};

/// Unified text-to-speech request.
#[derive(Debug, Clone, Default)]
pub struct SpeechRequest {
    /// Target model id
    pub model: String,
    /// Text to synthesize
    pub input: String,
    /// Voice id/name
    pub voice: Option<String>,
    /// Output format, e.g. "mp3", "wav"
    pub format: Option<String>,
    /// Speaking speed multiplier
    pub speed: Option<f32>,
    /// Provider-specific passthrough fields
    pub extra_params: HashMap<String, serde_json::Value>,
}

impl SpeechRequest {
    /// Create a request for `model` synthesizing `input`.
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            ..Default::default()
        }
    }
}

/// Unified text-to-speech response.
#[derive(Debug, Clone, Default)]
pub struct SpeechResponse {
    /// Response metadata
    pub metadata: ResponseMetadata,
    /// Raw audio bytes
    pub audio: Vec<u8>,
    /// MIME type of the audio, when known
    pub mime_type: Option<String>,
    /// Best-effort degradation warnings
    pub warnings: Vec<CallWarning>,
}

/// Unified transcription request.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionRequest {
    /// Target model id
    pub model: String,
    /// Audio bytes to transcribe (multipart upload vendors)
    pub audio: Option<Vec<u8>>,
    /// File name hint for the upload, e.g. "audio.mp3"
    pub file_name: Option<String>,
    /// URL of hosted audio (URL-based vendors)
    pub audio_url: Option<String>,
    /// Expected language (ISO code), when known
    pub language: Option<String>,
    /// Optional transcription prompt/hint
    pub prompt: Option<String>,
    /// Provider-specific passthrough fields
    pub extra_params: HashMap<String, serde_json::Value>,
}

impl TranscriptionRequest {
    /// Create a request for `model` transcribing inline audio bytes.
    pub fn from_bytes(model: impl Into<String>, audio: Vec<u8>) -> Self {
        Self {
            model: model.into(),
            audio: Some(audio),
            ..Default::default()
        }
    }

    /// Create a request for `model` transcribing hosted audio.
    pub fn from_url(model: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            audio_url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// One timed segment of a transcription.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionSegment {
    /// Segment text
    pub text: String,
    /// Start offset in seconds
    pub start: Option<f64>,
    /// End offset in seconds
    pub end: Option<f64>,
}

/// Unified transcription response.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionResponse {
    /// Response metadata
    pub metadata: ResponseMetadata,
    /// Full transcription text
    pub text: String,
    /// Detected language, when reported
    pub language: Option<String>,
    /// Audio duration in seconds, when reported
    pub duration: Option<f64>,
    /// Timed segments, when reported
    pub segments: Vec<TranscriptionSegment>,
    /// Best-effort degradation warnings
    pub warnings: Vec<CallWarning>,
}
