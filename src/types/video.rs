//! Unified video generation types
//!
//! Video generation is a long-running vendor task: create returns a task
//! handle, status is polled until terminal, and the finished asset is
//! downloaded separately.

use std::collections::HashMap;

use super::common::{CallWarning, ResponseMetadata};

/// Unified video generation request.
#[derive(Debug, Clone, Default)]
pub struct VideoGenerationRequest {
    /// Target model id
    pub model: String,
    /// Text prompt
    pub prompt: String,
    /// Negative prompt, for vendors that support one
    pub negative_prompt: Option<String>,
    /// Seed image bytes (image-to-video vendors)
    pub seed_image: Option<Vec<u8>>,
    /// Clip duration in seconds
    pub duration: Option<u32>,
    /// Aspect ratio, e.g. "16:9"
    pub aspect_ratio: Option<String>,
    /// Resolution, e.g. "720p"
    pub resolution: Option<String>,
    /// Provider-specific passthrough fields
    pub extra_params: HashMap<String, serde_json::Value>,
}

impl VideoGenerationRequest {
    /// Create a request for `model` with the given prompt.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// Status of a long-running video task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoTaskStatus {
    /// Accepted, not started
    Pending,
    /// Generation in progress
    InProgress,
    /// Finished successfully
    Completed,
    /// Finished with a vendor-reported failure
    Failed,
}

impl VideoTaskStatus {
    /// Terminal means polling should stop, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Snapshot of a video task as reported by one status poll.
#[derive(Debug, Clone)]
pub struct VideoTask {
    /// Vendor task id
    pub task_id: String,
    /// Current status
    pub status: VideoTaskStatus,
    /// URL of the finished asset (terminal success only)
    pub video_url: Option<String>,
    /// Vendor failure detail (terminal failure only)
    pub failure_reason: Option<String>,
}

/// Unified video generation response.
#[derive(Debug, Clone, Default)]
pub struct VideoGenerationResponse {
    /// Response metadata
    pub metadata: ResponseMetadata,
    /// Hosted URL of the generated video, when the vendor provides one
    pub video_url: Option<String>,
    /// Downloaded video bytes, when the provider fetches the asset
    pub video_data: Option<Vec<u8>>,
    /// MIME type of the asset, when known
    pub mime_type: Option<String>,
    /// Best-effort degradation warnings
    pub warnings: Vec<CallWarning>,
}
