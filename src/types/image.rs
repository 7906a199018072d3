//! Unified image generation types

use std::collections::HashMap;

use super::common::{CallWarning, ResponseMetadata};

/// Unified image generation request.
#[derive(Debug, Clone, Default)]
pub struct ImageGenerationRequest {
    /// Target model id
    pub model: String,
    /// Text prompt
    pub prompt: String,
    /// Negative prompt, for vendors that support one
    pub negative_prompt: Option<String>,
    /// Requested size, e.g. "1024x1024"
    pub size: Option<String>,
    /// Aspect ratio, e.g. "16:9" (vendors that take a ratio instead of a size)
    pub aspect_ratio: Option<String>,
    /// Number of images requested
    pub count: u32,
    /// Deterministic seed
    pub seed: Option<u64>,
    /// Provider-specific passthrough fields
    pub extra_params: HashMap<String, serde_json::Value>,
}

impl ImageGenerationRequest {
    /// Create a request for `model` with the given prompt.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            count: 1,
            ..Default::default()
        }
    }
}

/// One generated image, either hosted or inline.
#[derive(Debug, Clone, Default)]
pub struct GeneratedImage {
    /// Download URL, when the vendor hosts the asset
    pub url: Option<String>,
    /// Base64 payload, when the vendor inlines the asset
    pub b64_data: Option<String>,
    /// MIME type of the asset, when known
    pub mime_type: Option<String>,
}

/// Unified image generation response.
///
/// Vendors that return array-shaped asset lists are reduced to the first
/// entry; callers requesting more than one image get an
/// `UnsupportedSetting` warning where the vendor only produces one.
#[derive(Debug, Clone, Default)]
pub struct ImageGenerationResponse {
    /// Response metadata
    pub metadata: ResponseMetadata,
    /// Generated images
    pub images: Vec<GeneratedImage>,
    /// Best-effort degradation warnings
    pub warnings: Vec<CallWarning>,
}
