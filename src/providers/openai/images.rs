//! OpenAI image generation

use async_trait::async_trait;
use serde_json::json;

use super::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::traits::ImageGenerationCapability;
use crate::types::{
    CallWarning, GeneratedImage, ImageGenerationRequest, ImageGenerationResponse, ResponseMetadata,
};
use crate::utils::cancel::CancelHandle;

/// Image capability backed by `/images/generations`.
#[derive(Clone)]
pub struct OpenAiImages {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiImages {
    pub fn new(config: OpenAiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl ImageGenerationCapability for OpenAiImages {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<ImageGenerationResponse, ProviderError> {
        if request.prompt.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "image request requires a prompt".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        let mut body = json!({
            "model": request.model,
            "prompt": request.prompt,
            "n": request.count.max(1),
        });

        if let Some(size) = &request.size {
            body["size"] = json!(size);
        } else if let Some(ratio) = &request.aspect_ratio {
            warnings.push(CallWarning::unsupported(
                "aspect_ratio",
                format!("OpenAI takes an explicit size, not a ratio; '{ratio}' was ignored"),
            ));
        }
        if request.negative_prompt.is_some() {
            warnings.push(CallWarning::unsupported(
                "negative_prompt",
                "OpenAI image generation has no negative prompt",
            ));
        }
        if let Some(seed) = request.seed {
            warnings.push(CallWarning::unsupported(
                "seed",
                format!("OpenAI image generation does not accept a seed ({seed})"),
            ));
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }

        let url = self.config.url("images/generations");
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ProviderError::Cancelled(
                    "image generation cancelled by caller".to_string(),
                ));
            }
            response = crate::utils::http::post_json(
                &self.http_client,
                &url,
                self.config.headers()?,
                &body,
            ) => response?,
        };

        let images = response
            .get("data")
            .and_then(|v| v.as_array())
            .map(|data| {
                data.iter()
                    .map(|img| GeneratedImage {
                        url: img.get("url").and_then(|v| v.as_str()).map(String::from),
                        b64_data: img
                            .get("b64_json")
                            .and_then(|v| v.as_str())
                            .map(String::from),
                        mime_type: Some("image/png".to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ImageGenerationResponse {
            metadata: ResponseMetadata {
                id: None,
                model: Some(request.model),
                created: Some(chrono::Utc::now()),
                provider: "openai".to_string(),
            },
            images,
            warnings,
        })
    }
}
