//! Freepik image-to-video generation (Kling)

use async_trait::async_trait;
use base64::Engine;
use serde_json::json;

use super::config::FreepikConfig;
use super::tasks;
use crate::error::ProviderError;
use crate::traits::VideoGenerationCapability;
use crate::types::{
    CallWarning, ResponseMetadata, VideoGenerationRequest, VideoGenerationResponse,
};
use crate::utils::cancel::CancelHandle;

const KLING_ENDPOINT: &str = "v1/ai/image-to-video/kling-v2";

/// Video capability backed by the Kling image-to-video task endpoint.
#[derive(Clone)]
pub struct FreepikVideo {
    config: FreepikConfig,
    http_client: reqwest::Client,
}

impl FreepikVideo {
    pub fn new(config: FreepikConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl VideoGenerationCapability for FreepikVideo {
    async fn generate_video(
        &self,
        request: VideoGenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<VideoGenerationResponse, ProviderError> {
        let seed_image = request.seed_image.as_ref().ok_or_else(|| {
            ProviderError::ConfigurationError(
                "Freepik video generation is image-to-video and requires a seed image".to_string(),
            )
        })?;

        let mut warnings = Vec::new();
        let mut body = json!({
            "image": base64::engine::general_purpose::STANDARD.encode(seed_image),
        });
        if !request.prompt.is_empty() {
            body["prompt"] = json!(request.prompt);
        }
        if let Some(negative_prompt) = &request.negative_prompt {
            body["negative_prompt"] = json!(negative_prompt);
        }
        if let Some(duration) = request.duration {
            // Kling accepts 5 or 10 second clips.
            let clamped = if duration <= 5 { 5 } else { 10 };
            if clamped != duration {
                warnings.push(CallWarning::unsupported(
                    "duration",
                    format!("Kling supports 5s or 10s clips; requested {duration}s, using {clamped}s"),
                ));
            }
            body["duration"] = json!(clamped.to_string());
        }
        if request.resolution.is_some() {
            warnings.push(CallWarning::unsupported(
                "resolution",
                "Kling picks the output resolution from the seed image",
            ));
        }
        if let Some(ratio) = &request.aspect_ratio {
            warnings.push(CallWarning::unsupported(
                "aspect_ratio",
                format!("Kling keeps the seed image ratio; '{ratio}' was ignored"),
            ));
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }

        let task = tasks::run_task(
            &self.config,
            &self.http_client,
            KLING_ENDPOINT,
            &body,
            cancel,
        )
        .await?;

        let url = task.generated_url.ok_or_else(|| {
            ProviderError::ParseError(
                "completed Freepik task carried no generated asset".to_string(),
            )
        })?;

        let data = crate::utils::http::download_bytes(
            &self.http_client,
            &url,
            reqwest::header::HeaderMap::new(),
        )
        .await?;
        let mime_type = crate::utils::mime::guess_mime_from_bytes(&data)
            .or_else(|| Some("video/mp4".to_string()));

        Ok(VideoGenerationResponse {
            metadata: ResponseMetadata {
                id: Some(task.task_id),
                model: Some("kling-v2".to_string()),
                created: Some(chrono::Utc::now()),
                provider: "freepik".to_string(),
            },
            video_url: Some(url),
            video_data: Some(data),
            mime_type,
            warnings,
        })
    }
}
