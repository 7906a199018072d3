//! OpenAI video generation
//!
//! `/videos` is a long-running task API: create returns a job with a
//! status, the job is polled until terminal, and the finished asset is
//! downloaded from `/videos/{id}/content`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::polling::{poll_until_terminal, PollConfig};
use crate::traits::VideoGenerationCapability;
use crate::types::{
    CallWarning, ResponseMetadata, VideoGenerationRequest, VideoGenerationResponse, VideoTask,
    VideoTaskStatus,
};
use crate::utils::cancel::CancelHandle;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Video capability backed by `/videos`.
#[derive(Clone)]
pub struct OpenAiVideo {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiVideo {
    pub fn new(config: OpenAiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn parse_task(body: &Value) -> Result<VideoTask, ProviderError> {
        let task_id = body
            .get("id")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ProviderError::ParseError(
                    "video job response is missing the task identifier".to_string(),
                )
            })?
            .to_string();

        let status = match body.get("status").and_then(|v| v.as_str()).unwrap_or("") {
            "completed" => VideoTaskStatus::Completed,
            "failed" => VideoTaskStatus::Failed,
            "in_progress" => VideoTaskStatus::InProgress,
            _ => VideoTaskStatus::Pending,
        };

        Ok(VideoTask {
            task_id,
            status,
            video_url: None,
            failure_reason: body
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .map(String::from),
        })
    }

    async fn get_task(&self, task_id: &str) -> Result<VideoTask, ProviderError> {
        let url = self.config.url(&format!("videos/{task_id}"));
        let body =
            crate::utils::http::get_json(&self.http_client, &url, self.config.headers()?).await?;
        Self::parse_task(&body)
    }
}

#[async_trait]
impl VideoGenerationCapability for OpenAiVideo {
    async fn generate_video(
        &self,
        request: VideoGenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<VideoGenerationResponse, ProviderError> {
        if request.prompt.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "video request requires a prompt".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        let mut body = json!({
            "model": request.model,
            "prompt": request.prompt,
        });
        if let Some(duration) = request.duration {
            body["seconds"] = json!(duration.to_string());
        }
        if let Some(resolution) = &request.resolution {
            body["size"] = json!(resolution);
        }
        if request.negative_prompt.is_some() {
            warnings.push(CallWarning::unsupported(
                "negative_prompt",
                "OpenAI video generation has no negative prompt",
            ));
        }
        if request.seed_image.is_some() {
            warnings.push(CallWarning::unsupported(
                "seed_image",
                "OpenAI video generation is text-to-video only",
            ));
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }

        let create_url = self.config.url("videos");
        let created = crate::utils::http::post_json(
            &self.http_client,
            &create_url,
            self.config.headers()?,
            &body,
        )
        .await?;
        let task = Self::parse_task(&created)?;
        let task_id = task.task_id.clone();
        tracing::debug!(task_id = %task_id, "created video generation job");

        let config = PollConfig::new(POLL_INTERVAL).with_timeout(POLL_TIMEOUT);
        let this = self.clone();
        let id_for_poll = task_id.clone();
        let terminal = poll_until_terminal(
            move || {
                let this = this.clone();
                let id = id_for_poll.clone();
                async move { this.get_task(&id).await }
            },
            |task: &VideoTask| task.status.is_terminal(),
            &config,
            cancel,
        )
        .await?;

        if terminal.status == VideoTaskStatus::Failed {
            return Err(ProviderError::api_error(
                422,
                terminal
                    .failure_reason
                    .unwrap_or_else(|| "video generation failed".to_string()),
            ));
        }

        let content_url = self.config.url(&format!("videos/{task_id}/content"));
        let video_data = crate::utils::http::download_bytes(
            &self.http_client,
            &content_url,
            self.config.headers()?,
        )
        .await?;
        let mime_type = crate::utils::mime::guess_mime_from_bytes(&video_data)
            .or_else(|| Some("video/mp4".to_string()));

        Ok(VideoGenerationResponse {
            metadata: ResponseMetadata {
                id: Some(task_id),
                model: Some(request.model),
                created: Some(chrono::Utc::now()),
                provider: "openai".to_string(),
            },
            video_url: None,
            video_data: Some(video_data),
            mime_type,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_response_without_id_is_rejected() {
        let err = OpenAiVideo::parse_task(&json!({"status": "queued"})).unwrap_err();
        assert!(matches!(err, ProviderError::ParseError(_)));
    }

    #[test]
    fn status_strings_map_to_task_status() {
        let task = OpenAiVideo::parse_task(&json!({"id": "video_1", "status": "in_progress"}))
            .expect("task");
        assert_eq!(task.status, VideoTaskStatus::InProgress);
        assert!(!task.status.is_terminal());

        let done =
            OpenAiVideo::parse_task(&json!({"id": "video_1", "status": "completed"})).expect("task");
        assert!(done.status.is_terminal());
    }
}
