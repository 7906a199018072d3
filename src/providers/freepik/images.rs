//! Freepik image generation (Mystic)

use async_trait::async_trait;
use serde_json::json;

use super::config::FreepikConfig;
use super::tasks;
use crate::error::ProviderError;
use crate::traits::ImageGenerationCapability;
use crate::types::{
    CallWarning, GeneratedImage, ImageGenerationRequest, ImageGenerationResponse, ResponseMetadata,
};
use crate::utils::cancel::CancelHandle;

const MYSTIC_ENDPOINT: &str = "v1/ai/mystic";

/// Image capability backed by the Mystic task endpoint.
#[derive(Clone)]
pub struct FreepikImages {
    config: FreepikConfig,
    http_client: reqwest::Client,
}

impl FreepikImages {
    pub fn new(config: FreepikConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl ImageGenerationCapability for FreepikImages {
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
        let mut body = json!({ "prompt": request.prompt });

        if let Some(ratio) = &request.aspect_ratio {
            // Freepik spells ratios as words, e.g. "square_1_1", "widescreen_16_9".
            let mapped = match ratio.as_str() {
                "1:1" => Some("square_1_1"),
                "16:9" => Some("widescreen_16_9"),
                "9:16" => Some("social_story_9_16"),
                "4:3" => Some("standard_3_2"),
                _ => None,
            };
            match mapped {
                Some(value) => body["aspect_ratio"] = json!(value),
                None => warnings.push(CallWarning::unsupported(
                    "aspect_ratio",
                    format!("Freepik does not support ratio '{ratio}'; using the default"),
                )),
            }
        }
        if request.size.is_some() {
            warnings.push(CallWarning::unsupported(
                "size",
                "Freepik takes an aspect ratio, not an explicit size",
            ));
        }
        if request.count > 1 {
            warnings.push(CallWarning::unsupported(
                "count",
                "Freepik Mystic produces one image per task",
            ));
        }
        if request.negative_prompt.is_some() {
            warnings.push(CallWarning::unsupported(
                "negative_prompt",
                "Freepik Mystic has no negative prompt",
            ));
        }
        if let Some(seed) = request.seed {
            body["seed"] = json!(seed);
        }
        if !request.model.is_empty() {
            body["model"] = json!(request.model);
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }

        let task = tasks::run_task(
            &self.config,
            &self.http_client,
            MYSTIC_ENDPOINT,
            &body,
            cancel,
        )
        .await?;

        let url = task.generated_url.ok_or_else(|| {
            ProviderError::ParseError(
                "completed Freepik task carried no generated asset".to_string(),
            )
        })?;

        // Freepik hosts the asset on a CDN; fetch it so callers get bytes.
        let data = crate::utils::http::download_bytes(
            &self.http_client,
            &url,
            reqwest::header::HeaderMap::new(),
        )
        .await?;
        let mime_type = crate::utils::mime::guess_mime_from_bytes(&data)
            .or_else(|| crate::utils::mime::guess_mime_from_path_or_url(&url));

        use base64::Engine;
        let b64_data = base64::engine::general_purpose::STANDARD.encode(&data);

        Ok(ImageGenerationResponse {
            metadata: ResponseMetadata {
                id: Some(task.task_id),
                model: Some(if request.model.is_empty() {
                    "mystic".to_string()
                } else {
                    request.model
                }),
                created: Some(chrono::Utc::now()),
                provider: "freepik".to_string(),
            },
            images: vec![GeneratedImage {
                url: Some(url),
                b64_data: Some(b64_data),
                mime_type,
            }],
            warnings,
        })
    }
}
