//! OpenAI realtime session tokens

use async_trait::async_trait;
use serde_json::json;

use super::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::traits::RealtimeCapability;
use crate::types::{RealtimeSessionRequest, RealtimeSessionResponse, ResponseMetadata};

/// Realtime capability backed by `/realtime/client_secrets`.
#[derive(Clone)]
pub struct OpenAiRealtime {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiRealtime {
    pub fn new(config: OpenAiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl RealtimeCapability for OpenAiRealtime {
    async fn create_realtime_session(
        &self,
        request: RealtimeSessionRequest,
    ) -> Result<RealtimeSessionResponse, ProviderError> {
        let mut session = json!({
            "type": "realtime",
            "model": request.model,
        });
        if let Some(voice) = &request.voice {
            session["audio"] = json!({ "output": { "voice": voice } });
        }
        if let Some(instructions) = &request.instructions {
            session["instructions"] = json!(instructions);
        }
        for (key, value) in &request.extra_params {
            session[key.as_str()] = value.clone();
        }

        let url = self.config.url("realtime/client_secrets");
        let response = crate::utils::http::post_json(
            &self.http_client,
            &url,
            self.config.headers()?,
            &json!({ "session": session }),
        )
        .await?;

        let client_secret = response
            .get("value")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ProviderError::ParseError(
                    "realtime session response is missing the client secret".to_string(),
                )
            })?
            .to_string();

        let expires_at = response
            .get("expires_at")
            .and_then(|v| v.as_i64())
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0));

        Ok(RealtimeSessionResponse {
            metadata: ResponseMetadata {
                id: None,
                model: Some(request.model),
                created: Some(chrono::Utc::now()),
                provider: "openai".to_string(),
            },
            client_secret,
            expires_at,
            session_id: response
                .pointer("/session/id")
                .and_then(|v| v.as_str())
                .map(String::from),
        })
    }
}
