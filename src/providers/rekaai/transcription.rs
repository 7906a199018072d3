//! Reka AI transcription
//!
//! Reka has no dedicated speech-to-text endpoint; audio goes through the
//! multimodal `/chat` endpoint as an `audio_url` content part with a
//! transcription instruction. Inline bytes are wrapped in a data URL.

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};

use super::config::RekaConfig;
use crate::error::ProviderError;
use crate::traits::TranscriptionCapability;
use crate::types::{ResponseMetadata, TranscriptionRequest, TranscriptionResponse};

const DEFAULT_INSTRUCTION: &str = "Transcribe this audio verbatim.";

/// Transcription capability routed through the multimodal chat endpoint.
#[derive(Clone)]
pub struct RekaTranscription {
    config: RekaConfig,
    http_client: reqwest::Client,
}

impl RekaTranscription {
    pub fn new(config: RekaConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn audio_url(request: &TranscriptionRequest) -> Result<String, ProviderError> {
        if let Some(url) = &request.audio_url {
            return Ok(url.clone());
        }
        if let Some(bytes) = &request.audio {
            let mime = crate::utils::mime::guess_mime_from_bytes(bytes)
                .or_else(|| {
                    request
                        .file_name
                        .as_deref()
                        .and_then(crate::utils::mime::guess_mime_from_path_or_url)
                })
                .unwrap_or_else(|| "audio/mpeg".to_string());
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            return Ok(format!("data:{mime};base64,{encoded}"));
        }
        Err(ProviderError::ConfigurationError(
            "transcription requires audio bytes or an audio URL".to_string(),
        ))
    }

    fn build_request_body(request: &TranscriptionRequest) -> Result<Value, ProviderError> {
        let instruction = request
            .prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string());

        let mut body = json!({
            "model": request.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "audio_url", "audio_url": Self::audio_url(request)? },
                    { "type": "text", "text": instruction },
                ],
            }],
        });
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }
        Ok(body)
    }
}

#[async_trait]
impl TranscriptionCapability for RekaTranscription {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ProviderError> {
        if request.model.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "transcription request requires a model".to_string(),
            ));
        }
        let body = Self::build_request_body(&request)?;
        let url = self.config.url("chat");
        let response =
            crate::utils::http::post_json(&self.http_client, &url, self.config.headers()?, &body)
                .await?;

        Ok(TranscriptionResponse {
            metadata: ResponseMetadata {
                id: response
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                model: Some(request.model.clone()),
                created: Some(chrono::Utc::now()),
                provider: "rekaai".to_string(),
            },
            text: response
                .pointer("/responses/0/message/content")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            language: request.language.clone(),
            duration: None,
            segments: Vec::new(),
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_audio_becomes_a_data_url() {
        let mut request = TranscriptionRequest::from_bytes("reka-core", vec![1, 2, 3]);
        request.file_name = Some("clip.mp3".to_string());
        let body = RekaTranscription::build_request_body(&request).unwrap();
        let url = body["messages"][0]["content"][0]["audio_url"]
            .as_str()
            .unwrap();
        assert!(url.starts_with("data:audio/mpeg;base64,"));
    }

    #[test]
    fn custom_prompt_overrides_the_instruction() {
        let mut request = TranscriptionRequest::from_url("reka-core", "https://host/a.mp3");
        request.prompt = Some("Transcribe, keeping filler words.".to_string());
        let body = RekaTranscription::build_request_body(&request).unwrap();
        assert_eq!(
            body["messages"][0]["content"][1]["text"],
            json!("Transcribe, keeping filler words.")
        );
    }

    #[test]
    fn missing_audio_is_rejected() {
        let request = TranscriptionRequest {
            model: "reka-core".to_string(),
            ..Default::default()
        };
        assert!(RekaTranscription::build_request_body(&request).is_err());
    }
}
