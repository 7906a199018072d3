//! OpenAI speech synthesis and transcription

use async_trait::async_trait;
use serde_json::json;

use super::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::traits::{SpeechCapability, TranscriptionCapability};
use crate::types::{
    ResponseMetadata, SpeechRequest, SpeechResponse, TranscriptionRequest, TranscriptionResponse,
    TranscriptionSegment,
};

/// Speech + transcription backed by `/audio/speech` and
/// `/audio/transcriptions`.
#[derive(Clone)]
pub struct OpenAiAudio {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiAudio {
    pub fn new(config: OpenAiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn metadata(&self, model: &str) -> ResponseMetadata {
        ResponseMetadata {
            id: None,
            model: Some(model.to_string()),
            created: Some(chrono::Utc::now()),
            provider: "openai".to_string(),
        }
    }
}

#[async_trait]
impl SpeechCapability for OpenAiAudio {
    async fn generate_speech(
        &self,
        request: SpeechRequest,
    ) -> Result<SpeechResponse, ProviderError> {
        if request.input.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "speech request requires input text".to_string(),
            ));
        }

        let format = request.format.clone().unwrap_or_else(|| "mp3".to_string());
        let mut body = json!({
            "model": request.model,
            "input": request.input,
            "voice": request.voice.as_deref().unwrap_or("alloy"),
            "response_format": format,
        });
        if let Some(speed) = request.speed {
            body["speed"] = json!(speed);
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }

        let url = self.config.url("audio/speech");
        let audio = crate::utils::http::post_for_bytes(
            &self.http_client,
            &url,
            self.config.headers()?,
            &body,
        )
        .await?;

        let mime_type = crate::utils::mime::guess_mime_from_bytes(&audio)
            .or_else(|| crate::utils::mime::guess_mime_from_path_or_url(&format!("a.{format}")));

        Ok(SpeechResponse {
            metadata: self.metadata(&request.model),
            audio,
            mime_type,
            warnings: Vec::new(),
        })
    }
}

#[async_trait]
impl TranscriptionCapability for OpenAiAudio {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ProviderError> {
        let audio = request.audio.clone().ok_or_else(|| {
            ProviderError::ConfigurationError(
                "OpenAI transcription requires inline audio bytes".to_string(),
            )
        })?;

        let file_name = request
            .file_name
            .clone()
            .unwrap_or_else(|| "audio.mp3".to_string());
        let mime = crate::utils::mime::guess_mime_from_bytes(&audio)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| ProviderError::ConfigurationError(format!("Invalid MIME type: {e}")))?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", request.model.clone())
            .text("response_format", "verbose_json")
            .part("file", part);
        if let Some(language) = &request.language {
            form = form.text("language", language.clone());
        }
        if let Some(prompt) = &request.prompt {
            form = form.text("prompt", prompt.clone());
        }

        let url = self.config.url("audio/transcriptions");
        let response = crate::utils::http::post_multipart(
            &self.http_client,
            &url,
            self.config.headers()?,
            form,
        )
        .await?;

        let segments = response
            .get("segments")
            .and_then(|v| v.as_array())
            .map(|segments| {
                segments
                    .iter()
                    .map(|s| TranscriptionSegment {
                        text: s
                            .get("text")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                        start: s.get("start").and_then(|v| v.as_f64()),
                        end: s.get("end").and_then(|v| v.as_f64()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(TranscriptionResponse {
            metadata: self.metadata(&request.model),
            text: response
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            language: response
                .get("language")
                .and_then(|v| v.as_str())
                .map(String::from),
            duration: response.get("duration").and_then(|v| v.as_f64()),
            segments,
            warnings: Vec::new(),
        })
    }
}
