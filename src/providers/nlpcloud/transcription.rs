//! NLP Cloud speech-to-text (asr)

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};

use super::config::NlpCloudConfig;
use crate::error::ProviderError;
use crate::traits::TranscriptionCapability;
use crate::types::{
    ResponseMetadata, TranscriptionRequest, TranscriptionResponse, TranscriptionSegment,
};

/// Transcription capability backed by `gpu/{model}/asr`.
///
/// Audio goes up either as a hosted URL or as a base64 `encoded_file`;
/// exactly one of the two must be present on the request.
#[derive(Clone)]
pub struct NlpCloudTranscription {
    config: NlpCloudConfig,
    http_client: reqwest::Client,
}

impl NlpCloudTranscription {
    pub fn new(config: NlpCloudConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn build_request_body(request: &TranscriptionRequest) -> Result<Value, ProviderError> {
        let mut body = match (&request.audio_url, &request.audio) {
            (Some(url), _) => json!({ "url": url }),
            (None, Some(bytes)) => json!({
                "encoded_file": base64::engine::general_purpose::STANDARD.encode(bytes),
            }),
            (None, None) => {
                return Err(ProviderError::ConfigurationError(
                    "transcription requires audio bytes or an audio URL".to_string(),
                ))
            }
        };
        if let Some(language) = &request.language {
            body["input_language"] = json!(language);
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }
        Ok(body)
    }
}

#[async_trait]
impl TranscriptionCapability for NlpCloudTranscription {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, ProviderError> {
        let body = Self::build_request_body(&request)?;
        let url = self.config.model_url(&request.model, "asr")?;
        let response =
            crate::utils::http::post_json(&self.http_client, &url, self.config.headers()?, &body)
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
            metadata: ResponseMetadata {
                id: None,
                model: Some(request.model.clone()),
                created: Some(chrono::Utc::now()),
                provider: "nlpcloud".to_string(),
            },
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_bytes_are_base64_encoded() {
        let request = TranscriptionRequest::from_bytes("whisper", vec![1, 2, 3]);
        let body = NlpCloudTranscription::build_request_body(&request).unwrap();
        assert_eq!(body["encoded_file"], json!("AQID"));
        assert!(body.get("url").is_none());
    }

    #[test]
    fn url_takes_precedence_over_bytes() {
        let mut request = TranscriptionRequest::from_url("whisper", "https://host/a.mp3");
        request.audio = Some(vec![1]);
        let body = NlpCloudTranscription::build_request_body(&request).unwrap();
        assert_eq!(body["url"], json!("https://host/a.mp3"));
        assert!(body.get("encoded_file").is_none());
    }

    #[test]
    fn missing_audio_is_rejected() {
        let request = TranscriptionRequest {
            model: "whisper".to_string(),
            ..Default::default()
        };
        let err = NlpCloudTranscription::build_request_body(&request).unwrap_err();
        assert!(matches!(err, ProviderError::ConfigurationError(_)));
    }
}
