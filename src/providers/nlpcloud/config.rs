//! NLP Cloud provider configuration
//!
//! NLP Cloud routes by model: every endpoint lives under
//! `/v1/gpu/{model}/...`, and authentication uses a `Token` scheme rather
//! than `Bearer`.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::types::HttpConfig;

/// Default NLP Cloud API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.nlpcloud.io/v1";

/// Configuration for the NLP Cloud provider.
#[derive(Clone)]
pub struct NlpCloudConfig {
    /// API key
    pub api_key: SecretString,
    /// API base URL (no trailing slash)
    pub base_url: String,
    /// Shared HTTP configuration
    pub http_config: HttpConfig,
}

impl NlpCloudConfig {
    /// Configuration with the default base URL.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_config: HttpConfig::default(),
        }
    }

    /// Resolve the key through an [`ApiKeyResolver`].
    pub fn from_resolver(resolver: &dyn ApiKeyResolver) -> Result<Self, ProviderError> {
        Ok(Self::new(resolver.resolve("nlpcloud")?))
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request headers for every NLP Cloud call.
    pub fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = crate::utils::http::header_map(&self.http_config.headers)?;
        let auth = format!("Token {}", self.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|e| ProviderError::ConfigurationError(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }

    /// URL for `operation` on `model`, e.g. `gpu/{model}/chatbot`.
    pub fn model_url(&self, model: &str, operation: &str) -> Result<String, ProviderError> {
        if model.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "NLP Cloud requests require a model".to_string(),
            ));
        }
        Ok(format!(
            "{}/gpu/{}/{}",
            self.base_url.trim_end_matches('/'),
            model,
            operation
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_url_routes_through_gpu_prefix() {
        let config = NlpCloudConfig::new(SecretString::from("k"));
        assert_eq!(
            config.model_url("finetuned-llama-3-70b", "chatbot").unwrap(),
            "https://api.nlpcloud.io/v1/gpu/finetuned-llama-3-70b/chatbot"
        );
    }

    #[test]
    fn model_url_requires_a_model() {
        let config = NlpCloudConfig::new(SecretString::from("k"));
        assert!(config.model_url("", "chatbot").is_err());
    }
}
