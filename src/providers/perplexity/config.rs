//! Perplexity provider configuration

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::types::HttpConfig;

/// Default Perplexity API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Configuration for the Perplexity provider.
#[derive(Clone)]
pub struct PerplexityConfig {
    /// API key
    pub api_key: SecretString,
    /// API base URL (no trailing slash)
    pub base_url: String,
    /// Shared HTTP configuration
    pub http_config: HttpConfig,
}

impl PerplexityConfig {
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
        Ok(Self::new(resolver.resolve("perplexity")?))
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request headers for every Perplexity call.
    pub fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = crate::utils::http::header_map(&self.http_config.headers)?;
        let auth = format!("Bearer {}", self.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|e| ProviderError::ConfigurationError(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }

    /// Join an endpoint path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
