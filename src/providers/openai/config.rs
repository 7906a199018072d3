//! OpenAI provider configuration

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::types::HttpConfig;

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI provider.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key
    pub api_key: SecretString,
    /// API base URL (no trailing slash)
    pub base_url: String,
    /// Optional organization id
    pub organization: Option<String>,
    /// Optional project id
    pub project: Option<String>,
    /// Shared HTTP configuration
    pub http_config: HttpConfig,
}

impl OpenAiConfig {
    /// Configuration with the default base URL.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
            project: None,
            http_config: HttpConfig::default(),
        }
    }

    /// Resolve the key through an [`ApiKeyResolver`].
    pub fn from_resolver(resolver: &dyn ApiKeyResolver) -> Result<Self, ProviderError> {
        Ok(Self::new(resolver.resolve("openai")?))
    }

    /// Override the base URL (Azure-style gateways, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the organization header.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the project header.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Request headers for every OpenAI call.
    pub fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = crate::utils::http::header_map(&self.http_config.headers)?;
        let auth = format!("Bearer {}", self.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|e| ProviderError::ConfigurationError(format!("Invalid API key: {e}")))?,
        );
        if let Some(org) = &self.organization {
            headers.insert(
                "OpenAI-Organization",
                HeaderValue::from_str(org).map_err(|e| {
                    ProviderError::ConfigurationError(format!("Invalid organization: {e}"))
                })?,
            );
        }
        if let Some(project) = &self.project {
            headers.insert(
                "OpenAI-Project",
                HeaderValue::from_str(project).map_err(|e| {
                    ProviderError::ConfigurationError(format!("Invalid project: {e}"))
                })?,
            );
        }
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
