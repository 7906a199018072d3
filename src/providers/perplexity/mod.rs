//! Perplexity provider
//!
//! Search-augmented chat on the OpenAI wire shape. Responses cite their
//! sources; the translator surfaces them as `Source` events.

pub mod chat;
pub mod config;
pub mod streaming;

pub use config::PerplexityConfig;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::traits::{ChatCapability, ModelListingCapability, ModelProvider};
use crate::types::ModelInfo;

/// Perplexity provider exposing search-grounded chat.
pub struct PerplexityProvider {
    chat: chat::PerplexityChat,
    catalog: PerplexityCatalog,
}

impl PerplexityProvider {
    /// Build a provider from configuration.
    pub fn new(config: PerplexityConfig) -> Result<Self, ProviderError> {
        let http_client = crate::utils::http::build_http_client(&config.http_config)?;
        Ok(Self {
            chat: chat::PerplexityChat::new(config, http_client),
            catalog: PerplexityCatalog,
        })
    }

    /// Build a provider resolving the key through `resolver`.
    pub fn from_resolver(resolver: &dyn ApiKeyResolver) -> Result<Self, ProviderError> {
        Self::new(PerplexityConfig::from_resolver(resolver)?)
    }
}

impl ModelProvider for PerplexityProvider {
    fn provider_id(&self) -> &'static str {
        "perplexity"
    }

    fn provider_name(&self) -> &'static str {
        "Perplexity"
    }

    fn chat(&self) -> Option<&dyn ChatCapability> {
        Some(&self.chat)
    }

    fn models(&self) -> Option<&dyn ModelListingCapability> {
        Some(&self.catalog)
    }
}

/// Static catalog; Perplexity has no model-listing endpoint.
struct PerplexityCatalog;

#[async_trait]
impl ModelListingCapability for PerplexityCatalog {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        Ok(vec![
            ModelInfo::new("sonar", "perplexity", &["chat"]),
            ModelInfo::new("sonar-pro", "perplexity", &["chat"]),
            ModelInfo::new("sonar-reasoning", "perplexity", &["chat"]),
        ])
    }
}
