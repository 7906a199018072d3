//! Freepik provider
//!
//! All Freepik generation endpoints are long-running tasks: create, poll
//! until terminal, download the generated asset. Chat-style capabilities
//! are absent.

pub mod config;
pub mod images;
pub mod tasks;
pub mod video;

pub use config::FreepikConfig;
pub use tasks::{FreepikTask, FreepikTaskStatus};

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::keys::ApiKeyResolver;
use crate::traits::{
    ImageGenerationCapability, ModelListingCapability, ModelProvider, VideoGenerationCapability,
};
use crate::types::ModelInfo;

/// Freepik provider exposing image and video generation.
pub struct FreepikProvider {
    images: images::FreepikImages,
    video: video::FreepikVideo,
    catalog: FreepikCatalog,
}

impl FreepikProvider {
    /// Build a provider from configuration.
    pub fn new(config: FreepikConfig) -> Result<Self, ProviderError> {
        let http_client = crate::utils::http::build_http_client(&config.http_config)?;
        Ok(Self {
            images: images::FreepikImages::new(config.clone(), http_client.clone()),
            video: video::FreepikVideo::new(config, http_client),
            catalog: FreepikCatalog,
        })
    }

    /// Build a provider resolving the key through `resolver`.
    pub fn from_resolver(resolver: &dyn ApiKeyResolver) -> Result<Self, ProviderError> {
        Self::new(FreepikConfig::from_resolver(resolver)?)
    }
}

impl ModelProvider for FreepikProvider {
    fn provider_id(&self) -> &'static str {
        "freepik"
    }

    fn provider_name(&self) -> &'static str {
        "Freepik"
    }

    fn images(&self) -> Option<&dyn ImageGenerationCapability> {
        Some(&self.images)
    }

    fn video(&self) -> Option<&dyn VideoGenerationCapability> {
        Some(&self.video)
    }

    fn models(&self) -> Option<&dyn ModelListingCapability> {
        Some(&self.catalog)
    }
}

/// Static catalog; Freepik has no model-listing endpoint.
struct FreepikCatalog;

#[async_trait]
impl ModelListingCapability for FreepikCatalog {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        Ok(vec![
            ModelInfo::new("mystic", "freepik", &["image"]),
            ModelInfo::new("kling-v2", "freepik", &["video"]),
        ])
    }
}
