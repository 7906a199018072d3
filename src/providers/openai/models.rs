//! OpenAI model listing

use async_trait::async_trait;

use super::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::traits::ModelListingCapability;
use crate::types::ModelInfo;

/// Model listing backed by `/models`.
#[derive(Clone)]
pub struct OpenAiModels {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiModels {
    pub fn new(config: OpenAiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl ModelListingCapability for OpenAiModels {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let url = self.config.url("models");
        let response =
            crate::utils::http::get_json(&self.http_client, &url, self.config.headers()?).await?;

        Ok(response
            .get("data")
            .and_then(|v| v.as_array())
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| {
                        Some(ModelInfo {
                            id: m.get("id")?.as_str()?.to_string(),
                            provider: "openai".to_string(),
                            display_name: None,
                            created: m
                                .get("created")
                                .and_then(|v| v.as_i64())
                                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
                            capabilities: Vec::new(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
