//! OpenAI-compatible document reranking
//!
//! OpenAI itself does not rerank; this targets the `/rerank` endpoint
//! exposed by OpenAI-compatible gateways and is available whenever the
//! provider is pointed at such a base URL.

use async_trait::async_trait;
use serde_json::json;

use super::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::traits::RerankCapability;
use crate::types::{RerankRequest, RerankResponse, RerankResult, ResponseMetadata};

/// Rerank capability backed by an OpenAI-compatible `/rerank` endpoint.
#[derive(Clone)]
pub struct OpenAiRerank {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiRerank {
    pub fn new(config: OpenAiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl RerankCapability for OpenAiRerank {
    async fn rerank(&self, request: RerankRequest) -> Result<RerankResponse, ProviderError> {
        if request.documents.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "rerank request requires at least one document".to_string(),
            ));
        }

        let mut body = json!({
            "model": request.model,
            "query": request.query,
            "documents": request.documents,
        });
        if let Some(top_n) = request.top_n {
            body["top_n"] = json!(top_n);
        }
        if let Some(return_documents) = request.return_documents {
            body["return_documents"] = json!(return_documents);
        }

        let url = self.config.url("rerank");
        let response =
            crate::utils::http::post_json(&self.http_client, &url, self.config.headers()?, &body)
                .await?;

        let results = response
            .get("results")
            .and_then(|v| v.as_array())
            .map(|results| {
                results
                    .iter()
                    .filter_map(|r| {
                        Some(RerankResult {
                            index: r.get("index")?.as_u64()? as usize,
                            relevance_score: r
                                .get("relevance_score")
                                .and_then(|v| v.as_f64())
                                .unwrap_or(0.0),
                            document: r
                                .pointer("/document/text")
                                .or_else(|| r.get("document"))
                                .and_then(|v| v.as_str())
                                .map(String::from),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(RerankResponse {
            metadata: ResponseMetadata {
                id: response.get("id").and_then(|v| v.as_str()).map(String::from),
                model: Some(request.model),
                created: Some(chrono::Utc::now()),
                provider: "openai".to_string(),
            },
            results,
        })
    }
}
