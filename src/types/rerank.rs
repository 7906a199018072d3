//! Unified reranking types

use serde::{Deserialize, Serialize};

use super::common::ResponseMetadata;

/// Unified rerank request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RerankRequest {
    /// Target model id
    pub model: String,
    /// Search query
    pub query: String,
    /// Candidate documents to order by relevance
    pub documents: Vec<String>,
    /// Keep only the best `top_n` results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    /// Whether to echo document text in results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_documents: Option<bool>,
}

/// One reranked document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankResult {
    /// Index into the request's `documents`
    pub index: usize,
    /// Relevance score, higher is more relevant
    pub relevance_score: f64,
    /// Document text, when `return_documents` was set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Unified rerank response, ordered by descending relevance.
#[derive(Debug, Clone, Default)]
pub struct RerankResponse {
    /// Response metadata
    pub metadata: ResponseMetadata,
    /// Reranked documents
    pub results: Vec<RerankResult>,
}
