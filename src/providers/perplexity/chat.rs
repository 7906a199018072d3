//! Perplexity chat completions
//!
//! Perplexity speaks the OpenAI chat-completions wire shape and adds
//! search grounding: responses carry `citations` (bare URLs) and
//! `search_results` (url + title objects), which map onto the unified
//! source list.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::config::PerplexityConfig;
use super::streaming::PerplexityChatTranslator;
use crate::error::ProviderError;
use crate::stream::ModelStream;
use crate::traits::ChatCapability;
use crate::types::{
    CallWarning, ChatRequest, ChatResponse, FinishReason, MessageRole, ResponseMetadata,
    SourceReference,
};
use crate::utils::streaming::{SseStreamConfig, StreamFactory};

/// Chat capability backed by `/chat/completions`.
#[derive(Clone)]
pub struct PerplexityChat {
    config: PerplexityConfig,
    http_client: reqwest::Client,
}

impl PerplexityChat {
    pub fn new(config: PerplexityConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub(crate) fn build_request_body(
        request: &ChatRequest,
        stream: bool,
    ) -> Result<(Value, Vec<CallWarning>), ProviderError> {
        if request.model.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "chat request requires a model".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        if request.tools.is_some() {
            warnings.push(CallWarning::unsupported(
                "tools",
                "Perplexity does not support tool calling",
            ));
        }

        let messages: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::Tool)
            .map(|m| {
                json!({
                    "role": match m.role {
                        MessageRole::System => "system",
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                        MessageRole::Tool => unreachable!(),
                    },
                    "content": m.content,
                })
            })
            .collect();

        let mut body = json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = request.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }
        if stream {
            body["stream"] = json!(true);
        }

        Ok((body, warnings))
    }

    fn parse_response(&self, body: &Value, warnings: Vec<CallWarning>) -> ChatResponse {
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let finish_reason = body
            .pointer("/choices/0/finish_reason")
            .and_then(|v| v.as_str())
            .map(FinishReason::from_vendor);

        ChatResponse {
            metadata: ResponseMetadata {
                id: body.get("id").and_then(|v| v.as_str()).map(String::from),
                model: body.get("model").and_then(|v| v.as_str()).map(String::from),
                created: Some(chrono::Utc::now()),
                provider: "perplexity".to_string(),
            },
            content,
            tool_calls: Vec::new(),
            sources: parse_sources(body),
            usage: body
                .get("usage")
                .map(crate::providers::openai::chat::parse_usage),
            finish_reason,
            warnings,
        }
    }
}

/// Collect sources from `search_results` and `citations`, deduplicated by
/// URL. `search_results` wins when both mention the same URL since it
/// carries a title.
pub(crate) fn parse_sources(body: &Value) -> Vec<SourceReference> {
    let mut seen = std::collections::HashSet::new();
    let mut sources = Vec::new();

    if let Some(results) = body.get("search_results").and_then(|v| v.as_array()) {
        for result in results {
            if let Some(url) = result.get("url").and_then(|v| v.as_str()) {
                if seen.insert(url.to_string()) {
                    sources.push(SourceReference {
                        url: url.to_string(),
                        title: result
                            .get("title")
                            .and_then(|v| v.as_str())
                            .map(String::from),
                    });
                }
            }
        }
    }

    if let Some(citations) = body.get("citations").and_then(|v| v.as_array()) {
        for citation in citations {
            if let Some(url) = citation.as_str() {
                if seen.insert(url.to_string()) {
                    sources.push(SourceReference {
                        url: url.to_string(),
                        title: None,
                    });
                }
            }
        }
    }

    sources
}

#[async_trait]
impl ChatCapability for PerplexityChat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let (body, warnings) = Self::build_request_body(&request, false)?;
        let url = self.config.url("chat/completions");
        let response =
            crate::utils::http::post_json(&self.http_client, &url, self.config.headers()?, &body)
                .await?;
        Ok(self.parse_response(&response, warnings))
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ModelStream, ProviderError> {
        let (body, _warnings) = Self::build_request_body(&request, true)?;
        let url = self.config.url("chat/completions");
        let builder = self
            .http_client
            .post(&url)
            .headers(self.config.headers()?)
            .json(&body);
        StreamFactory::sse_stream(
            builder,
            PerplexityChatTranslator::new(),
            SseStreamConfig::new("perplexity chat"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, Tool};

    #[test]
    fn tool_messages_are_dropped_with_a_warning() {
        let mut request = ChatRequest::new("sonar", vec![ChatMessage::user("hi")]);
        request.tools = Some(vec![Tool {
            name: "lookup".to_string(),
            description: None,
            parameters: json!({}),
        }]);
        let (body, warnings) = PerplexityChat::build_request_body(&request, false).unwrap();
        assert!(body.get("tools").is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn sources_are_deduplicated_by_url() {
        let body = json!({
            "citations": ["https://a.example", "https://b.example"],
            "search_results": [
                {"url": "https://a.example", "title": "A"},
            ],
        });
        let sources = parse_sources(&body);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title.as_deref(), Some("A"));
        assert_eq!(sources[1].url, "https://b.example");
        assert!(sources[1].title.is_none());
    }
}
