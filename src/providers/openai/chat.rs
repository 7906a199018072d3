//! OpenAI chat completions

use async_trait::async_trait;
use serde_json::{json, Value};

use super::config::OpenAiConfig;
use super::streaming::OpenAiChatTranslator;
use crate::error::ProviderError;
use crate::stream::ModelStream;
use crate::traits::ChatCapability;
use crate::types::{
    ChatRequest, ChatResponse, FinishReason, MessageRole, ResponseMetadata, ToolCall, Usage,
};
use crate::utils::streaming::{SseStreamConfig, StreamFactory};

/// Chat capability backed by `/chat/completions`.
#[derive(Clone)]
pub struct OpenAiChat {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiChat {
    pub fn new(config: OpenAiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub(crate) fn build_request_body(
        request: &ChatRequest,
        stream: bool,
    ) -> Result<Value, ProviderError> {
        if request.model.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "chat request requires a model".to_string(),
            ));
        }

        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                let mut msg = json!({
                    "role": match m.role {
                        MessageRole::System => "system",
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                        MessageRole::Tool => "tool",
                    },
                    "content": m.content,
                });
                if let Some(calls) = &m.tool_calls {
                    msg["tool_calls"] = calls
                        .iter()
                        .map(|c| {
                            json!({
                                "id": c.id,
                                "type": "function",
                                "function": { "name": c.name, "arguments": c.arguments },
                            })
                        })
                        .collect();
                }
                if let Some(id) = &m.tool_call_id {
                    msg["tool_call_id"] = json!(id);
                }
                msg
            })
            .collect();

        let mut body = json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(tools) = &request.tools {
            body["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        },
                    })
                })
                .collect();
        }
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
            body["stream_options"] = json!({ "include_usage": true });
        }

        Ok(body)
    }

    fn parse_response(&self, body: &Value) -> ChatResponse {
        let message = body
            .pointer("/choices/0/message")
            .cloned()
            .unwrap_or(Value::Null);

        let content = message
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let tool_calls = message
            .get("tool_calls")
            .and_then(|v| v.as_array())
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|c| {
                        Some(ToolCall {
                            id: c.get("id")?.as_str()?.to_string(),
                            name: c
                                .pointer("/function/name")
                                .and_then(|v| v.as_str())
                                .unwrap_or("")
                                .to_string(),
                            arguments: c
                                .pointer("/function/arguments")
                                .and_then(|v| v.as_str())
                                .unwrap_or("")
                                .to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = body
            .pointer("/choices/0/finish_reason")
            .and_then(|v| v.as_str())
            .map(FinishReason::from_vendor);

        ChatResponse {
            metadata: ResponseMetadata {
                id: body.get("id").and_then(|v| v.as_str()).map(String::from),
                model: body.get("model").and_then(|v| v.as_str()).map(String::from),
                created: Some(chrono::Utc::now()),
                provider: "openai".to_string(),
            },
            content,
            tool_calls,
            sources: Vec::new(),
            usage: body.get("usage").map(parse_usage),
            finish_reason,
            warnings: Vec::new(),
        }
    }
}

pub(crate) fn parse_usage(usage: &Value) -> Usage {
    Usage {
        prompt_tokens: usage
            .get("prompt_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        completion_tokens: usage
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        total_tokens: usage
            .get("total_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        cached_tokens: usage
            .pointer("/prompt_tokens_details/cached_tokens")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32),
        reasoning_tokens: usage
            .pointer("/completion_tokens_details/reasoning_tokens")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32),
    }
}

#[async_trait]
impl ChatCapability for OpenAiChat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = Self::build_request_body(&request, false)?;
        let url = self.config.url("chat/completions");
        let response =
            crate::utils::http::post_json(&self.http_client, &url, self.config.headers()?, &body)
                .await?;
        Ok(self.parse_response(&response))
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ModelStream, ProviderError> {
        let body = Self::build_request_body(&request, true)?;
        let url = self.config.url("chat/completions");
        let builder = self
            .http_client
            .post(&url)
            .headers(self.config.headers()?)
            .json(&body);
        StreamFactory::sse_stream(
            builder,
            OpenAiChatTranslator::new(),
            SseStreamConfig::new("openai chat"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn request_body_includes_stream_options() {
        let request = ChatRequest::new("gpt-4o-mini", vec![ChatMessage::user("hi")]);
        let body = OpenAiChat::build_request_body(&request, true).unwrap();
        assert_eq!(body["stream"], json!(true));
        assert_eq!(body["stream_options"]["include_usage"], json!(true));
    }

    #[test]
    fn request_body_rejects_missing_model() {
        let request = ChatRequest::default();
        let err = OpenAiChat::build_request_body(&request, false).unwrap_err();
        assert!(matches!(err, ProviderError::ConfigurationError(_)));
    }

    #[test]
    fn extra_params_pass_through() {
        let mut request = ChatRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
        request
            .extra_params
            .insert("presence_penalty".to_string(), json!(0.5));
        let body = OpenAiChat::build_request_body(&request, false).unwrap();
        assert_eq!(body["presence_penalty"], json!(0.5));
    }
}
