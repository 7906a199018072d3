//! Reka AI chat

use async_trait::async_trait;
use serde_json::{json, Value};

use super::config::RekaConfig;
use super::streaming::RekaChatTranslator;
use crate::error::ProviderError;
use crate::stream::ModelStream;
use crate::traits::ChatCapability;
use crate::types::{
    CallWarning, ChatRequest, ChatResponse, FinishReason, MessageRole, ResponseMetadata, Usage,
};
use crate::utils::streaming::{SseStreamConfig, StreamFactory};

/// Chat capability backed by `/chat`.
#[derive(Clone)]
pub struct RekaChat {
    config: RekaConfig,
    http_client: reqwest::Client,
}

impl RekaChat {
    pub fn new(config: RekaConfig, http_client: reqwest::Client) -> Self {
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
                "Reka AI does not support tool calling",
            ));
        }

        // Reka has no system role; system instructions are folded into the
        // first user message.
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        let mut system_prefix = if system.is_empty() {
            None
        } else {
            Some(system.join("\n"))
        };

        let messages: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| matches!(m.role, MessageRole::User | MessageRole::Assistant))
            .map(|m| {
                let mut content = m.content.clone();
                if m.role == MessageRole::User {
                    if let Some(prefix) = system_prefix.take() {
                        content = format!("{prefix}\n\n{content}");
                    }
                }
                json!({
                    "role": match m.role {
                        MessageRole::User => "user",
                        _ => "assistant",
                    },
                    "content": content,
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
            .pointer("/responses/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let finish_reason = body
            .pointer("/responses/0/finish_reason")
            .and_then(|v| v.as_str())
            .map(FinishReason::from_vendor);

        ChatResponse {
            metadata: ResponseMetadata {
                id: body.get("id").and_then(|v| v.as_str()).map(String::from),
                model: body.get("model").and_then(|v| v.as_str()).map(String::from),
                created: Some(chrono::Utc::now()),
                provider: "rekaai".to_string(),
            },
            content,
            tool_calls: Vec::new(),
            sources: Vec::new(),
            usage: body.get("usage").map(parse_usage),
            finish_reason,
            warnings,
        }
    }
}

/// Reka reports `input_tokens`/`output_tokens`.
pub(crate) fn parse_usage(usage: &Value) -> Usage {
    let prompt = usage
        .get("input_tokens")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;
    let completion = usage
        .get("output_tokens")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;
    Usage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: prompt + completion,
        ..Default::default()
    }
}

#[async_trait]
impl ChatCapability for RekaChat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let (body, warnings) = Self::build_request_body(&request, false)?;
        let url = self.config.url("chat");
        let response =
            crate::utils::http::post_json(&self.http_client, &url, self.config.headers()?, &body)
                .await?;
        Ok(self.parse_response(&response, warnings))
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ModelStream, ProviderError> {
        let (body, _warnings) = Self::build_request_body(&request, true)?;
        let url = self.config.url("chat");
        let builder = self
            .http_client
            .post(&url)
            .headers(self.config.headers()?)
            .json(&body);
        StreamFactory::sse_stream(
            builder,
            RekaChatTranslator::new(),
            SseStreamConfig::new("rekaai chat"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn system_messages_fold_into_first_user_turn() {
        let request = ChatRequest::new(
            "reka-core",
            vec![
                ChatMessage::system("Be brief."),
                ChatMessage::user("Hello"),
                ChatMessage::assistant("Hi."),
                ChatMessage::user("Bye"),
            ],
        );
        let (body, _) = RekaChat::build_request_body(&request, false).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["content"], json!("Be brief.\n\nHello"));
        assert_eq!(messages[2]["content"], json!("Bye"));
    }

    #[test]
    fn usage_total_is_derived_from_io_tokens() {
        let usage = parse_usage(&json!({"input_tokens": 12, "output_tokens": 30}));
        assert_eq!(usage.total_tokens, 42);
    }
}
