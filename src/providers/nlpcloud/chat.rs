//! NLP Cloud chatbot
//!
//! The chatbot endpoint takes one `input` plus a `history` of prior
//! input/response pairs and an optional `context` string, so the unified
//! message list is folded into that shape: system messages become the
//! context, earlier user/assistant turns pair up into history, and the
//! trailing user message is the input.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::config::NlpCloudConfig;
use crate::error::ProviderError;
use crate::stream::ModelStream;
use crate::traits::ChatCapability;
use crate::types::{CallWarning, ChatRequest, ChatResponse, MessageRole, ResponseMetadata};
use crate::utils::streaming::StreamFactory;

/// Chat capability backed by `gpu/{model}/chatbot`.
#[derive(Clone)]
pub struct NlpCloudChat {
    config: NlpCloudConfig,
    http_client: reqwest::Client,
}

impl NlpCloudChat {
    pub fn new(config: NlpCloudConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub(crate) fn build_request_body(
        request: &ChatRequest,
        stream: bool,
    ) -> Result<(Value, Vec<CallWarning>), ProviderError> {
        let mut warnings = Vec::new();
        if request.tools.is_some() {
            warnings.push(CallWarning::unsupported(
                "tools",
                "NLP Cloud does not support tool calling",
            ));
        }
        if request.temperature.is_some() || request.top_p.is_some() {
            warnings.push(CallWarning::unsupported(
                "sampling",
                "the NLP Cloud chatbot endpoint does not take sampling parameters",
            ));
        }
        if request.max_tokens.is_some() {
            warnings.push(CallWarning::unsupported(
                "max_tokens",
                "the NLP Cloud chatbot endpoint does not take a token budget",
            ));
        }

        let context: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();

        let mut turns = request
            .messages
            .iter()
            .filter(|m| matches!(m.role, MessageRole::User | MessageRole::Assistant))
            .peekable();

        let mut history = Vec::new();
        let mut input = String::new();
        while let Some(message) = turns.next() {
            match message.role {
                MessageRole::User => {
                    // A user turn directly followed by an assistant reply is
                    // a completed history pair; a trailing user turn is the
                    // new input.
                    let paired = turns
                        .peek()
                        .is_some_and(|next| next.role == MessageRole::Assistant);
                    if paired {
                        let reply = turns.next().map(|m| m.content.clone()).unwrap_or_default();
                        history.push(json!({
                            "input": message.content,
                            "response": reply,
                        }));
                        continue;
                    }
                    input = message.content.clone();
                }
                MessageRole::Assistant => {
                    history.push(json!({ "input": "", "response": message.content }));
                }
                _ => {}
            }
        }

        if input.is_empty() {
            return Err(ProviderError::ConfigurationError(
                "NLP Cloud chat requires a trailing user message".to_string(),
            ));
        }

        let mut body = json!({
            "input": input,
            "history": history,
        });
        if !context.is_empty() {
            body["context"] = json!(context.join("\n"));
        }
        for (key, value) in &request.extra_params {
            body[key.as_str()] = value.clone();
        }
        if stream {
            body["stream"] = json!(true);
        }

        Ok((body, warnings))
    }

    fn parse_response(&self, model: &str, body: &Value, warnings: Vec<CallWarning>) -> ChatResponse {
        ChatResponse {
            metadata: ResponseMetadata {
                id: None,
                model: Some(model.to_string()),
                created: Some(chrono::Utc::now()),
                provider: "nlpcloud".to_string(),
            },
            content: body
                .get("response")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            tool_calls: Vec::new(),
            sources: Vec::new(),
            usage: None,
            finish_reason: None,
            warnings,
        }
    }
}

#[async_trait]
impl ChatCapability for NlpCloudChat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let (body, warnings) = Self::build_request_body(&request, false)?;
        let url = self.config.model_url(&request.model, "chatbot")?;
        let response =
            crate::utils::http::post_json(&self.http_client, &url, self.config.headers()?, &body)
                .await?;
        Ok(self.parse_response(&request.model, &response, warnings))
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ModelStream, ProviderError> {
        let (body, _warnings) = Self::build_request_body(&request, true)?;
        let url = self.config.model_url(&request.model, "chatbot")?;
        let builder = self
            .http_client
            .post(&url)
            .headers(self.config.headers()?)
            .json(&body);
        // NLP Cloud streams raw token text, not SSE JSON frames.
        StreamFactory::chunked_text_stream(builder, "nlpcloud").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn conversation_folds_into_input_history_context() {
        let request = ChatRequest::new(
            "finetuned-llama-3-70b",
            vec![
                ChatMessage::system("You are terse."),
                ChatMessage::user("Hi"),
                ChatMessage::assistant("Hello."),
                ChatMessage::user("How are you?"),
            ],
        );
        let (body, _) = NlpCloudChat::build_request_body(&request, false).unwrap();
        assert_eq!(body["input"], json!("How are you?"));
        assert_eq!(body["context"], json!("You are terse."));
        assert_eq!(body["history"], json!([{"input": "Hi", "response": "Hello."}]));
    }

    #[test]
    fn missing_trailing_user_message_is_rejected() {
        let request = ChatRequest::new(
            "finetuned-llama-3-70b",
            vec![ChatMessage::system("ctx"), ChatMessage::assistant("Hello.")],
        );
        let err = NlpCloudChat::build_request_body(&request, false).unwrap_err();
        assert!(matches!(err, ProviderError::ConfigurationError(_)));
    }

    #[test]
    fn unsupported_settings_degrade_to_warnings() {
        let mut request =
            ChatRequest::new("finetuned-llama-3-70b", vec![ChatMessage::user("hi")]);
        request.temperature = Some(0.2);
        request.max_tokens = Some(100);
        let (_, warnings) = NlpCloudChat::build_request_body(&request, false).unwrap();
        assert_eq!(warnings.len(), 2);
    }
}
