//! Unified chat types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::{CallWarning, FinishReason, ResponseMetadata, Usage};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
    /// Tool execution result
    Tool,
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced the message
    pub role: MessageRole,
    /// Text content
    pub content: String,
    /// Tool calls requested by the assistant, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Id of the tool call this message answers (role = tool)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// A tool (function) the model may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for the arguments
    pub parameters: serde_json::Value,
}

/// A resolved tool call emitted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Vendor-assigned call id
    pub id: String,
    /// Function name
    pub name: String,
    /// Fully accumulated JSON arguments text
    pub arguments: String,
}

/// A source/citation attached to a search-augmented answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Source URL
    pub url: String,
    /// Page title, when the vendor reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Unified chat request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Target model id
    pub model: String,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Tools the model may call
    pub tools: Option<Vec<Tool>>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Nucleus sampling
    pub top_p: Option<f32>,
    /// Output token budget
    pub max_tokens: Option<u32>,
    /// Provider-specific passthrough fields, merged into the request body
    pub extra_params: HashMap<String, serde_json::Value>,
}

impl ChatRequest {
    /// Create a request for `model` with the given messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }
}

/// Unified chat response.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Response metadata
    pub metadata: ResponseMetadata,
    /// Assistant text
    pub content: String,
    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// Sources cited by search-augmented vendors
    pub sources: Vec<SourceReference>,
    /// Token usage
    pub usage: Option<Usage>,
    /// Why generation stopped
    pub finish_reason: Option<FinishReason>,
    /// Best-effort degradation warnings
    pub warnings: Vec<CallWarning>,
}
