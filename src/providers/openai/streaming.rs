//! OpenAI chat stream translation
//!
//! OpenAI streams tool-call arguments incrementally: the first chunk for a
//! call carries its id and function name, later chunks are keyed by choice
//! index and append argument text. The accumulation map lives inside the
//! translator, so it is scoped to one streaming call and concurrent
//! streams on the same provider cannot interfere.

use std::collections::HashMap;

use crate::error::ProviderError;
use crate::stream::{FrameTranslator, StreamEvent, StreamState};
use crate::types::FinishReason;

#[derive(Debug, Default)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Translator for `/chat/completions` SSE frames.
pub struct OpenAiChatTranslator {
    state: StreamState,
    /// In-flight tool calls keyed by tool-call index within the choice.
    pending_tool_calls: HashMap<u64, PendingToolCall>,
}

impl OpenAiChatTranslator {
    pub fn new() -> Self {
        Self {
            state: StreamState::new("openai"),
            pending_tool_calls: HashMap::new(),
        }
    }

    fn flush_tool_calls(&mut self) -> Vec<StreamEvent> {
        let mut pending: Vec<_> = self.pending_tool_calls.drain().collect();
        pending.sort_by_key(|(index, _)| *index);
        pending
            .into_iter()
            .flat_map(|(_, call)| {
                self.state
                    .tool_call_complete(&call.id, &call.name, &call.arguments)
            })
            .collect()
    }
}

impl Default for OpenAiChatTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTranslator for OpenAiChatTranslator {
    fn on_frame(&mut self, frame: &serde_json::Value) -> Result<Vec<StreamEvent>, ProviderError> {
        let mut events = self.state.start(
            frame.get("id").and_then(|v| v.as_str()).map(String::from),
            frame.get("model").and_then(|v| v.as_str()).map(String::from),
        );

        let choice = frame.pointer("/choices/0");

        if let Some(delta) = choice.and_then(|c| c.get("delta")) {
            if let Some(content) = delta.get("content").and_then(|v| v.as_str()) {
                events.extend(self.state.text_delta(content));
            }

            if let Some(calls) = delta.get("tool_calls").and_then(|v| v.as_array()) {
                for call in calls {
                    let index = call.get("index").and_then(|v| v.as_u64()).unwrap_or(0);
                    let entry = self.pending_tool_calls.entry(index).or_default();
                    if let Some(id) = call.get("id").and_then(|v| v.as_str()) {
                        entry.id = id.to_string();
                    }
                    if let Some(name) = call.pointer("/function/name").and_then(|v| v.as_str()) {
                        entry.name.push_str(name);
                    }
                    if let Some(args) =
                        call.pointer("/function/arguments").and_then(|v| v.as_str())
                    {
                        entry.arguments.push_str(args);
                    }
                    if !entry.id.is_empty() {
                        let (id, name) = (entry.id.clone(), entry.name.clone());
                        events.extend(self.state.tool_call_start(&id, &name));
                    }
                }
            }
        }

        if let Some(reason) = choice
            .and_then(|c| c.get("finish_reason"))
            .and_then(|v| v.as_str())
        {
            self.state
                .record_finish_reason(FinishReason::from_vendor(reason));
            // Arguments are complete once the choice reports a finish reason.
            events.extend(self.flush_tool_calls());
        }

        if let Some(usage) = frame.get("usage").filter(|v| !v.is_null()) {
            self.state
                .record_usage(&super::chat::parse_usage(usage));
        }

        Ok(events)
    }

    fn on_end(&mut self) -> Vec<StreamEvent> {
        let mut events = self.flush_tool_calls();
        events.extend(self.state.finish());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frames_to_events(frames: &[serde_json::Value]) -> Vec<StreamEvent> {
        let mut translator = OpenAiChatTranslator::new();
        let mut events = Vec::new();
        for frame in frames {
            events.extend(translator.on_frame(frame).expect("frame"));
        }
        events.extend(translator.on_end());
        events
    }

    #[test]
    fn text_deltas_are_bracketed() {
        let events = frames_to_events(&[
            json!({"id":"chatcmpl-1","model":"gpt-4o","choices":[{"delta":{"content":"Hello"}}]}),
            json!({"choices":[{"delta":{"content":" world"}}]}),
        ]);

        assert!(matches!(events[0], StreamEvent::StreamStart { .. }));
        assert!(matches!(events[1], StreamEvent::TextStart { .. }));
        assert!(matches!(events[2], StreamEvent::TextDelta { ref delta, .. } if delta == "Hello"));
        assert!(
            matches!(events[3], StreamEvent::TextDelta { ref delta, .. } if delta == " world")
        );
        assert!(matches!(events[4], StreamEvent::TextEnd { .. }));
        assert!(matches!(events[5], StreamEvent::Finish { .. }));
    }

    #[test]
    fn incremental_tool_call_arguments_accumulate() {
        let events = frames_to_events(&[
            json!({"choices":[{"delta":{"tool_calls":[
                {"index":0,"id":"call_1","function":{"name":"get_weather","arguments":""}}
            ]}}]}),
            json!({"choices":[{"delta":{"tool_calls":[
                {"index":0,"function":{"arguments":"{\"city\":"}}
            ]}}]}),
            json!({"choices":[{"delta":{"tool_calls":[
                {"index":0,"function":{"arguments":"\"Paris\"}"}}
            ]}}]}),
            json!({"choices":[{"delta":{},"finish_reason":"tool_calls"}]}),
        ]);

        let starts: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::ToolCallStart { .. }))
            .collect();
        assert_eq!(starts.len(), 1);

        let call = events
            .iter()
            .find_map(|e| match e {
                StreamEvent::ToolCall { id, arguments, .. } => Some((id.clone(), arguments.clone())),
                _ => None,
            })
            .expect("tool call");
        assert_eq!(call.0, "call_1");
        assert_eq!(call.1, "{\"city\":\"Paris\"}");

        match events.last() {
            Some(StreamEvent::Finish { finish_reason, .. }) => {
                assert_eq!(*finish_reason, FinishReason::ToolCalls);
            }
            other => panic!("expected Finish, got {other:?}"),
        }
    }

    #[test]
    fn cumulative_usage_is_last_writer_wins() {
        let events = frames_to_events(&[
            json!({"choices":[{"delta":{"content":"hi"}}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}),
            json!({"choices":[],"usage":{"prompt_tokens":10,"completion_tokens":8,"total_tokens":18}}),
        ]);

        match events.last() {
            Some(StreamEvent::Finish { usage, .. }) => {
                assert_eq!(usage.completion_tokens, 8);
                assert_eq!(usage.total_tokens, 18);
            }
            other => panic!("expected Finish, got {other:?}"),
        }
    }
}
