//! Reka AI chat stream translation
//!
//! Reka frames carry the full response accumulated so far, not a delta:
//! each chunk's `content` restates everything already streamed plus the
//! new text. The translator remembers what it has emitted and yields only
//! the fresh suffix, so downstream consumers see ordinary deltas.

use crate::error::ProviderError;
use crate::stream::{FrameTranslator, StreamEvent, StreamState};
use crate::types::FinishReason;

/// Translator for `/chat` SSE frames.
pub struct RekaChatTranslator {
    state: StreamState,
    emitted: String,
}

impl RekaChatTranslator {
    pub fn new() -> Self {
        Self {
            state: StreamState::new("rekaai"),
            emitted: String::new(),
        }
    }

    fn suffix_delta(&mut self, cumulative: &str) -> Vec<StreamEvent> {
        if cumulative.len() <= self.emitted.len() {
            return Vec::new();
        }
        let delta = if cumulative.starts_with(&self.emitted) {
            cumulative[self.emitted.len()..].to_string()
        } else {
            // The vendor rewrote earlier text; emit the full new state.
            cumulative.to_string()
        };
        self.emitted = cumulative.to_string();
        self.state.text_delta(&delta)
    }
}

impl Default for RekaChatTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTranslator for RekaChatTranslator {
    fn on_frame(&mut self, frame: &serde_json::Value) -> Result<Vec<StreamEvent>, ProviderError> {
        let mut events = self.state.start(
            frame.get("id").and_then(|v| v.as_str()).map(String::from),
            frame.get("model").and_then(|v| v.as_str()).map(String::from),
        );

        let response = frame.pointer("/responses/0");

        if let Some(content) = response
            .and_then(|r| r.pointer("/chunk/content"))
            .and_then(|v| v.as_str())
        {
            events.extend(self.suffix_delta(content));
        }

        if let Some(reason) = response
            .and_then(|r| r.get("finish_reason"))
            .and_then(|v| v.as_str())
        {
            self.state
                .record_finish_reason(FinishReason::from_vendor(reason));
        }

        if let Some(usage) = frame.get("usage").filter(|v| !v.is_null()) {
            self.state.record_usage(&super::chat::parse_usage(usage));
        }

        Ok(events)
    }

    fn on_end(&mut self) -> Vec<StreamEvent> {
        self.state.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frames_to_events(frames: &[serde_json::Value]) -> Vec<StreamEvent> {
        let mut translator = RekaChatTranslator::new();
        let mut events = Vec::new();
        for frame in frames {
            events.extend(translator.on_frame(frame).expect("frame"));
        }
        events.extend(translator.on_end());
        events
    }

    fn deltas(events: &[StreamEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::TextDelta { delta, .. } => Some(delta.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cumulative_frames_become_suffix_deltas() {
        let events = frames_to_events(&[
            json!({"id": "r1", "model": "reka-core",
                   "responses": [{"chunk": {"content": "The"}}]}),
            json!({"responses": [{"chunk": {"content": "The quick"}}]}),
            json!({"responses": [{"chunk": {"content": "The quick fox"}},]}),
        ]);
        assert_eq!(deltas(&events), vec!["The", " quick", " fox"]);
    }

    #[test]
    fn repeated_identical_frames_emit_nothing_new() {
        let events = frames_to_events(&[
            json!({"responses": [{"chunk": {"content": "Hi"}}]}),
            json!({"responses": [{"chunk": {"content": "Hi"}}]}),
        ]);
        assert_eq!(deltas(&events), vec!["Hi"]);
    }

    #[test]
    fn finish_reason_and_usage_come_from_the_last_frame() {
        let events = frames_to_events(&[
            json!({"responses": [{"chunk": {"content": "Hi"}}]}),
            json!({"responses": [{"chunk": {"content": "Hi there"}, "finish_reason": "length"}],
                   "usage": {"input_tokens": 3, "output_tokens": 9}}),
        ]);
        match events.last() {
            Some(StreamEvent::Finish {
                finish_reason,
                usage,
            }) => {
                assert_eq!(*finish_reason, FinishReason::Length);
                assert_eq!(usage.total_tokens, 12);
            }
            other => panic!("expected Finish, got {other:?}"),
        }
    }
}
