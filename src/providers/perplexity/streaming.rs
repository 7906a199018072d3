//! Perplexity chat stream translation
//!
//! Frames follow the OpenAI delta shape. Citations and search results are
//! resent in full on later frames, so emitted source URLs are tracked per
//! call and each URL produces one `Source` event no matter how many frames
//! repeat it.

use std::collections::HashSet;

use crate::error::ProviderError;
use crate::stream::{FrameTranslator, StreamEvent, StreamState};
use crate::types::FinishReason;

/// Translator for Perplexity `/chat/completions` SSE frames.
pub struct PerplexityChatTranslator {
    state: StreamState,
    emitted_sources: HashSet<String>,
}

impl PerplexityChatTranslator {
    pub fn new() -> Self {
        Self {
            state: StreamState::new("perplexity"),
            emitted_sources: HashSet::new(),
        }
    }

    fn collect_sources(&mut self, frame: &serde_json::Value) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        for source in super::chat::parse_sources(frame) {
            if self.emitted_sources.insert(source.url.clone()) {
                events.extend(self.state.source(&source.url, source.title.as_deref()));
            }
        }
        events
    }
}

impl Default for PerplexityChatTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTranslator for PerplexityChatTranslator {
    fn on_frame(&mut self, frame: &serde_json::Value) -> Result<Vec<StreamEvent>, ProviderError> {
        let mut events = self.state.start(
            frame.get("id").and_then(|v| v.as_str()).map(String::from),
            frame.get("model").and_then(|v| v.as_str()).map(String::from),
        );

        events.extend(self.collect_sources(frame));

        let choice = frame.pointer("/choices/0");
        if let Some(content) = choice
            .and_then(|c| c.pointer("/delta/content"))
            .and_then(|v| v.as_str())
        {
            events.extend(self.state.text_delta(content));
        }

        if let Some(reason) = choice
            .and_then(|c| c.get("finish_reason"))
            .and_then(|v| v.as_str())
        {
            self.state
                .record_finish_reason(FinishReason::from_vendor(reason));
        }

        if let Some(usage) = frame.get("usage").filter(|v| !v.is_null()) {
            self.state
                .record_usage(&crate::providers::openai::chat::parse_usage(usage));
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
        let mut translator = PerplexityChatTranslator::new();
        let mut events = Vec::new();
        for frame in frames {
            events.extend(translator.on_frame(frame).expect("frame"));
        }
        events.extend(translator.on_end());
        events
    }

    #[test]
    fn repeated_citation_lists_emit_each_source_once() {
        let events = frames_to_events(&[
            json!({
                "id": "ppl-1",
                "model": "sonar",
                "citations": ["https://a.example"],
                "choices": [{"delta": {"content": "The"}}],
            }),
            json!({
                "citations": ["https://a.example", "https://b.example"],
                "choices": [{"delta": {"content": " answer"}}],
            }),
        ]);

        let sources: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Source { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(sources, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn final_frame_usage_wins() {
        let events = frames_to_events(&[
            json!({"choices": [{"delta": {"content": "hi"}}],
                   "usage": {"prompt_tokens": 4, "completion_tokens": 1, "total_tokens": 5}}),
            json!({"choices": [{"delta": {}, "finish_reason": "stop"}],
                   "usage": {"prompt_tokens": 4, "completion_tokens": 7, "total_tokens": 11}}),
        ]);

        match events.last() {
            Some(StreamEvent::Finish {
                finish_reason,
                usage,
            }) => {
                assert_eq!(*finish_reason, FinishReason::Stop);
                assert_eq!(usage.total_tokens, 11);
            }
            other => panic!("expected Finish, got {other:?}"),
        }
    }
}
