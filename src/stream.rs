//! Unified streaming event model
//!
//! Every vendor's incremental response reduces to the same three event
//! families: text, tool calls, and finish-with-usage. Per-vendor frame
//! translators normalize onto [`StreamEvent`] so downstream consumers work
//! against one vocabulary.
//!
//! [`StreamState`] carries the bookkeeping one streaming call needs: text
//! bracketing, tool-call dedup, and cumulative usage. It is created per
//! call and discarded with it; it is never attached to a provider
//! instance, so concurrent streams cannot interfere.

use futures::Stream;
use std::collections::HashSet;
use std::pin::Pin;

use crate::error::ProviderError;
use crate::types::{FinishReason, ResponseMetadata, Usage};

/// One normalized incremental event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Stream opened; first frame's metadata
    StreamStart {
        /// Response metadata from the opening frame
        metadata: ResponseMetadata,
    },
    /// Text output is starting (exactly once per stream with text)
    TextStart {
        /// Stream-scoped opaque text id
        id: String,
    },
    /// Incremental text
    TextDelta {
        /// Stream-scoped opaque text id
        id: String,
        /// The text fragment
        delta: String,
    },
    /// Text output finished (exactly once, after the last delta)
    TextEnd {
        /// Stream-scoped opaque text id
        id: String,
    },
    /// A tool call was requested (once per call id)
    ToolCallStart {
        /// Vendor call id
        id: String,
        /// Function name
        name: String,
    },
    /// Fully resolved tool call arguments (once per call id)
    ToolCall {
        /// Vendor call id
        id: String,
        /// Function name
        name: String,
        /// Complete JSON arguments text
        arguments: String,
    },
    /// A source/citation reported by a search-augmented vendor
    Source {
        /// Source URL
        url: String,
        /// Page title, when reported
        title: Option<String>,
    },
    /// Stream finished (exactly once, last event)
    Finish {
        /// Why generation stopped; `Stop` when the vendor does not say
        finish_reason: FinishReason,
        /// Final cumulative usage
        usage: Usage,
    },
}

/// Stream of normalized events for one call.
pub type ModelStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, ProviderError>> + Send>>;

/// Per-call translator state.
///
/// Guarantees, regardless of how the vendor frames its stream:
/// - the first non-empty text delta is preceded by exactly one `TextStart`,
///   and `finish()` closes it with exactly one `TextEnd`;
/// - each tool-call id produces one `ToolCallStart` and one `ToolCall`,
///   with duplicate frames for an already-emitted id ignored (some vendors
///   resend the full partial state on every frame);
/// - usage is last-writer-wins, since vendors report cumulative totals;
/// - exactly one `Finish` event, emitted by `finish()`.
#[derive(Debug)]
pub struct StreamState {
    provider: String,
    text_id: String,
    started: bool,
    text_started: bool,
    started_tool_calls: HashSet<String>,
    emitted_tool_calls: HashSet<String>,
    usage: Usage,
    finish_reason: Option<FinishReason>,
    finished: bool,
}

impl StreamState {
    /// Create the state for one streaming call.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            text_id: uuid::Uuid::new_v4().to_string(),
            started: false,
            text_started: false,
            started_tool_calls: HashSet::new(),
            emitted_tool_calls: HashSet::new(),
            usage: Usage::default(),
            finish_reason: None,
            finished: false,
        }
    }

    /// The stream-scoped text id.
    pub fn text_id(&self) -> &str {
        &self.text_id
    }

    /// Emit `StreamStart` on the first frame carrying metadata.
    pub fn start(&mut self, id: Option<String>, model: Option<String>) -> Vec<StreamEvent> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        vec![StreamEvent::StreamStart {
            metadata: ResponseMetadata {
                id,
                model,
                created: Some(chrono::Utc::now()),
                provider: self.provider.clone(),
            },
        }]
    }

    /// Record an incremental text fragment, opening the text block first if
    /// this is the first non-empty delta of the stream.
    pub fn text_delta(&mut self, delta: &str) -> Vec<StreamEvent> {
        if delta.is_empty() {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if !self.text_started {
            self.text_started = true;
            events.push(StreamEvent::TextStart {
                id: self.text_id.clone(),
            });
        }
        events.push(StreamEvent::TextDelta {
            id: self.text_id.clone(),
            delta: delta.to_string(),
        });
        events
    }

    /// Record a fully resolved tool call. Emits start + call the first time
    /// this id is seen; replayed frames for the same id produce nothing.
    pub fn tool_call(&mut self, id: &str, name: &str, arguments: &str) -> Vec<StreamEvent> {
        let mut events = self.tool_call_start(id, name);
        events.extend(self.tool_call_complete(id, name, arguments));
        events
    }

    /// Open a tool call (vendors that stream arguments incrementally).
    /// Emits `ToolCallStart` the first time this id is seen.
    pub fn tool_call_start(&mut self, id: &str, name: &str) -> Vec<StreamEvent> {
        if !self.started_tool_calls.insert(id.to_string()) {
            return Vec::new();
        }
        vec![StreamEvent::ToolCallStart {
            id: id.to_string(),
            name: name.to_string(),
        }]
    }

    /// Close a tool call with its fully accumulated arguments. Emits
    /// `ToolCall` once per id; opens the call first if it never started.
    pub fn tool_call_complete(&mut self, id: &str, name: &str, arguments: &str) -> Vec<StreamEvent> {
        if self.emitted_tool_calls.contains(id) {
            return Vec::new();
        }
        let mut events = self.tool_call_start(id, name);
        self.emitted_tool_calls.insert(id.to_string());
        events.push(StreamEvent::ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        });
        events
    }

    /// Record a citation/source frame.
    pub fn source(&mut self, url: &str, title: Option<&str>) -> Vec<StreamEvent> {
        vec![StreamEvent::Source {
            url: url.to_string(),
            title: title.map(str::to_string),
        }]
    }

    /// Record the latest cumulative usage numbers (last-writer-wins).
    pub fn record_usage(&mut self, usage: &Usage) {
        self.usage.merge_latest(usage);
    }

    /// Record the vendor-reported finish reason.
    pub fn record_finish_reason(&mut self, reason: FinishReason) {
        self.finish_reason = Some(reason);
    }

    /// Close the stream: `TextEnd` if text was started, then `Finish` with
    /// the accumulated usage. Idempotent; only the first call emits.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;
        let mut events = Vec::with_capacity(2);
        if self.text_started {
            events.push(StreamEvent::TextEnd {
                id: self.text_id.clone(),
            });
        }
        events.push(StreamEvent::Finish {
            finish_reason: self.finish_reason.unwrap_or(FinishReason::Stop),
            usage: self.usage.clone(),
        });
        events
    }

    /// Whether `finish()` already ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Per-vendor frame translator.
///
/// The driver ([`crate::utils::streaming::StreamFactory`]) strips SSE
/// framing, skips blanks/comments/done markers, parses each payload as one
/// JSON frame, and hands it here. `on_end` runs once at stream termination
/// (done marker or connection close).
pub trait FrameTranslator: Send {
    /// Translate one vendor JSON frame into zero or more events.
    fn on_frame(&mut self, frame: &serde_json::Value) -> Result<Vec<StreamEvent>, ProviderError>;

    /// Close out the stream.
    fn on_end(&mut self) -> Vec<StreamEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_bracketed_exactly_once() {
        let mut state = StreamState::new("test");
        let mut events = Vec::new();
        events.extend(state.text_delta("Hello"));
        events.extend(state.text_delta(" world"));
        events.extend(state.finish());

        assert!(matches!(events[0], StreamEvent::TextStart { .. }));
        assert!(matches!(events[1], StreamEvent::TextDelta { ref delta, .. } if delta == "Hello"));
        assert!(
            matches!(events[2], StreamEvent::TextDelta { ref delta, .. } if delta == " world")
        );
        assert!(matches!(events[3], StreamEvent::TextEnd { .. }));
        assert!(matches!(events[4], StreamEvent::Finish { .. }));
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn empty_deltas_do_not_open_text() {
        let mut state = StreamState::new("test");
        assert!(state.text_delta("").is_empty());
        let events = state.finish();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StreamEvent::Finish { .. }));
    }

    #[test]
    fn duplicate_tool_call_frames_emit_once() {
        let mut state = StreamState::new("test");
        let first = state.tool_call("call_1", "lookup", "{\"q\":1}");
        assert_eq!(first.len(), 2);
        assert!(state.tool_call("call_1", "lookup", "{\"q\":1}").is_empty());
        assert!(state.tool_call("call_1", "lookup", "{\"q\":1}").is_empty());
    }

    #[test]
    fn usage_is_last_writer_wins() {
        let mut state = StreamState::new("test");
        state.record_usage(&Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
            ..Default::default()
        });
        state.record_usage(&Usage {
            prompt_tokens: 10,
            completion_tokens: 8,
            total_tokens: 0,
            ..Default::default()
        });

        let events = state.finish();
        match events.last() {
            Some(StreamEvent::Finish { usage, .. }) => {
                assert_eq!(usage.completion_tokens, 8);
                assert_eq!(usage.total_tokens, 18);
            }
            other => panic!("expected Finish, got {other:?}"),
        }
    }

    #[test]
    fn finish_defaults_to_stop_and_is_idempotent() {
        let mut state = StreamState::new("test");
        let events = state.finish();
        assert!(matches!(
            events[0],
            StreamEvent::Finish {
                finish_reason: FinishReason::Stop,
                ..
            }
        ));
        assert!(state.finish().is_empty());
    }
}
