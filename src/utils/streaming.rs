//! SSE stream plumbing shared by all providers
//!
//! Vendors emit JSON objects as SSE `data:` payloads (one object per
//! message). This module owns the transport concerns: sending the request,
//! surfacing HTTP failures before any streaming begins, SSE framing via
//! `eventsource-stream` (UTF-8 boundaries, line buffering, comment lines),
//! done markers, and strict JSON parsing. Providers supply a
//! [`FrameTranslator`] for the per-vendor semantics.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;

use crate::error::ProviderError;
use crate::stream::{FrameTranslator, ModelStream};

/// Configuration for one SSE streaming call.
#[derive(Debug, Clone)]
pub struct SseStreamConfig {
    /// Label used in error messages (e.g. "openai chat").
    pub label: String,
    /// SSE `data` payloads that indicate end-of-stream.
    pub done_markers: Vec<String>,
}

impl SseStreamConfig {
    /// Config with the conventional `[DONE]` terminator.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            done_markers: vec!["[DONE]".to_string()],
        }
    }
}

/// Factory turning an HTTP request into a normalized event stream.
pub struct StreamFactory;

impl StreamFactory {
    /// Send `request_builder`, verify the response status, and drive the
    /// body through `translator`.
    ///
    /// A non-success status is read fully and raised as `ApiError` before
    /// any streaming begins; a failure body is never parsed as a stream.
    /// `translator.on_end()` runs exactly once, on the done marker or on
    /// connection close.
    pub async fn sse_stream<T>(
        request_builder: reqwest::RequestBuilder,
        translator: T,
        cfg: SseStreamConfig,
    ) -> Result<ModelStream, ProviderError>
    where
        T: FrameTranslator + 'static,
    {
        let response = request_builder
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(format!("Failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::api_error(status.as_u16(), body));
        }

        let label = cfg.label;
        let done_markers = cfg.done_markers;
        let mut translator = translator;

        let out = async_stream::stream! {
            let mut sse = response.bytes_stream().eventsource();

            'outer: while let Some(item) = sse.next().await {
                let event = match item {
                    Ok(ev) => ev,
                    Err(e) => {
                        yield Err(ProviderError::StreamError(format!(
                            "SSE stream error ({label}): {e}"
                        )));
                        return;
                    }
                };

                let data = event.data.trim();
                if data.is_empty() {
                    continue;
                }
                if done_markers.iter().any(|m| m == data) {
                    break 'outer;
                }

                let frame: serde_json::Value = match serde_json::from_str(data) {
                    Ok(v) => v,
                    Err(e) => {
                        yield Err(ProviderError::ParseError(format!(
                            "Failed to parse SSE JSON ({label}): {e}"
                        )));
                        return;
                    }
                };

                match translator.on_frame(&frame) {
                    Ok(events) => {
                        for ev in events {
                            yield Ok(ev);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            for ev in translator.on_end() {
                yield Ok(ev);
            }
        };

        Ok(Box::pin(out))
    }

    /// Send `request_builder` and stream the body as raw token text.
    ///
    /// For vendors that stream plain text chunks instead of SSE JSON
    /// frames. Each chunk becomes a text delta; the stream is closed with
    /// the usual bracketing and a `Finish` event when the body ends.
    pub async fn chunked_text_stream(
        request_builder: reqwest::RequestBuilder,
        provider: &str,
    ) -> Result<ModelStream, ProviderError> {
        let response = request_builder
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(format!("Failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::api_error(status.as_u16(), body));
        }

        let label = provider.to_string();
        let mut state = crate::stream::StreamState::new(provider);
        let mut decoder = Utf8ChunkDecoder::new();

        let out = async_stream::stream! {
            let mut body = response.bytes_stream();

            for ev in state.start(None, None) {
                yield Ok(ev);
            }

            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => {
                        let text = decoder.decode(&bytes);
                        for ev in state.text_delta(&text) {
                            yield Ok(ev);
                        }
                    }
                    Err(e) => {
                        yield Err(ProviderError::StreamError(format!(
                            "chunked stream error ({label}): {e}"
                        )));
                        return;
                    }
                }
            }

            let tail = decoder.finish();
            for ev in state.text_delta(&tail) {
                yield Ok(ev);
            }
            for ev in state.finish() {
                yield Ok(ev);
            }
        };

        Ok(Box::pin(out))
    }
}

/// Incremental UTF-8 decoder for chunked text bodies.
///
/// Network chunks can split a multi-byte character; the incomplete tail
/// is held back and prepended to the next chunk, so emitted text never
/// contains replacement characters for bytes that were merely split.
#[derive(Debug, Default)]
struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, returning all complete characters seen so far.
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                let text = s.to_string();
                self.pending.clear();
                text
            }
            Err(e) if e.error_len().is_none() => {
                // Incomplete trailing sequence; emit the valid prefix and
                // keep the tail for the next chunk.
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                text
            }
            Err(_) => {
                // Genuinely invalid bytes; replacement characters are the
                // honest rendering here.
                let text = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                text
            }
        }
    }

    /// Flush any bytes still held at end of stream.
    fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{StreamEvent, StreamState};

    struct TextTranslator(StreamState);

    impl FrameTranslator for TextTranslator {
        fn on_frame(
            &mut self,
            frame: &serde_json::Value,
        ) -> Result<Vec<StreamEvent>, ProviderError> {
            let delta = frame.get("text").and_then(|v| v.as_str()).unwrap_or("");
            Ok(self.0.text_delta(delta))
        }

        fn on_end(&mut self) -> Vec<StreamEvent> {
            self.0.finish()
        }
    }

    #[tokio::test]
    async fn streams_frames_until_done_marker() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_raw(
                        ": keep-alive\n\ndata: {\"text\":\"Hello\"}\n\ndata: {\"text\":\" world\"}\n\ndata: [DONE]\n\ndata: {\"text\":\"ignored\"}\n\n",
                        "text/event-stream",
                    ),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let translator = TextTranslator(StreamState::new("test"));
        let mut stream = StreamFactory::sse_stream(
            client.post(server.uri()),
            translator,
            SseStreamConfig::new("test"),
        )
        .await
        .expect("stream");

        let mut events = Vec::new();
        while let Some(item) = stream.next().await {
            events.push(item.expect("event"));
        }

        // TextStart, two deltas, TextEnd, Finish; nothing after [DONE].
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], StreamEvent::TextStart { .. }));
        assert!(matches!(events[4], StreamEvent::Finish { .. }));
    }

    #[tokio::test]
    async fn http_failure_is_raised_before_streaming() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let translator = TextTranslator(StreamState::new("test"));
        let err = StreamFactory::sse_stream(
            client.post(server.uri()),
            translator,
            SseStreamConfig::new("test"),
        )
        .await
        .err()
        .expect("must fail");

        match err {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("bad key"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn chunked_text_becomes_bracketed_deltas() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string("Hello from the model"),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let mut stream = StreamFactory::chunked_text_stream(client.post(server.uri()), "test")
            .await
            .expect("stream");

        let mut events = Vec::new();
        while let Some(item) = stream.next().await {
            events.push(item.expect("event"));
        }

        assert!(matches!(events.first(), Some(StreamEvent::StreamStart { .. })));
        assert!(matches!(events.get(1), Some(StreamEvent::TextStart { .. })));
        let text: String = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::TextDelta { delta, .. } => Some(delta.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "Hello from the model");
        assert!(matches!(events.last(), Some(StreamEvent::Finish { .. })));
    }

    #[test]
    fn multibyte_character_split_across_chunks_decodes_cleanly() {
        let bytes = "café au lait".as_bytes();
        // Split in the middle of the two-byte "é" (0xC3 0xA9).
        let (head, tail) = bytes.split_at(4);

        let mut decoder = Utf8ChunkDecoder::new();
        let first = decoder.decode(head);
        let second = decoder.decode(tail);
        let flushed = decoder.finish();

        assert_eq!(first, "caf");
        assert_eq!(second, "é au lait");
        assert_eq!(flushed, "");
        assert!(!format!("{first}{second}").contains('\u{FFFD}'));
    }

    #[test]
    fn dangling_partial_sequence_is_flushed_lossily_at_end() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(b"ok \xC3"), "ok ");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn genuinely_invalid_bytes_become_replacement_characters() {
        let mut decoder = Utf8ChunkDecoder::new();
        let text = decoder.decode(b"a\xFFb");
        assert_eq!(text, "a\u{FFFD}b");
        assert!(decoder.finish().is_empty());
    }
}
