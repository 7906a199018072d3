//! Shared response types used by every capability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Token usage statistics.
///
/// Vendors report cumulative totals, so streaming accumulation is
/// last-writer-wins rather than summed across frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens consumed
    pub prompt_tokens: u32,
    /// Output tokens generated
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
    /// Cached prompt tokens, when the vendor reports them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u32>,
    /// Reasoning tokens, for models with internal reasoning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u32>,
}

impl Usage {
    /// Overwrite with the latest vendor-reported totals.
    ///
    /// Missing fields keep their previous value; `total_tokens` is
    /// recomputed when the vendor omits it.
    pub fn merge_latest(&mut self, other: &Usage) {
        if other.prompt_tokens > 0 {
            self.prompt_tokens = other.prompt_tokens;
        }
        if other.completion_tokens > 0 {
            self.completion_tokens = other.completion_tokens;
        }
        self.total_tokens = if other.total_tokens > 0 {
            other.total_tokens
        } else {
            self.prompt_tokens + self.completion_tokens
        };
        if other.cached_tokens.is_some() {
            self.cached_tokens = other.cached_tokens;
        }
        if other.reasoning_tokens.is_some() {
            self.reasoning_tokens = other.reasoning_tokens;
        }
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Token limit reached
    Length,
    /// The model requested tool calls
    ToolCalls,
    /// Content was filtered by the vendor
    ContentFilter,
    /// Vendor reported an unrecognized reason
    Other,
}

impl FinishReason {
    /// Map a vendor finish-reason string onto the unified enum.
    /// Unknown values map to `Other`; absent values should default to `Stop`.
    pub fn from_vendor(reason: &str) -> Self {
        match reason {
            "stop" | "end_turn" | "completed" => Self::Stop,
            "length" | "max_tokens" | "max_output_tokens" => Self::Length,
            "tool_calls" | "tool_use" | "function_call" => Self::ToolCalls,
            "content_filter" | "safety" => Self::ContentFilter,
            _ => Self::Other,
        }
    }
}

/// Metadata describing one vendor response or stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Vendor-assigned response id
    pub id: Option<String>,
    /// Model that produced the response
    pub model: Option<String>,
    /// When the response was created
    pub created: Option<DateTime<Utc>>,
    /// Provider id (e.g. "openai", "freepik")
    pub provider: String,
}

/// A structured warning attached to a response when a requested setting
/// could not be honored. The call still proceeds best-effort; warnings are
/// data on the response, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CallWarning {
    /// A request field the vendor/model cannot honor was dropped or adjusted
    UnsupportedSetting {
        /// Name of the ignored setting
        setting: String,
        /// Optional explanation of what was done instead
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// Free-form warning
    Other {
        /// Warning text
        message: String,
    },
}

impl CallWarning {
    /// Convenience constructor for the common unsupported-setting case.
    pub fn unsupported(setting: impl Into<String>, details: impl Into<String>) -> Self {
        Self::UnsupportedSetting {
            setting: setting.into(),
            details: Some(details.into()),
        }
    }
}

/// HTTP client configuration shared by all providers.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Overall request timeout
    pub timeout: Option<Duration>,
    /// Connect timeout
    pub connect_timeout: Option<Duration>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(120)),
            connect_timeout: Some(Duration::from_secs(10)),
            headers: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_merge_is_last_writer_wins() {
        let mut usage = Usage::default();
        usage.merge_latest(&Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
            ..Default::default()
        });
        usage.merge_latest(&Usage {
            prompt_tokens: 10,
            completion_tokens: 8,
            total_tokens: 0,
            ..Default::default()
        });

        assert_eq!(usage.completion_tokens, 8);
        assert_eq!(usage.total_tokens, 18);
    }

    #[test]
    fn finish_reason_maps_vendor_aliases() {
        assert_eq!(FinishReason::from_vendor("end_turn"), FinishReason::Stop);
        assert_eq!(FinishReason::from_vendor("max_tokens"), FinishReason::Length);
        assert_eq!(FinishReason::from_vendor("weird"), FinishReason::Other);
    }
}
