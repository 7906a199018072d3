//! Realtime session token types
//!
//! Realtime APIs hand browsers a short-lived client secret minted
//! server-side; the adapter only performs that mint call.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::common::ResponseMetadata;

/// Request for an ephemeral realtime session token.
#[derive(Debug, Clone, Default)]
pub struct RealtimeSessionRequest {
    /// Target realtime model id
    pub model: String,
    /// Voice the session should use
    pub voice: Option<String>,
    /// Session instructions (system prompt)
    pub instructions: Option<String>,
    /// Provider-specific passthrough fields
    pub extra_params: HashMap<String, serde_json::Value>,
}

impl RealtimeSessionRequest {
    /// Create a request for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Minted ephemeral realtime credential.
#[derive(Debug, Clone, Default)]
pub struct RealtimeSessionResponse {
    /// Response metadata
    pub metadata: ResponseMetadata,
    /// Ephemeral client secret handed to the end client
    pub client_secret: String,
    /// When the secret expires
    pub expires_at: Option<DateTime<Utc>>,
    /// Vendor session id, when reported
    pub session_id: Option<String>,
}
