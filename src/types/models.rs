//! Model listing types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description of one model offered by a provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model id as accepted in requests
    pub id: String,
    /// Provider id that owns the model
    pub provider: String,
    /// Human-readable name, when it differs from the id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// When the vendor published the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Capabilities the model supports, e.g. "chat", "image"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
}

impl ModelInfo {
    /// Create a catalog entry with a capability list.
    pub fn new(id: impl Into<String>, provider: impl Into<String>, capabilities: &[&str]) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            capabilities: capabilities.iter().map(|c| (*c).to_string()).collect(),
            ..Default::default()
        }
    }
}
