//! API key resolution
//!
//! Providers never read credentials themselves; they ask an
//! [`ApiKeyResolver`] at construction time. A missing key is a
//! configuration failure raised before any network call.

use secrecy::SecretString;
use std::collections::HashMap;

use crate::error::ProviderError;

/// Resolves a configured credential for a provider id.
pub trait ApiKeyResolver: Send + Sync {
    /// Return the credential for `provider_id`, or `MissingApiKey`.
    fn resolve(&self, provider_id: &str) -> Result<SecretString, ProviderError>;
}

/// Resolver backed by conventional environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvKeyResolver;

impl EnvKeyResolver {
    fn env_var_for(provider_id: &str) -> Option<&'static str> {
        match provider_id {
            "openai" => Some("OPENAI_API_KEY"),
            "freepik" => Some("FREEPIK_API_KEY"),
            "nlpcloud" => Some("NLPCLOUD_API_KEY"),
            "perplexity" => Some("PERPLEXITY_API_KEY"),
            "rekaai" => Some("REKA_API_KEY"),
            _ => None,
        }
    }
}

impl ApiKeyResolver for EnvKeyResolver {
    fn resolve(&self, provider_id: &str) -> Result<SecretString, ProviderError> {
        let var = Self::env_var_for(provider_id).ok_or_else(|| {
            ProviderError::MissingApiKey(format!("unknown provider id '{provider_id}'"))
        })?;
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
            _ => Err(ProviderError::MissingApiKey(format!(
                "no API key configured for '{provider_id}' (set {var})"
            ))),
        }
    }
}

/// Resolver backed by an in-memory map. Useful for tests and embedders
/// that manage credentials themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyResolver {
    keys: HashMap<String, SecretString>,
}

impl StaticKeyResolver {
    /// Empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key for `provider_id`.
    pub fn with_key(mut self, provider_id: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys
            .insert(provider_id.into(), SecretString::from(key.into()));
        self
    }
}

impl ApiKeyResolver for StaticKeyResolver {
    fn resolve(&self, provider_id: &str) -> Result<SecretString, ProviderError> {
        self.keys.get(provider_id).cloned().ok_or_else(|| {
            ProviderError::MissingApiKey(format!(
                "no API key configured for '{provider_id}'"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_resolver_returns_configured_key() {
        use secrecy::ExposeSecret;
        let resolver = StaticKeyResolver::new().with_key("openai", "sk-test");
        let key = resolver.resolve("openai").expect("key");
        assert_eq!(key.expose_secret(), "sk-test");
    }

    #[test]
    fn missing_key_is_a_distinct_error() {
        let resolver = StaticKeyResolver::new();
        let err = resolver.resolve("perplexity").expect_err("missing");
        assert!(matches!(err, ProviderError::MissingApiKey(_)));
    }
}
