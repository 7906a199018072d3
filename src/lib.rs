//! modelgate
//!
//! A unified multi-vendor AI provider adapter: each provider translates
//! one vendor's REST/streaming API (OpenAI, Freepik, NLP Cloud,
//! Perplexity, Reka AI) into a common capability surface — chat, image,
//! speech, video, transcription, reranking, realtime session tokens and
//! model listing.
//!
//! Two shared primitives carry the design weight:
//!
//! - [`polling::poll_until_terminal`] turns a vendor's
//!   create-job-then-poll workflow into a single async wait with
//!   interval, timeout, attempt and cancellation bounds.
//! - [`stream::StreamState`] plus the per-provider frame translators
//!   normalize each vendor's SSE/chunked output onto one incremental
//!   event vocabulary.
//!
//! # Example
//!
//! ```rust,no_run
//! use modelgate::keys::EnvKeyResolver;
//! use modelgate::providers::openai::OpenAiProvider;
//! use modelgate::traits::ChatCapability;
//! use modelgate::types::{ChatMessage, ChatRequest};
//!
//! # async fn run() -> Result<(), modelgate::ProviderError> {
//! let provider = OpenAiProvider::from_resolver(&EnvKeyResolver)?;
//! let request = ChatRequest::new("gpt-4o-mini", vec![ChatMessage::user("Hello!")]);
//! let response = provider.chat_capability().chat(request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod error;
pub mod keys;
pub mod polling;
pub mod providers;
pub mod stream;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::ProviderError;
pub use stream::{ModelStream, StreamEvent};
pub use traits::ModelProvider;
