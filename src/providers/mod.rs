//! Per-vendor provider implementations

pub mod freepik;
pub mod nlpcloud;
pub mod openai;
pub mod perplexity;
pub mod rekaai;

pub use freepik::FreepikProvider;
pub use nlpcloud::NlpCloudProvider;
pub use openai::OpenAiProvider;
pub use perplexity::PerplexityProvider;
pub use rekaai::RekaProvider;
