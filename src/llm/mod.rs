//! Remote text-generation plumbing: the Gemini client, the generator
//! trait the rest of the crate programs against, and the retry policy
//! wrapped around every generation call.

pub mod gemini;
pub mod retry;

use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use retry::RetryPolicy;

/// Errors surfaced by a text generator.
///
/// Rate limiting is detected from the structured HTTP status, not from
/// substring-matching the error text.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("rate limited by the generation API")]
    RateLimited,

    #[error("generation API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation API returned no text")]
    EmptyResponse,

    /// Terminal outcome once the retry budget is spent.
    #[error("Too many API requests. Try again later.")]
    TooManyRequests,
}

impl GenerateError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GenerateError::RateLimited)
    }
}

/// Unified interface over the remote generation call: prompt in, text out.
///
/// The service holds a `dyn TextGenerator` so tests can substitute stubs
/// for the hosted API.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
