mod gemini;
mod settings;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use settings::LlmSettings;

/// Text-completion backend the relay forwards prompts to.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send one prompt and return the first generated text, if the model produced any.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}

/// Failures talking to the upstream generation API.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Upstream answered with a non-success status.
    #[error("generation API returned status {status}")]
    Status { status: u16, body: String },
    #[error("failed to call generation API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode generation API response: {0}")]
    Envelope(String),
}
