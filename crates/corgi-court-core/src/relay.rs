use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::case::CaseFields;
use crate::llm::{GeminiClient, GenerationClient, GenerationError, LlmSettings};
use crate::prompt::build_prompt;

/// Failures surfaced by the relay, each with a fixed HTTP status.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Server Configuration Error: API_KEY is missing in the server environment.")]
    Configuration,
    #[error("Upstream API Error: {status}")]
    Upstream { status: u16 },
    #[error("Empty response from AI model")]
    EmptyResult,
    #[error("{0}")]
    Unexpected(String),
}

impl RelayError {
    /// HTTP status the relay answers with. Upstream statuses pass through unchanged.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MethodNotAllowed => 405,
            RelayError::Configuration | RelayError::Unexpected(_) => 500,
            RelayError::Upstream { status } => *status,
            RelayError::EmptyResult => 502,
        }
    }

    pub fn to_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Turns one case body into one verdict document using the upstream generator.
#[derive(Clone)]
pub struct RelayService {
    generator: Option<Arc<dyn GenerationClient>>,
}

impl RelayService {
    /// A relay with no generator answers every request with a configuration error.
    pub fn new(generator: Option<Arc<dyn GenerationClient>>) -> Self {
        Self { generator }
    }

    /// Build the Gemini-backed relay, leaving it unconfigured when no credential is set.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        if settings.api_key.is_none() {
            return Ok(Self::new(None));
        }
        let client = GeminiClient::new(settings)?;
        Ok(Self::new(Some(Arc::new(client))))
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Judge a raw request body.
    ///
    /// Returns the model's JSON output when it parses, or `{"raw": text}` when
    /// it does not. Missing or malformed case fields are interpolated as-is.
    pub async fn judge(&self, body: &[u8]) -> Result<Value, RelayError> {
        let generator = self.generator.as_ref().ok_or(RelayError::Configuration)?;

        let case = CaseFields::from_body(body);
        let prompt = build_prompt(&case);

        let text = match generator.generate(&prompt).await {
            Ok(text) => text,
            Err(GenerationError::Status { status, body }) => {
                error!(status, body = %body, "generation API returned an error");
                return Err(RelayError::Upstream { status });
            }
            Err(err) => {
                error!(error = %err, "relay failed while calling generation API");
                return Err(RelayError::Unexpected(err.to_string()));
            }
        };

        let text = match text {
            Some(text) if !text.is_empty() => text,
            _ => return Err(RelayError::EmptyResult),
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!(error = %err, "model output is not JSON; relaying raw text");
                Ok(json!({ "raw": text }))
            }
        }
    }
}
