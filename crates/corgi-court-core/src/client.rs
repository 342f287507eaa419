use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::case::CaseData;
use crate::verdict::{decode_verdict, DecodeError, VerdictResult};

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/judge";

/// Failures on the way from a case to a verdict. Never surfaced by [`JudgeClient::judge_case`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Relay answered with a non-success status.
    #[error("{message}")]
    Relay { status: u16, message: String },
    #[error("failed to reach relay endpoint: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Caller-side adapter for the relay endpoint.
#[derive(Debug, Clone)]
pub struct JudgeClient {
    http: Client,
    endpoint: String,
}

impl JudgeClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent("corgi-court/0.3")
            .build()
            .context("failed to build relay HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Judge a case. Always yields a verdict: any failure is logged and
    /// replaced with [`VerdictResult::fallback`].
    pub async fn judge_case(&self, case: &CaseData) -> VerdictResult {
        match self.request_verdict(case).await {
            Ok(verdict) => verdict,
            Err(err) => {
                error!(error = %err, endpoint = %self.endpoint, "judging failed; using fallback verdict");
                VerdictResult::fallback()
            }
        }
    }

    /// One round trip to the relay, decoded and normalized, with errors intact.
    pub async fn request_verdict(&self, case: &CaseData) -> Result<VerdictResult, ClientError> {
        let response = self.http.post(&self.endpoint).json(case).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .json::<Value>()
                .await
                .unwrap_or_else(|_| Value::Object(Default::default()));
            error!(status = status.as_u16(), body = %body, "relay endpoint returned an error");
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Server Error: {}", status.as_u16()));
            return Err(ClientError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(DecodeError::from)?;
        let mut verdict = decode_verdict(&body)?;
        verdict.normalize();
        Ok(verdict)
    }
}
