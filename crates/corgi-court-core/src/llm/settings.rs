use std::collections::HashMap;

/// Environment-driven configuration for the upstream generation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// Server-side credential. Absent means every relay request fails with a configuration error.
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// Unset means requests wait on upstream indefinitely.
    pub timeout_secs: Option<u64>,
}

impl LlmSettings {
    pub const API_KEY_ENV: &'static str = "API_KEY";
    const ENDPOINT_ENV: &'static str = "CORGI_COURT_ENDPOINT";
    const MODEL_ENV: &'static str = "CORGI_COURT_MODEL";
    const TIMEOUT_ENV: &'static str = "CORGI_COURT_TIMEOUT_SECS";

    /// Load settings from environment variables.
    ///
    /// * `API_KEY` — generation API key (optional here, enforced per request).
    /// * `CORGI_COURT_ENDPOINT` — custom base URL.
    /// * `CORGI_COURT_MODEL` — model identifier.
    /// * `CORGI_COURT_TIMEOUT_SECS` — upstream request timeout.
    pub fn from_env() -> Self {
        Self::from_map(std::env::vars().collect())
    }

    pub fn from_map(vars: HashMap<String, String>) -> Self {
        let non_blank = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            api_key: non_blank(Self::API_KEY_ENV),
            endpoint: non_blank(Self::ENDPOINT_ENV),
            model: non_blank(Self::MODEL_ENV),
            timeout_secs: non_blank(Self::TIMEOUT_ENV).and_then(|v| v.parse::<u64>().ok()),
        }
    }
}
