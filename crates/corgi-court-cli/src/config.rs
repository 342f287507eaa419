use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Process configuration for the relay server. The upstream credential is
/// never read from here; it only comes from the `API_KEY` environment variable.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path the relay endpoint is mounted on.
    pub route: String,
}

impl AppConfig {
    pub const DEFAULT_LOG_LEVEL: &'static str = "info,tokio=warn";

    /// Layer defaults, an optional config file, then `CORGI_COURT_*` environment overrides
    /// (nested keys use `__`, e.g. `CORGI_COURT_SERVER__PORT`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("log_level", Self::DEFAULT_LOG_LEVEL)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.route", "/api/judge")?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("CORGI_COURT")
                .prefix_separator("_")
                .separator("__"),
        );
        let config = builder.build().context("failed to read configuration")?;
        config
            .try_deserialize()
            .context("invalid configuration values")
    }
}
