use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corgi_court_core::{
    render_verdict, CaseData, JudgeClient, LlmSettings, OutputFormat, RelayService,
    DEFAULT_RELAY_URL,
};
use tracing_subscriber::EnvFilter;

mod config;
mod server;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "corgi-court",
    author,
    version,
    about = "Corgi judge for couples' disputes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the relay endpoint
    Serve {
        /// Optional configuration file (TOML, YAML or JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Submit a case to a running relay and print the verdict
    Judge {
        /// Relay endpoint URL
        #[arg(long, default_value = DEFAULT_RELAY_URL)]
        endpoint: String,
        /// Case JSON file; reads stdin when omitted or `-`
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Emit the verdict as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, host, port } => {
            let mut app_config = AppConfig::load(config.as_deref())?;
            init_tracing(&app_config.log_level);
            if let Some(host) = host {
                app_config.server.host = host;
            }
            if let Some(port) = port {
                app_config.server.port = port;
            }
            let relay = RelayService::from_settings(&LlmSettings::from_env())
                .context("failed to configure generation client")?;
            server::serve(&app_config.server, relay).await?;
        }
        Commands::Judge {
            endpoint,
            input,
            json,
        } => {
            init_tracing(AppConfig::DEFAULT_LOG_LEVEL);
            judge(&endpoint, input.as_deref(), json).await?
        }
    }
    Ok(())
}

async fn judge(endpoint: &str, input: Option<&Path>, json: bool) -> Result<()> {
    let raw = read_case_input(input)?;
    let case: CaseData = serde_json::from_str(&raw).context("case input must be a JSON object")?;

    let client = JudgeClient::new(endpoint)?;
    let verdict = client.judge_case(&case).await;

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    println!("{}", render_verdict(&verdict, format)?);
    Ok(())
}

fn read_case_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read case file {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read case from stdin")?;
            Ok(buffer)
        }
    }
}

fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
