use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bullet_forge::http::reqwest::default_dyn_transport;
use bullet_forge::storage::sqlite::LibsqlStore;
use bullet_forge::{
    ImprovementResult, ImprovementService, PromptTemplate, ProviderConfig, server,
};

#[derive(Parser)]
#[command(name = "bullet-forge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Provider backend: openai, groq or huggingface.
    #[arg(long, global = true, env = "LLM_PROVIDER", default_value = "openai")]
    provider: String,

    /// API key for the selected provider.
    #[arg(long, global = true, env = "LLM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Overrides the provider's default model.
    #[arg(long, global = true, env = "LLM_MODEL")]
    model: Option<String>,

    /// Overrides the provider's default base URL.
    #[arg(long, global = true, env = "LLM_BASE_URL")]
    base_url: Option<String>,

    /// Custom prompt template; must contain `{text}`.
    #[arg(long, global = true, env = "BULLET_FORGE_PROMPT_TEMPLATE")]
    prompt_template: Option<String>,

    /// Seconds before a provider request is abandoned. No limit when unset.
    #[arg(long, global = true, env = "BULLET_FORGE_PROVIDER_TIMEOUT_SECS")]
    provider_timeout_secs: Option<u64>,

    /// Database file receiving every input/output pair.
    #[arg(long, global = true, env = "BULLET_FORGE_DB", default_value = "bullet-forge.db")]
    database: String,

    /// Skip persistence entirely.
    #[arg(long, global = true)]
    no_store: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API.
    Serve {
        #[arg(long, env = "BULLET_FORGE_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },

    /// Improve a single line and print the result.
    Improve { text: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let service = build_service(&cli).await?;

    match cli.command {
        Commands::Serve { bind } => {
            server::serve(bind, Arc::new(service))
                .await
                .context("HTTP server failed")?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Improve { text } => match service.run(&text).await {
            ImprovementResult::Improved { text } => {
                println!("{text}");
                Ok(ExitCode::SUCCESS)
            }
            ImprovementResult::Failed { error } => {
                eprintln!("{error}");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

async fn build_service(cli: &Cli) -> Result<ImprovementService> {
    let config = ProviderConfig {
        provider: cli.provider.clone(),
        api_key: cli.api_key.clone(),
        model: cli.model.clone(),
        base_url: cli.base_url.clone(),
    };
    match config.kind() {
        Ok(kind) => info!(provider = kind.as_str(), "provider selected"),
        Err(err) => warn!(error = %err, "requests will fail until the provider is fixed"),
    }
    if let Err(err) = config.require_api_key() {
        warn!(error = %err, "requests will fail until an API key is configured");
    }

    let timeout = cli.provider_timeout_secs.map(Duration::from_secs);
    let transport = default_dyn_transport(timeout)?;

    let mut service = ImprovementService::new(transport, config);
    if let Some(template) = &cli.prompt_template {
        service = service.with_template(PromptTemplate::new(template.clone())?);
    }

    if cli.no_store {
        info!("persistence disabled");
    } else {
        match LibsqlStore::open(&cli.database).await {
            Ok(store) => {
                info!(path = %cli.database, "persisting improvements");
                service = service.with_store(Arc::new(store));
            }
            Err(err) => warn!(error = %err, "continuing without persistence"),
        }
    }

    Ok(service)
}
