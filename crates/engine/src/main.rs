use std::sync::Arc;
use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use webgpt_engine::api;
use webgpt_engine::completion::OpenAiClient;
use webgpt_engine::{Credentials, Orchestrator, Settings};
use webgpt_shared::{Toolbelt, ToolRegistry, WebSearch};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting WebGPT...");

    let settings = Arc::new(Settings::load()?);
    let credentials = Credentials::from_env()?;

    // Tool catalogue is fixed for the lifetime of the process
    let web_search = Arc::new(WebSearch::new(credentials.brave_api_key.clone())?);
    let registry = Arc::new(ToolRegistry::new(web_search.tools())?);
    info!(tools = registry.len(), model = %settings.model_name, "tool registry ready");

    let client = OpenAiClient::from_settings(&settings, credentials.openai_api_key.clone())?;
    let orchestrator = Arc::new(Orchestrator::new(settings, registry, Arc::new(client)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let addr = std::env::var("WEBGPT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_server(orchestrator, addr, shutdown_rx).await {
            error!("API server crashed: {}", e);
        }
    });

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal...");

    let _ = shutdown_tx.send(true);
    let _ = api_handle.await;

    info!("WebGPT shutdown complete.");
    Ok(())
}
