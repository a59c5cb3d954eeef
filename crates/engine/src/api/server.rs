use anyhow::Result;
use tokio::sync::watch;
use std::sync::Arc;
use tracing::info;

use super::routes::create_router;
use crate::orchestrator::Orchestrator;

pub async fn start_server(
    orchestrator: Arc<Orchestrator>,
    addr: String,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let app = create_router().with_state(orchestrator);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("WebGPT API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    Ok(())
}

async fn shutdown_signal(mut shutdown_rx: watch::Receiver<bool>) {
    // Wait for shutdown signal
    while !*shutdown_rx.borrow() {
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }
    info!("Shutting down API server...");
}
