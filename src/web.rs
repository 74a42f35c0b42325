use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::orchestrator::FareRequestOrchestrator;

pub async fn run(orchestrator: Arc<FareRequestOrchestrator>, host: &str, port: u16) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(orchestrator)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web form running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
