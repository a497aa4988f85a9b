// crates/edge/src/server.rs

use crate::EdgeError;

use adapt::http::{build_service, AppState};
use axum::{extract::Request, ServiceExt};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Bind `addr` and serve until Ctrl-C.
#[tracing::instrument(skip(state))]
pub async fn run(addr: SocketAddr, state: AppState) -> Result<(), EdgeError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    let app = build_service(state);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
