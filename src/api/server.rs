//! HTTP server lifecycle: bind, serve the API router, stop on signal.

use std::future::Future;
use std::net::SocketAddr;

use crate::api::router::api_router;
use crate::db::PatientStore;

/// Bind `addr` and serve the API until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, store: PatientStore, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "API server started");

    axum::serve(listener, api_router(store))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
