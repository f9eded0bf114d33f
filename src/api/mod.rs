pub mod handlers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::keys::SuiAddress;
use crate::watcher::{WatchList, WatchStatus};

#[derive(Clone)]
pub struct AppState {
    pub status: WatchStatus,
    pub wallets: WatchList,
    pub signer: SuiAddress,
}

/// Keep-alive routes polled by the hosting platform.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::alive))
        .route("/health", get(handlers::health))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, host: &str, port: u16) -> eyre::Result<()> {
    let app = router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Liveness server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
