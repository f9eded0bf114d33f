use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub watched: usize,
    pub ticks: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub signer: String,
}

pub async fn alive() -> &'static str {
    "✅ Sui watch bot is alive!"
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.status.snapshot().await;
    let watched = state.wallets.read().await.len();

    Json(HealthResponse {
        status: "ok",
        watched,
        ticks: snapshot.ticks,
        last_tick_at: snapshot.last_tick_at,
        signer: state.signer.to_string(),
    })
}
