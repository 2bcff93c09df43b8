//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    /// Chat-completion provider, or `none` when every item gets default coverage
    pub interpreter: String,
    /// `remote` or `in_memory`
    pub retriever: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check, reporting which adapters were wired
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let interpreter = state
        .config
        .llm
        .select()
        .map(|(provider, _)| provider.to_string())
        .unwrap_or_else(|| "none".to_string());
    let retriever = if state.config.external_retriever().is_some() {
        "remote"
    } else {
        "in_memory"
    };

    Json(ReadinessResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        interpreter,
        retriever: retriever.to_string(),
    })
}
