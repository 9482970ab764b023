//! HTTP handlers for API endpoints.

use crate::metrics::MetricsProvider;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Body message returned when a snapshot cannot be taken. The underlying
/// cause is only logged.
pub const SYSTEM_INFO_ERROR: &str = "Failed to retrieve system information";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MetricsProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MetricsProvider>) -> Self {
        Self { provider }
    }
}

/// Take a fresh snapshot and return it as JSON.
pub async fn get_system_info(State(state): State<AppState>) -> Response {
    match state.provider.sample().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            error!("Error getting system information: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": SYSTEM_INFO_ERROR })),
            )
                .into_response()
        }
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
