//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::APP_VERSION;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
    threshold: f32,
    channel_order: &'static str,
    log_sink: &'static str,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: APP_VERSION,
        model: state.pipeline.model_name(),
        threshold: state.pipeline.policy().threshold,
        channel_order: state.pipeline.channel_order().as_str(),
        log_sink: state.log_sink.name(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
