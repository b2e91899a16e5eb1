//! Cheat Detector Server
//!
//! Accepts a base64 encoded frame, classifies it and appends the
//! decision to an external log.
//!
//! # Architecture
//!
//! ```text
//! POST /predict
//!     │
//!     ▼
//! ┌──────────┐   ┌────────────┐   ┌────────────┐   ┌──────────┐
//! │  Decode  │──▶│ Preprocess │──▶│ Classifier │──▶│ Decision │
//! │ (base64) │   │ (224x224)  │   │   (ONNX)   │   │  Policy  │
//! └──────────┘   └────────────┘   └────────────┘   └────┬─────┘
//!                                                       ▼
//!                                             ┌───────────────────┐
//!                                             │ Log Sink (JSONL / │
//!                                             │  Google Sheets)   │
//!                                             └───────────────────┘
//! ```

mod config;
mod constants;
mod error;
mod handlers;
mod logic;
mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::constants::APP_VERSION;
use crate::logic::model::{ensure_model, DecisionPolicy, OnnxModel};
use crate::logic::pipeline::Pipeline;
use crate::logic::telemetry::{self, LogSink};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    // Initialize logging (LOG_FORMAT=json for structured output)
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cheat_detector=debug,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Cheat Detector v{} starting...", APP_VERSION);

    // Fetch (if needed) and load the model off the async runtime
    let model = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || {
            ensure_model(
                &config.model_path,
                config.model_url.as_deref(),
                config.model_sha256.as_deref(),
            )?;
            OnnxModel::load(&config.model_path)
        })
        .await??
    };
    tracing::info!(
        input = %model.metadata().input_name,
        loaded_at = %model.metadata().loaded_at,
        "Model ready"
    );

    let log_sink = telemetry::build_sink(&config)?;

    let pipeline = Pipeline::new(
        Arc::new(model),
        DecisionPolicy::new(config.threshold),
        config.channel_order,
    );
    tracing::info!(
        threshold = config.threshold,
        channel_order = %config.channel_order,
        "Pipeline configured"
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        log_sink,
    };

    let app = create_router(state, config.body_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub log_sink: Arc<dyn LogSink>,
}

/// Create the main router with all routes
pub fn create_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
