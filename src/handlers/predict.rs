//! Prediction handler
//!
//! Presence check, then the blocking pipeline, then a detached
//! best-effort log append. Every fault after the presence check becomes
//! a 500.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tokio::task::JoinError;
use uuid::Uuid;

use crate::constants::{NO_IMAGE_MESSAGE, NULL_IMAGE_MESSAGE};
use crate::error::Fault;
use crate::logic::telemetry::{LogRecord, LogSink};
use crate::models::{PredictRequest, PredictResponse};
use crate::{AppError, AppResult, AppState};

/// Classify one frame
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(request) = payload.map_err(|rejection| Fault::Unknown(rejection.body_text()))?;

    let image = match request.image {
        None => return Err(AppError::Validation(NO_IMAGE_MESSAGE.to_string())),
        Some(None) => return Err(Fault::Unknown(NULL_IMAGE_MESSAGE.to_string()).into()),
        Some(Some(image)) => image,
    };

    let started = Instant::now();
    let pipeline = state.pipeline.clone();
    let decision = tokio::task::spawn_blocking(move || pipeline.run(&image))
        .await
        .map_err(join_fault)??;

    tracing::info!(
        cheating = decision.cheating,
        confidence = decision.confidence,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Prediction complete"
    );

    spawn_append(state.log_sink.clone(), LogRecord::new(decision.cheating, decision.confidence));

    Ok(Json(decision.into()))
}

/// Append off the response path; a sink failure is only logged
fn spawn_append(sink: Arc<dyn LogSink>, record: LogRecord) {
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        if let Err(e) = sink.append(&record) {
            tracing::warn!(sink = sink.name(), "Failed to append decision log: {}", e);
        }
    });
}

fn join_fault(err: JoinError) -> Fault {
    Fault::Unknown(join_message(err))
}

/// Panic payload text when the task panicked
fn join_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "pipeline panicked".to_string()
    }
}
