//! API route definitions.
//!
//! Telemetry endpoints always answer 200 with a single JSON object; errors
//! travel in the body as `{"error": ...}`.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use super::state::AppState;
use crate::telemetry::aggregate::decode_payload;
use crate::telemetry::{handle_batch_report, handle_drones_started, Registry, TelemetryError};

pub fn telemetry_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drones_started", post(drones_started))
        .route("/batch_report", post(batch_report))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tests": state.registry.len(),
    }))
}

async fn drones_started(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<Value> {
    Json(dispatch(&state.registry, body, handle_drones_started))
}

async fn batch_report(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<Value> {
    Json(dispatch(&state.registry, body, handle_batch_report))
}

/// Decode the body and hand the field map to `handler`. A body that cannot
/// be read (e.g. over the size limit) is reported like any other decode error.
fn dispatch(
    registry: &Registry,
    body: Result<Bytes, BytesRejection>,
    handler: fn(&Registry, &Map<String, Value>) -> Value,
) -> Value {
    let payload = body
        .map_err(|e| TelemetryError::Decode(format!("Error decoding body: {e}")))
        .and_then(|bytes| decode_payload(&bytes));
    match payload {
        Ok(payload) => handler(registry, &payload),
        Err(e) => {
            tracing::warn!(error = %e, "rejected request body");
            e.to_json()
        }
    }
}
