//! Aggregation operations and their JSON boundary.
//!
//! `record_*` apply an already validated request to the registry.
//! `handle_*` are the total functions the transport calls: they validate a
//! decoded field map, apply the update and always return a JSON object,
//! with failures reported in-body as `{"error": ...}`.

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::field::{BatchReport, DronesStarted};
use super::registry::Registry;
use super::TelemetryError;

/// Fixed acknowledgement for an accepted batch report.
pub const BATCH_ACK: &str = "Thanks for your data!";

/// Running drone total for a test after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroneTotal {
    pub testname: String,
    pub drone_cnt: i64,
}

/// Decode a request body into a field map.
///
/// Only the first JSON value is read; anything after it is ignored. A body
/// whose first value is not a JSON object is a decode error.
pub fn decode_payload(body: &[u8]) -> Result<Map<String, Value>, TelemetryError> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next();
    match first {
        Some(Ok(Value::Object(map))) => Ok(map),
        Some(Ok(_)) => Err(TelemetryError::Decode(
            "Error decoding body: expected a JSON object".to_string(),
        )),
        Some(Err(e)) => Err(TelemetryError::Decode(format!("Error decoding body: {e}"))),
        None => Err(TelemetryError::Decode(
            "Error decoding body: empty body".to_string(),
        )),
    }
}

/// Add the reported drone starts to the test's counter.
pub fn record_drones_started(registry: &Registry, req: DronesStarted) -> DroneTotal {
    let ((drone_cnt, updated_at), _) = registry.with_record(&req.testname, |record| {
        (record.add_drones(req.cnt), record.updated_at())
    });
    info!(
        testname = %req.testname,
        cnt = req.cnt,
        drone_cnt,
        %updated_at,
        "drones started"
    );
    DroneTotal {
        testname: req.testname,
        drone_cnt,
    }
}

/// Replace the test's batch snapshot with the reported one.
pub fn record_batch_report(registry: &Registry, req: BatchReport) {
    let BatchReport { testname, stats } = req;
    let sim_hostname = stats.sim_hostname.clone();
    let avg_latency = stats.response_avg_latency;
    let min_latency = stats.response_min_latency;
    let max_latency = stats.response_max_latency;
    let (updated_at, _) = registry.with_record(&testname, |record| {
        record.replace_batch(stats);
        record.updated_at()
    });
    debug!(
        %testname,
        %sim_hostname,
        avg_latency,
        min_latency,
        max_latency,
        %updated_at,
        "batch report"
    );
}

pub fn handle_drones_started(registry: &Registry, payload: &Map<String, Value>) -> Value {
    match DronesStarted::from_payload(payload) {
        Ok(req) => {
            let total = record_drones_started(registry, req);
            json!({ "testname": total.testname, "drone_cnt": total.drone_cnt })
        }
        Err(e) => {
            warn!(error = %e, "rejected drones started report");
            e.to_json()
        }
    }
}

pub fn handle_batch_report(registry: &Registry, payload: &Map<String, Value>) -> Value {
    match BatchReport::from_payload(payload) {
        Ok(req) => {
            record_batch_report(registry, req);
            json!({ "result": BATCH_ACK })
        }
        Err(e) => {
            warn!(error = %e, "rejected batch report");
            e.to_json()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
