//! Field extraction from decoded JSON payloads.
//!
//! The transport hands over an untyped `serde_json::Map`. Each required field
//! is pulled out and coerced to its semantic kind; the first absent or
//! mistyped field aborts the whole decode, so fields after it are never
//! looked at.

use serde_json::{Map, Value};

use super::record::BatchStats;
use super::TelemetryError;

/// Semantic type a payload field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON number, truncated toward zero.
    Integer,
    /// A finite, non-negative JSON number.
    Numeric,
    /// A JSON string.
    String,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Numeric => write!(f, "numeric"),
            FieldKind::String => write!(f, "string"),
        }
    }
}

/// A field value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Integer(i64),
    Numeric(f64),
    String(&'a str),
}

/// Extract `field` from `payload` and coerce it to `kind`.
pub fn require<'a>(
    payload: &'a Map<String, Value>,
    field: &'static str,
    kind: FieldKind,
) -> Result<FieldValue<'a>, TelemetryError> {
    match kind {
        FieldKind::Integer => require_integer(payload, field).map(FieldValue::Integer),
        FieldKind::Numeric => require_numeric(payload, field).map(FieldValue::Numeric),
        FieldKind::String => require_string(payload, field).map(FieldValue::String),
    }
}

pub fn require_integer(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, TelemetryError> {
    payload
        .get(field)
        .and_then(as_integer)
        .ok_or(TelemetryError::Field {
            field,
            kind: FieldKind::Integer,
        })
}

pub fn require_numeric(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, TelemetryError> {
    payload
        .get(field)
        .and_then(as_numeric)
        .ok_or(TelemetryError::Field {
            field,
            kind: FieldKind::Numeric,
        })
}

pub fn require_string<'a>(
    payload: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, TelemetryError> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .ok_or(TelemetryError::Field {
            field,
            kind: FieldKind::String,
        })
}

// Integers are taken exactly; other numbers truncate toward zero.
fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))
}

fn as_numeric(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite() && *f >= 0.0)
}

/// Test names key the registry, so an empty one is rejected like a missing one.
fn require_test_name(payload: &Map<String, Value>) -> Result<String, TelemetryError> {
    let name = require_string(payload, "testname")?;
    if name.is_empty() {
        return Err(TelemetryError::Field {
            field: "testname",
            kind: FieldKind::String,
        });
    }
    Ok(name.to_string())
}

// ---------------------------------------------------------------------------
// Typed requests
// ---------------------------------------------------------------------------

/// "N drones started" report for one test.
#[derive(Debug, Clone, PartialEq)]
pub struct DronesStarted {
    pub cnt: i64,
    pub testname: String,
}

impl DronesStarted {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, TelemetryError> {
        let cnt = require_integer(payload, "cnt")?;
        let testname = require_test_name(payload)?;
        Ok(Self { cnt, testname })
    }
}

/// Periodic batch statistics snapshot from one simulator host.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub testname: String,
    pub stats: BatchStats,
}

impl BatchReport {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, TelemetryError> {
        let testname = require_test_name(payload)?;
        let sim_hostname = require_string(payload, "simHostname")?.to_string();
        let stats = BatchStats {
            sim_hostname,
            avg_report_period: require_numeric(payload, "avgReportPeriod")?,
            avg_report_period_count: require_numeric(payload, "avgReportPeriodCount")?,
            response_avg_latency: require_numeric(payload, "responseAvgLatency")?,
            response_avg_latency_count: require_numeric(payload, "responseAvgLatencyCount")?,
            response_min_latency: require_numeric(payload, "responseMinLatency")?,
            response_max_latency: require_numeric(payload, "responseMaxLatency")?,
        };
        Ok(Self { testname, stats })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
