//! Test-keyed telemetry aggregation.
//!
//! Simulator hosts report drone starts and batch latency statistics under a
//! test name. Payloads are validated into typed requests ([`field`]), the
//! matching [`record::TestRecord`] is looked up or created in the
//! [`registry::Registry`], and the update is applied by [`aggregate`].

pub mod aggregate;
pub mod field;
pub mod record;
pub mod registry;

use thiserror::Error;

pub use self::aggregate::{handle_batch_report, handle_drones_started};
pub use self::field::FieldKind;
pub use self::registry::Registry;

/// A rejected telemetry request. Rejection always happens before any
/// record is created or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    /// The body was not a well-formed JSON object.
    #[error("{0}")]
    Decode(String),

    /// A required field is absent or carries the wrong JSON type.
    #[error("Expected {kind} field \"{field}\"")]
    Field {
        field: &'static str,
        kind: FieldKind,
    },
}

impl TelemetryError {
    /// Render the error as the in-body `{"error": ...}` object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_message() {
        let err = TelemetryError::Field {
            field: "cnt",
            kind: FieldKind::Integer,
        };
        assert_eq!(err.to_string(), "Expected integer field \"cnt\"");
        assert_eq!(
            err.to_json(),
            serde_json::json!({ "error": "Expected integer field \"cnt\"" })
        );
    }

    #[test]
    fn test_decode_error_message_passes_through() {
        let err = TelemetryError::Decode("Error decoding body: EOF".into());
        assert_eq!(err.to_json()["error"], "Error decoding body: EOF");
    }
}
