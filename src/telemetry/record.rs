//! Per-test accumulated state.

use chrono::{DateTime, Utc};

/// Latest batch statistics snapshot for a test.
///
/// Only the most recent report is kept. Several simulator hosts reporting
/// under the same test name overwrite each other; `sim_hostname` names
/// whichever host reported last.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    pub sim_hostname: String,
    pub avg_report_period: f64,
    pub avg_report_period_count: f64,
    pub response_avg_latency: f64,
    pub response_avg_latency_count: f64,
    pub response_min_latency: f64,
    pub response_max_latency: f64,
}

/// Accumulated state for one named test run.
#[derive(Debug, Clone)]
pub struct TestRecord {
    test_name: String,
    drone_count: i64,
    batch: Option<BatchStats>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TestRecord {
    /// Only the registry constructs records.
    pub(super) fn new(test_name: &str) -> Self {
        let now = Utc::now();
        Self {
            test_name: test_name.to_string(),
            drone_count: 0,
            batch: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn drone_count(&self) -> i64 {
        self.drone_count
    }

    pub fn batch(&self) -> Option<&BatchStats> {
        self.batch.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Add `cnt` to the drone counter and return the new total.
    /// Saturates at the `i64` bounds.
    pub fn add_drones(&mut self, cnt: i64) -> i64 {
        self.drone_count = self.drone_count.saturating_add(cnt);
        self.updated_at = Utc::now();
        self.drone_count
    }

    /// Replace the batch snapshot (last write wins).
    pub fn replace_batch(&mut self, stats: BatchStats) {
        self.batch = Some(stats);
        self.updated_at = Utc::now();
    }
}
