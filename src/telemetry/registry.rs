//! Registry of test records keyed by test name.
//!
//! A single `Mutex` guards the map. Every lookup-or-create and every record
//! mutation runs under it, so concurrent reports for the same test never
//! lose updates and no caller ever sees a half-built record.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::record::TestRecord;

/// Whether a lookup found an existing record or created a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Created,
    Existing,
}

/// Owns every [`TestRecord`]. Records are created lazily on first use and
/// live for the rest of the process.
#[derive(Debug, Default)]
pub struct Registry {
    records: Mutex<HashMap<String, TestRecord>>,
    /// Number of records ever created.
    created: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // Mutation never panics midway, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, TestRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on the record for `test_name`, creating it first if needed.
    ///
    /// The whole lookup-create-mutate sequence holds the registry lock.
    pub fn with_record<R>(
        &self,
        test_name: &str,
        f: impl FnOnce(&mut TestRecord) -> R,
    ) -> (R, Lookup) {
        let mut records = self.lock();
        let mut lookup = Lookup::Existing;
        let record = records.entry(test_name.to_string()).or_insert_with(|| {
            lookup = Lookup::Created;
            TestRecord::new(test_name)
        });
        if lookup == Lookup::Created {
            let total = self.created.fetch_add(1, Ordering::Relaxed) + 1;
            info!(
                test_name,
                total,
                created_at = %record.created_at(),
                "created test record"
            );
        } else {
            debug!(test_name, "found existing test record");
        }
        (f(record), lookup)
    }

    /// Snapshot of the record for `test_name`, if one exists.
    pub fn get(&self, test_name: &str) -> Option<TestRecord> {
        self.lock().get(test_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Total records created since startup.
    pub fn created_total(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_lookup_creates() {
        let reg = Registry::new();
        assert!(reg.is_empty());

        let (count, lookup) = reg.with_record("t1", |r| r.drone_count());
        assert_eq!(count, 0);
        assert_eq!(lookup, Lookup::Created);

        let (_, lookup) = reg.with_record("t1", |r| r.add_drones(1));
        assert_eq!(lookup, Lookup::Existing);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.created_total(), 1);
    }

    #[test]
    fn test_get_does_not_create() {
        let reg = Registry::new();
        assert!(reg.get("missing").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_distinct_names_are_isolated() {
        let reg = Registry::new();
        reg.with_record("a", |r| r.add_drones(5));
        reg.with_record("b", |r| r.add_drones(2));
        assert_eq!(reg.get("a").unwrap().drone_count(), 5);
        assert_eq!(reg.get("b").unwrap().drone_count(), 2);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let reg = Arc::new(Registry::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        reg.with_record("shared", |r| r.add_drones(1));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.get("shared").unwrap().drone_count(), 4000);
        assert_eq!(reg.created_total(), 1);
    }
}
