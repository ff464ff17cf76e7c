//! Accumulator — the concurrency-safe set of current endpoint records.
//!
//! One instance is constructed at startup and injected into every watch
//! dispatch task. All access goes through a single mutex; each mutation
//! returns a defensive copy of the full record set, which becomes the
//! snapshot published downstream. Operations are O(n) over the current
//! record count, which is fine for an index-page workload.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::record::{EndpointRecord, Snapshot};

/// How `upsert` treats a record whose name is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Presence alone short-circuits: the stored record keeps its
    /// original attributes. This is the observed upstream behavior
    /// (first write wins, stale addresses never refresh) and therefore
    /// the default.
    #[default]
    IgnoreExisting,
    /// Replace the stored record's attributes with the incoming ones.
    Replace,
}

/// Lock-guarded, append-ordered collection of endpoint records.
///
/// Identity for both `upsert` and `delete` is the record `name` alone;
/// the namespace is not consulted. Two same-named Ingresses in
/// different namespaces collapse to a single entry.
#[derive(Debug, Default)]
pub struct Accumulator {
    policy: UpdatePolicy,
    records: Mutex<Vec<EndpointRecord>>,
}

impl Accumulator {
    /// Create an empty accumulator with the default
    /// [`UpdatePolicy::IgnoreExisting`] semantics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty accumulator with an explicit update policy.
    pub fn with_policy(policy: UpdatePolicy) -> Self {
        Self {
            policy,
            records: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EndpointRecord>> {
        // A poisoned lock means a holder panicked between reads; the
        // record vector itself is never left half-mutated.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert `record`, or apply the update policy if its name is
    /// already present. Returns a copy of the resulting record set.
    pub fn upsert(&self, record: EndpointRecord) -> Snapshot {
        let mut records = self.lock();
        match records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => {
                if self.policy == UpdatePolicy::Replace && *existing != record {
                    debug!(name = %record.name, "replacing stored record");
                    *existing = record;
                }
            }
            None => records.push(record),
        }
        records.clone()
    }

    /// Remove every record whose name matches `record.name`. Returns a
    /// copy of the remaining set; a miss returns the set unchanged.
    pub fn delete(&self, record: &EndpointRecord) -> Snapshot {
        let mut records = self.lock();
        records.retain(|r| r.name != record.name);
        records.clone()
    }
}
