//! The derived endpoint record and its display ordering.

use std::fmt;

/// A single entry of the index: one reachable address per Ingress object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRecord {
    /// Namespace the Ingress lives in. Carried as an attribute only —
    /// it is not part of the identity key (see [`crate::Accumulator`]).
    pub namespace: String,
    /// Ingress object name; the identity key for upsert/delete.
    pub name: String,
    /// Fully-qualified, scheme-prefixed URL. Never empty for a record
    /// held in the accumulator.
    pub address: String,
}

impl EndpointRecord {
    pub fn new(namespace: &str, name: &str, address: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            address: address.to_string(),
        }
    }
}

impl fmt::Display for EndpointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "namespace={}, name={}, address={}",
            self.namespace, self.name, self.address
        )
    }
}

/// An immutable copy of the full record set at one point in time.
///
/// Produced on every successful upsert/delete and handed to the
/// publisher; readers treat it as frozen.
pub type Snapshot = Vec<EndpointRecord>;

/// Sort records case-insensitively by the composite (namespace, name,
/// address) key. Used per-request on a copy for display stability; the
/// shared snapshot itself is never reordered.
pub fn sort_records(records: &mut [EndpointRecord]) {
    records.sort_by_cached_key(|r| r.to_string().to_lowercase());
}
