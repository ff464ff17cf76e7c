//! The normalized watch event.

use ingress_index_core::RawIngress;

/// A single notification from one namespace's watch subscription.
///
/// Closed set on purpose: all three kinds flow through the same
/// dispatch function instead of three near-identical handlers. Added
/// and Updated both upsert (no diffing against prior state); Deleted
/// removes by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngressEvent {
    Added(RawIngress),
    Updated(RawIngress),
    Deleted(RawIngress),
}

impl IngressEvent {
    /// The raw object carried by the event.
    pub fn raw(&self) -> &RawIngress {
        match self {
            Self::Added(raw) | Self::Updated(raw) | Self::Deleted(raw) => raw,
        }
    }

    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::Updated(_) => "updated",
            Self::Deleted(_) => "deleted",
        }
    }
}
