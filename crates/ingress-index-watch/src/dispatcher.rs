//! Dispatcher — applies watch events to the accumulator and publishes
//! snapshots.
//!
//! One `Dispatcher` clone runs inside each namespace's watch task; all
//! clones share the accumulator and the snapshot channel. The channel
//! is bounded: when the publisher falls behind, `apply` blocks rather
//! than dropping snapshots, which stalls every watch subscription. A
//! documented design limit at this scale, not something to silently
//! fix.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ingress_index_core::{Accumulator, Snapshot, normalize};

use crate::event::IngressEvent;

/// Capacity of the dispatcher → publisher snapshot channel.
pub const SNAPSHOT_QUEUE_DEPTH: usize = 10;

/// Create the bounded snapshot channel shared by all dispatch tasks.
pub fn snapshot_channel() -> (mpsc::Sender<Snapshot>, mpsc::Receiver<Snapshot>) {
    mpsc::channel(SNAPSHOT_QUEUE_DEPTH)
}

/// Applies normalized events for one namespace to the shared
/// accumulator and forwards each resulting snapshot downstream.
#[derive(Clone)]
pub struct Dispatcher {
    accumulator: Arc<Accumulator>,
    force_tls: bool,
    snapshots: mpsc::Sender<Snapshot>,
}

impl Dispatcher {
    pub fn new(
        accumulator: Arc<Accumulator>,
        force_tls: bool,
        snapshots: mpsc::Sender<Snapshot>,
    ) -> Self {
        Self {
            accumulator,
            force_tls,
            snapshots,
        }
    }

    /// Apply one event: normalize, mutate the accumulator, publish the
    /// resulting snapshot.
    ///
    /// Non-representable objects are dropped silently: no record, no
    /// snapshot, accumulator untouched. Deletes normalize the object
    /// too — an object that never produced a record has nothing to
    /// remove.
    pub async fn apply(&self, event: IngressEvent) {
        let raw = event.raw();
        let record = match normalize(raw, self.force_tls) {
            Ok(record) => record,
            Err(err) => {
                debug!(
                    namespace = %raw.namespace,
                    name = %raw.name,
                    error = %err,
                    "dropping event without usable address"
                );
                return;
            }
        };

        let current = match &event {
            IngressEvent::Added(_) | IngressEvent::Updated(_) => {
                self.accumulator.upsert(record.clone())
            }
            IngressEvent::Deleted(_) => self.accumulator.delete(&record),
        };
        info!(
            kind = event.kind(),
            record = %record,
            count = current.len(),
            "applied ingress event"
        );

        // Blocks when the queue is full (publisher backpressure).
        if self.snapshots.send(current).await.is_err() {
            warn!(name = %record.name, "snapshot channel closed; update not published");
        }
    }

    /// Drive one namespace's event stream to completion.
    pub async fn run(self, events: impl Stream<Item = IngressEvent>) {
        let mut events = std::pin::pin!(events);
        while let Some(event) = events.next().await {
            self.apply(event).await;
        }
        debug!("event stream ended; dispatcher exiting");
    }
}
