//! Snapshot publisher — bounded queue in, latest value out.

use ingress_index_core::Snapshot;
use tokio::sync::{mpsc, watch};
use tracing::debug;

/// Single consumer of the snapshot channel fed by all watch dispatch
/// tasks. Each received snapshot atomically replaces the value visible
/// to HTTP handlers; readers only ever see a complete record set.
pub struct Publisher {
    snapshots: mpsc::Receiver<Snapshot>,
    published: watch::Sender<Snapshot>,
}

impl Publisher {
    /// Wire a publisher to the given snapshot receiver. Returns the
    /// publisher and the read handle handed to the web state. The
    /// initial published value is the empty record set.
    pub fn new(snapshots: mpsc::Receiver<Snapshot>) -> (Self, watch::Receiver<Snapshot>) {
        let (published, reader) = watch::channel(Vec::new());
        (
            Self {
                snapshots,
                published,
            },
            reader,
        )
    }

    /// Run until the snapshot channel closes or shutdown is signalled.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                next = self.snapshots.recv() => {
                    match next {
                        Some(snapshot) => {
                            debug!(count = snapshot.len(), "publishing snapshot");
                            // Send only fails with no receivers left,
                            // which just means nobody is serving pages.
                            let _ = self.published.send(snapshot);
                        }
                        None => {
                            debug!("snapshot channel closed; publisher exiting");
                            break;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    debug!("publisher shutting down");
                    break;
                }
            }
        }
    }
}
