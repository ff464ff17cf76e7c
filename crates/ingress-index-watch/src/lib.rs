//! ingress-index-watch — per-namespace Ingress event dispatch.
//!
//! One watch subscription runs per configured namespace. Each one
//! reduces cluster notifications to [`IngressEvent`]s, and a shared
//! [`Dispatcher`] applies them to the accumulator and pushes the
//! resulting snapshot onto a bounded channel:
//!
//! ```text
//! KubeSource (one per namespace)
//!   └── watcher::Event<Ingress> → IngressEvent
//!         └── Dispatcher::apply
//!               ├── normalize → upsert/delete on the shared Accumulator
//!               └── snapshot → bounded mpsc (backpressure when full)
//! ```
//!
//! Only [`kube_source`] knows about Kubernetes; the dispatcher is
//! driven by plain event streams and tests without a cluster.

pub mod dispatcher;
pub mod event;
pub mod kube_source;

pub use dispatcher::{Dispatcher, SNAPSHOT_QUEUE_DEPTH, snapshot_channel};
pub use event::IngressEvent;
pub use kube_source::KubeSource;
