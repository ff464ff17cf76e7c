//! ingress-index-core — domain types and the concurrent record index.
//!
//! Holds everything that does not depend on Kubernetes or HTTP:
//!
//! - [`EndpointRecord`] — the derived, renderable unit (namespace, name,
//!   fully-qualified address).
//! - [`Accumulator`] — the lock-guarded set of current records with
//!   upsert/delete semantics; every mutation hands back a snapshot copy.
//! - [`normalize`] — pure conversion from a raw Ingress shape to an
//!   `EndpointRecord`, or [`NormalizeError::EmptyAddress`] when no host
//!   rule yields a usable URL.
//!
//! The `Accumulator` is `Send + Sync` and is shared between all watch
//! dispatch tasks; readers never touch it directly — they only see the
//! snapshot copies emitted alongside mutations.

pub mod accumulator;
pub mod error;
pub mod normalize;
pub mod record;

pub use accumulator::{Accumulator, UpdatePolicy};
pub use error::NormalizeError;
pub use normalize::{RawIngress, normalize};
pub use record::{EndpointRecord, Snapshot, sort_records};
