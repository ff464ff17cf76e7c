//! ingress-index-web — the HTTP surface of the index.
//!
//! Two pieces:
//!
//! - [`Publisher`] — single consumer loop draining the bounded snapshot
//!   channel into a latest-value cell.
//! - [`build_router`] — the axum router serving `GET /`, which renders
//!   whatever snapshot is currently published. Handlers never block on
//!   watch activity.

pub mod pages;
pub mod publisher;

use axum::Router;
use axum::routing::get;
use ingress_index_core::Snapshot;
use tokio::sync::watch;

pub use publisher::Publisher;

/// Shared state for page handlers: a read handle onto the latest
/// published snapshot.
#[derive(Clone)]
pub struct WebState {
    pub published: watch::Receiver<Snapshot>,
}

/// Build the index router.
pub fn build_router(state: WebState) -> Router {
    Router::new().route("/", get(pages::index)).with_state(state)
}
