//! Error types for record normalization.

use thiserror::Error;

/// Errors produced when deriving an endpoint record from a raw Ingress.
///
/// These are per-event errors: the dispatch path drops the event and the
/// accumulator is left untouched. Nothing here is fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// No host rule produced a usable, non-loopback address.
    #[error("no host rule yields a usable address")]
    EmptyAddress,
}
