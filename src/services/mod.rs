// Service exports
pub mod geocoder;
pub mod router;

pub use geocoder::{GeocodeCandidate, GeocodeError, GeocodeResolver};
pub use router::{RouteEngine, RouteError};

/// Outcome of a generation-stamped service call.
///
/// In-flight network calls are never aborted; cancellation is realized by
/// discarding results that are no longer the most recently requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The call was the latest of its kind and produced a value
    Resolved(T),
    /// Superseded by a newer call, or short-circuited on empty input.
    /// Callers must treat this as a no-op.
    Discarded,
}

impl<T> Outcome<T> {
    /// The resolved value, if any
    pub fn resolved(self) -> Option<T> {
        match self {
            Outcome::Resolved(value) => Some(value),
            Outcome::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Outcome::Discarded)
    }
}
