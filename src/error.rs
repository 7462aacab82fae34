//! Error taxonomy for the feed engine
//!
//! Fetch failures are view-local and retryable; mutation failures always
//! roll local state back before they reach the caller.

use thiserror::Error;

use crate::domain::feed::ItemId;

/// A page fetch failed. The window is left untouched and the caller decides
/// when to retry; the engine never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The backend was unreachable or the request itself failed
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered but the page could not be understood
    #[error("malformed page: {0}")]
    Malformed(String),
}

/// The mutate collaborator rejected a like/unlike request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mutation rejected: {reason}")]
pub struct MutationFailure {
    pub reason: String,
}

impl MutationFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by [`MutationStore::toggle`](crate::repositories::mutation::MutationStore::toggle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Programmer error: the item was never seeded via `initialize`
    #[error("item {0} has no seeded interactive state")]
    NotInitialized(ItemId),

    /// A mutation of the same kind is already in flight for this item.
    /// Benign under fast double-clicks; callers should disable the control
    /// rather than display this as an error.
    #[error("a mutation for item {0} is already in flight")]
    InFlight(ItemId),

    /// The backend rejected the mutation; local state has been rolled back
    #[error(transparent)]
    Failed(#[from] MutationFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = FetchError::Malformed("missing id field".into());
        assert_eq!(err.to_string(), "malformed page: missing id field");
    }

    #[test]
    fn test_mutation_failure_converts_into_mutation_error() {
        let failure = MutationFailure::new("rate limited");
        let err: MutationError = failure.clone().into();
        assert_eq!(err, MutationError::Failed(failure));
        assert_eq!(err.to_string(), "mutation rejected: rate limited");
    }
}
