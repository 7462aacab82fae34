//! Optimistic like/unlike state shared across feed views
//!
//! The store is process-wide: every view rendering the same item reads the
//! same state, so a like applied in one view is visible everywhere. Each
//! item carries a tagged per-id lock (`Idle | Pending`) enforcing the
//! single-in-flight invariant in one place. An in-flight mutation always
//! settles, even if every original caller has unmounted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::{FeedBackend, MutationKind};
use crate::domain::feed::ItemId;
use crate::error::MutationError;

/// Interactive state of one item as currently visible to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub is_liked: bool,
    pub count: u64,
}

/// Per-id mutation lock. `Pending` remembers exactly what to restore on
/// rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationLock {
    Idle,
    Pending {
        previous_liked: bool,
        previous_count: u64,
    },
}

#[derive(Debug)]
struct LikeEntry {
    is_liked: bool,
    count: u64,
    lock: MutationLock,
}

/// Keyed repository of optimistic like state with apply/rollback
pub struct MutationStore {
    backend: Arc<dyn FeedBackend>,
    entries: Mutex<HashMap<ItemId, LikeEntry>>,
}

impl MutationStore {
    pub fn new(backend: Arc<dyn FeedBackend>) -> Self {
        Self {
            backend,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// # Panics
    /// Panics if the entry lock is poisoned (this indicates a bug in the implementation)
    fn entries(&self) -> MutexGuard<'_, HashMap<ItemId, LikeEntry>> {
        self.entries
            .lock()
            .expect("BUG: mutation store lock poisoned")
    }

    /// Seeds state for an item once; later calls for the same id are no-ops
    /// (first writer wins). This models hydrating from whatever page first
    /// rendered the item.
    pub fn initialize(&self, id: ItemId, is_liked: bool, count: u64) {
        self.entries().entry(id).or_insert(LikeEntry {
            is_liked,
            count,
            lock: MutationLock::Idle,
        });
    }

    /// Current `{is_liked, count}`, or `None` if the item was never seeded
    pub fn read(&self, id: &ItemId) -> Option<LikeState> {
        self.entries().get(id).map(|entry| LikeState {
            is_liked: entry.is_liked,
            count: entry.count,
        })
    }

    /// Optimistically flips the like state, then confirms it against the
    /// backend.
    ///
    /// The flipped value is visible to `read` immediately. On backend
    /// success the optimistic value becomes ground truth; on failure the
    /// state is restored to exactly its previous value and the error is
    /// re-thrown for UI surfacing. A second toggle while one is in flight
    /// is rejected with [`MutationError::InFlight`], never queued.
    pub async fn toggle(&self, id: &ItemId) -> Result<LikeState, MutationError> {
        let desired = {
            let mut entries = self.entries();
            let entry = entries
                .get_mut(id)
                .ok_or_else(|| MutationError::NotInitialized(id.clone()))?;

            if matches!(entry.lock, MutationLock::Pending { .. }) {
                return Err(MutationError::InFlight(id.clone()));
            }

            entry.lock = MutationLock::Pending {
                previous_liked: entry.is_liked,
                previous_count: entry.count,
            };
            entry.is_liked = !entry.is_liked;
            entry.count = if entry.is_liked {
                entry.count.saturating_add(1)
            } else {
                entry.count.saturating_sub(1)
            };
            entry.is_liked
        };

        let result = self.backend.mutate(id, MutationKind::Like, desired).await;

        let mut entries = self.entries();
        let entry = entries
            .get_mut(id)
            .expect("BUG: entry vanished while a mutation was pending");

        match result {
            Ok(()) => {
                entry.lock = MutationLock::Idle;
                log::debug!("confirmed like={desired} for {id}");
                Ok(LikeState {
                    is_liked: entry.is_liked,
                    count: entry.count,
                })
            }
            Err(failure) => {
                if let MutationLock::Pending {
                    previous_liked,
                    previous_count,
                } = entry.lock
                {
                    entry.is_liked = previous_liked;
                    entry.count = previous_count;
                }
                entry.lock = MutationLock::Idle;
                log::warn!("rolled back like={desired} for {id}: {failure}");
                Err(MutationError::Failed(failure))
            }
        }
    }
}

impl std::fmt::Debug for MutationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationStore")
            .field("entries", &self.entries().len())
            .finish_non_exhaustive()
    }
}
