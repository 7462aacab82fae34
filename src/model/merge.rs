//! Buffering of detected-but-not-yet-shown newer items
//!
//! Detected items wait here until the user asks to see them; the buffer
//! never partially drains. Because every poll runs against the same
//! unchanged head, later polls return supersets of earlier ones, so the
//! buffer's insertion order is not chronological; `flush` restores
//! newest-first before prepending.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::collections::ItemSet;
use crate::domain::feed::FeedItem;
use crate::model::timeline::TimelineCursor;

/// Buffers newer items detected by `check_newer` and merges them into the
/// cursor's window on demand.
pub struct MergeController {
    cursor: Arc<TimelineCursor>,
    buffer: Mutex<ItemSet>,
}

impl MergeController {
    pub fn new(cursor: Arc<TimelineCursor>) -> Self {
        Self {
            cursor,
            buffer: Mutex::new(ItemSet::new()),
        }
    }

    /// # Panics
    /// Panics if the buffer lock is poisoned (this indicates a bug in the implementation)
    fn buffer(&self) -> MutexGuard<'_, ItemSet> {
        self.buffer.lock().expect("BUG: merge buffer lock poisoned")
    }

    /// Adds detected items, suppressing ids already visible in the window
    /// or already buffered.
    pub fn on_detected(&self, items: Vec<FeedItem>) {
        let mut buffer = self.buffer();
        let mut added = 0usize;
        for item in items {
            if self.cursor.contains(&item.id) {
                continue;
            }
            if buffer.insert(item) {
                added += 1;
            }
        }
        if added > 0 {
            log::debug!("buffered {added} newly detected item(s), pending={}", buffer.len());
        }
    }

    /// Moves all buffered items, newest-first, to the front of the window.
    /// Returns how many items were merged; a flush of an empty buffer is a
    /// no-op, so calling twice is idempotent.
    pub fn flush(&self) -> usize {
        let mut drained = {
            let mut buffer = self.buffer();
            if buffer.is_empty() {
                return 0;
            }
            buffer.drain_all()
        };
        // Stable: equal timestamps keep their detection order
        drained.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.cursor.prepend_newer(drained)
    }

    /// Empties the buffer without merging (e.g. the user navigated away)
    pub fn dismiss(&self) {
        self.buffer().clear();
    }

    /// Number of detected items waiting to be merged
    pub fn pending(&self) -> usize {
        self.buffer().len()
    }
}

impl std::fmt::Debug for MergeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeController")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
