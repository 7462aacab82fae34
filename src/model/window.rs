//! The ordered window of items one feed view holds

use crate::domain::collections::ItemSet;
use crate::domain::feed::{FeedItem, ItemId};

/// An ordered, newest-first window of feed items owned by exactly one
/// timeline cursor.
///
/// Invariants: ids are unique within the window; `head_id`/`tail_id` are
/// always members of the sequence (or `None` when empty); the window keeps
/// whatever order the backend returned and never reorders it.
#[derive(Debug, Clone, Default)]
pub struct FeedWindow {
    items: ItemSet,
    has_older: bool,
}

impl FeedWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the newest item held; the `after` boundary for forward checks
    pub fn head_id(&self) -> Option<&ItemId> {
        self.items.first().map(|item| &item.id)
    }

    /// Id of the oldest item held; the `before` boundary for backward loads
    pub fn tail_id(&self) -> Option<&ItemId> {
        self.items.last().map(|item| &item.id)
    }

    pub fn has_older(&self) -> bool {
        self.has_older
    }

    pub fn set_has_older(&mut self, has_older: bool) {
        self.has_older = has_older;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains(id)
    }

    pub fn items(&self) -> &[FeedItem] {
        self.items.as_slice()
    }

    /// Replaces the window wholesale (initial load / refresh)
    pub fn replace_all(&mut self, items: Vec<FeedItem>, has_older: bool) {
        self.items = items.into_iter().collect();
        self.has_older = has_older;
    }

    /// Appends a page of older items to the tail, silently dropping any id
    /// already present. Returns how many items were actually appended.
    pub fn append_older(&mut self, items: Vec<FeedItem>) -> usize {
        let before = self.items.len();
        self.items.extend(items);
        self.items.len() - before
    }

    /// Prepends newer items ahead of the current head, keeping their given
    /// order and dropping ids already present. Returns how many items were
    /// actually prepended.
    pub fn prepend_newer(&mut self, items: Vec<FeedItem>) -> usize {
        let fresh: Vec<FeedItem> = items
            .into_iter()
            .filter(|item| !self.items.contains(&item.id))
            .collect();
        let added = fresh.len();
        if added > 0 {
            let existing = std::mem::take(&mut self.items);
            self.items = fresh.into_iter().chain(existing).collect();
        }
        added
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.has_older = false;
    }
}
