use std::collections::HashSet;
use std::fmt;
use std::ops::{Deref, Index};
use std::slice::Iter;
use std::vec::IntoIter;

use crate::domain::feed::{FeedItem, ItemId};

/// A collection of feed items with automatic deduplication.
/// Provides O(1) duplicate checking based on ItemId while preserving insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSet {
    items: Vec<FeedItem>,
    ids: HashSet<ItemId>,
}

impl ItemSet {
    /// Creates a new empty set
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Creates a new set with the specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
        }
    }

    /// Inserts an item at the end of the set (ignores duplicates)
    /// Returns: true if the item was actually inserted, false if it was a duplicate
    pub fn insert(&mut self, item: FeedItem) -> bool {
        if self.ids.insert(item.id.clone()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    /// Checks if an ItemId is contained in the set
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Gets an item by index
    pub fn get(&self, index: usize) -> Option<&FeedItem> {
        self.items.get(index)
    }

    /// Gets the first item
    pub fn first(&self) -> Option<&FeedItem> {
        self.items.first()
    }

    /// Gets the last item
    pub fn last(&self) -> Option<&FeedItem> {
        self.items.last()
    }

    /// Returns a reference to the internal Vec (read-only)
    pub fn as_slice(&self) -> &[FeedItem] {
        &self.items
    }

    /// Retains items matching a predicate
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&FeedItem) -> bool,
    {
        let mut i = 0;
        while i < self.items.len() {
            if f(&self.items[i]) {
                i += 1;
            } else {
                let removed = self.items.remove(i);
                self.ids.remove(&removed.id);
            }
        }
        debug_assert_eq!(self.items.len(), self.ids.len());
    }

    /// Clears all items
    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }

    /// Moves all items out, leaving the set empty
    pub fn drain_all(&mut self) -> Vec<FeedItem> {
        self.ids.clear();
        std::mem::take(&mut self.items)
    }
}

// === Standard library trait implementations ===

impl Default for ItemSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ItemSet {
    type Target = [FeedItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl Index<usize> for ItemSet {
    type Output = FeedItem;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl AsRef<[FeedItem]> for ItemSet {
    fn as_ref(&self) -> &[FeedItem] {
        &self.items
    }
}

impl IntoIterator for ItemSet {
    type Item = FeedItem;
    type IntoIter = IntoIter<FeedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a FeedItem;
    type IntoIter = Iter<'a, FeedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<FeedItem> for ItemSet {
    fn from_iter<T: IntoIterator<Item = FeedItem>>(iter: T) -> Self {
        let mut items = Self::new();
        for item in iter {
            items.insert(item);
        }
        items
    }
}

impl Extend<FeedItem> for ItemSet {
    fn extend<T: IntoIterator<Item = FeedItem>>(&mut self, iter: T) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemSet[{} items]", self.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::feed::Counters;

    fn create_test_item(id: &str, secs: i64) -> FeedItem {
        FeedItem::new(
            id,
            "tester",
            Utc.timestamp_opt(secs, 0).single().expect("valid ts"),
            Counters::default(),
        )
    }

    #[test]
    fn test_new_collection_is_empty() {
        let items = ItemSet::new();
        assert!(items.is_empty());
        assert_eq!(items.len(), 0);
    }

    #[test]
    fn test_insert_new_item_returns_true() {
        let mut items = ItemSet::new();
        let item = create_test_item("p1", 1000);

        let was_added = items.insert(item.clone());

        assert!(was_added);
        assert_eq!(items.len(), 1);
        assert!(items.contains(&item.id));
    }

    #[test]
    fn test_insert_duplicate_item_returns_false() {
        let mut items = ItemSet::new();
        let item = create_test_item("p1", 1000);

        assert!(items.insert(item.clone()));
        assert_eq!(items.len(), 1);

        assert!(!items.insert(item));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_duplicate_with_different_payload_is_rejected() {
        let mut items = ItemSet::new();

        let first = create_test_item("p1", 1000);
        let mut second = create_test_item("p1", 2000);
        second.counters.likes = 7;

        assert!(items.insert(first.clone()));
        assert!(!items.insert(second));
        // First writer wins
        assert_eq!(items[0], first);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut items = ItemSet::new();
        for id in ["p3", "p1", "p2"] {
            items.insert(create_test_item(id, 0));
        }

        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn test_retain_keeps_ids_consistent() {
        let mut items = ItemSet::new();
        for i in 0..10 {
            items.insert(create_test_item(&format!("p{i}"), i));
        }

        items.retain(|item| item.created_at.timestamp() % 2 == 0);

        assert_eq!(items.len(), 5);
        assert!(items.contains(&ItemId::new("p2")));
        assert!(!items.contains(&ItemId::new("p3")));
    }

    #[test]
    fn test_drain_all_empties_the_set() {
        let mut items = ItemSet::new();
        items.insert(create_test_item("p1", 1));
        items.insert(create_test_item("p2", 2));

        let drained = items.drain_all();
        assert_eq!(drained.len(), 2);
        assert!(items.is_empty());
        assert!(!items.contains(&ItemId::new("p1")));

        // A drained id can be re-inserted
        assert!(items.insert(create_test_item("p1", 1)));
    }

    #[test]
    fn test_clear() {
        let mut items = ItemSet::new();
        let item = create_test_item("p1", 1000);

        items.insert(item.clone());
        assert_eq!(items.len(), 1);

        items.clear();
        assert_eq!(items.len(), 0);
        assert!(items.is_empty());
        assert!(!items.contains(&item.id));
    }

    #[test]
    fn test_standard_traits() {
        let mut items = ItemSet::new();
        let item1 = create_test_item("p1", 1);
        let item2 = create_test_item("p2", 2);

        // FromIterator
        let from_iter: ItemSet = vec![item1.clone(), item2.clone()].into_iter().collect();
        assert_eq!(from_iter.len(), 2);

        // Extend
        items.extend(vec![item1.clone(), item2]);
        assert_eq!(items.len(), 2);

        // Index
        assert_eq!(items[0].id, item1.id);

        // AsRef<[FeedItem]>
        let slice: &[FeedItem] = items.as_ref();
        assert_eq!(slice.len(), 2);

        // Display
        let display = format!("{items}");
        assert!(display.contains("2 items"));
    }

    #[test]
    fn test_internal_consistency_under_duplicate_pressure() {
        let mut items = ItemSet::new();

        for i in 1..=10 {
            items.insert(create_test_item(&format!("p{i}"), i));
        }
        for i in 5..=15 {
            items.insert(create_test_item(&format!("p{i}"), i));
        }

        assert_eq!(items.items.len(), items.ids.len());
        assert_eq!(items.len(), 15);

        for item in items.iter() {
            assert!(items.ids.contains(&item.id));
        }
    }
}
