//! Selection Cache
//!
//! Remembers which records of each stack are selected across
//! re-aggregations. A stack seen for the first time starts fully selected.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::GroupKey;

#[derive(Clone, Default)]
pub struct SelectionCache {
    inner: Arc<Mutex<HashMap<GroupKey, BTreeSet<usize>>>>,
}

impl SelectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<GroupKey, BTreeSet<usize>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Selection for a stack of `len` records, seeding new stacks with every
    /// index and dropping indices past the end
    pub fn selection_for(&self, key: &GroupKey, len: usize) -> BTreeSet<usize> {
        let mut map = self.lock();
        let selected = map.entry(key.clone()).or_insert_with(|| (0..len).collect());
        selected.retain(|i| *i < len);
        selected.clone()
    }

    pub fn get(&self, key: &GroupKey) -> Option<BTreeSet<usize>> {
        self.lock().get(key).cloned()
    }

    /// Flip one record in or out of the selection. Returns whether it is now selected.
    pub fn toggle(&self, key: &GroupKey, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        let mut map = self.lock();
        let selected = map.entry(key.clone()).or_insert_with(|| (0..len).collect());
        if selected.remove(&index) {
            false
        } else {
            selected.insert(index);
            true
        }
    }

    pub fn select_all(&self, key: &GroupKey, len: usize) {
        self.lock().insert(key.clone(), (0..len).collect());
    }

    pub fn clear(&self, key: &GroupKey) {
        self.lock().insert(key.clone(), BTreeSet::new());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stack_fully_selected() {
        let cache = SelectionCache::new();
        let key = GroupKey::owned(1, "Tent");
        assert_eq!(cache.selection_for(&key, 3), BTreeSet::from([0, 1, 2]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_toggle_persists_across_reads() {
        let cache = SelectionCache::new();
        let key = GroupKey::owned(1, "Tent");
        cache.selection_for(&key, 3);
        assert!(!cache.toggle(&key, 1, 3));
        assert_eq!(cache.selection_for(&key, 3), BTreeSet::from([0, 2]));
        assert!(cache.toggle(&key, 1, 3));
        assert!(!cache.toggle(&key, 5, 3));
    }

    #[test]
    fn test_shrinking_stack_trims_selection() {
        let cache = SelectionCache::new();
        let key = GroupKey::contained(4, "Peg");
        cache.selection_for(&key, 5);
        assert_eq!(cache.selection_for(&key, 2), BTreeSet::from([0, 1]));
        // Growing back does not reselect the lost indices
        assert_eq!(cache.selection_for(&key, 4), BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_clear_survives_reads() {
        let cache = SelectionCache::new();
        let key = GroupKey::owned(2, "Stove");
        cache.selection_for(&key, 2);
        cache.clear(&key);
        assert!(cache.selection_for(&key, 2).is_empty());
        assert!(cache.selection_for(&key, 1).is_empty());
        cache.select_all(&key, 3);
        assert_eq!(cache.get(&key), Some(BTreeSet::from([0, 1, 2])));
    }

    #[test]
    fn test_clones_share_state() {
        let cache = SelectionCache::new();
        let other = cache.clone();
        other.clear(&GroupKey::owned(1, "Axe"));
        assert!(!cache.is_empty());
    }
}
