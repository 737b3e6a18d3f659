//! Display order and pagination
//!
//! Pure ordering logic with no knowledge of task state. The order list holds
//! each key at most once; [`crate::state::DockState`] keeps it in sync with
//! the registry.

use crate::error::DockError;
use crate::task::AppKey;

/// Default number of tasks per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Ordered sequence of dock keys, no duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderList {
    keys: Vec<AppKey>,
}

/// Split of the order list for overflow presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow<'a> {
    /// Shown directly
    pub visible: &'a [AppKey],
    /// Listed behind the "more" affordance, in order
    pub hidden: &'a [AppKey],
}

impl OrderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[AppKey] {
        &self.keys
    }

    pub fn contains(&self, key: &AppKey) -> bool {
        self.keys.contains(key)
    }

    pub fn position(&self, key: &AppKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Append `key` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, key: AppKey) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &AppKey) -> bool {
        match self.position(key) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move `key` so that it ends up at `target_index`.
    ///
    /// The target is clamped to `[0, len - 1]` and interpreted in the list with
    /// `key` already removed, so the result is always a permutation.
    /// Returns the final index.
    ///
    /// # Errors
    ///
    /// `DockError::ReorderRejected` if `key` is not in the list.
    pub fn reorder(&mut self, key: &AppKey, target_index: usize) -> Result<usize, DockError> {
        let from = self
            .position(key)
            .ok_or_else(|| DockError::ReorderRejected(key.clone()))?;
        let target = target_index.min(self.keys.len() - 1);
        let moved = self.keys.remove(from);
        self.keys.insert(target, moved);
        Ok(target)
    }

    /// Move `key` to a drop slot measured in the original list.
    ///
    /// Slot `s` is the gap before the entry at index `s` (`len` is the end).
    /// When the key starts before the slot, removing it shifts the slot left
    /// by one.
    ///
    /// # Errors
    ///
    /// `DockError::ReorderRejected` if `key` is not in the list.
    pub fn reorder_to_slot(&mut self, key: &AppKey, slot: usize) -> Result<usize, DockError> {
        let from = self
            .position(key)
            .ok_or_else(|| DockError::ReorderRejected(key.clone()))?;
        let slot = slot.min(self.keys.len());
        let target = if from < slot { slot - 1 } else { slot };
        self.reorder(key, target)
    }

    /// Number of pages for `page_size` (always at least one).
    pub fn page_count(&self, page_size: usize) -> usize {
        let page_size = page_size.max(1);
        self.keys.len().div_ceil(page_size).max(1)
    }

    /// Whether there is more than one page.
    pub fn paging_active(&self, page_size: usize) -> bool {
        self.keys.len() > page_size.max(1)
    }

    /// Clamp a page index to the pages that exist.
    pub fn clamp_page(&self, index: usize, page_size: usize) -> usize {
        index.min(self.page_count(page_size) - 1)
    }

    /// Contiguous slice for page `index` (clamped).
    pub fn page(&self, index: usize, page_size: usize) -> &[AppKey] {
        let page_size = page_size.max(1);
        let index = self.clamp_page(index, page_size);
        let start = (index * page_size).min(self.keys.len());
        let end = (start + page_size).min(self.keys.len());
        &self.keys[start..end]
    }

    /// First `max_visible` keys shown, the rest hidden.
    pub fn overflow(&self, max_visible: usize) -> Overflow<'_> {
        let split = max_visible.min(self.keys.len());
        let (visible, hidden) = self.keys.split_at(split);
        Overflow { visible, hidden }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<AppKey> {
        names.iter().map(|n| AppKey::new(n).unwrap()).collect()
    }

    fn list(names: &[&str]) -> OrderList {
        let mut order = OrderList::new();
        for key in keys(names) {
            order.insert(key);
        }
        order
    }

    fn k(name: &str) -> AppKey {
        AppKey::new(name).unwrap()
    }

    #[test]
    fn insert_skips_duplicates() {
        let mut order = list(&["a", "b"]);
        assert!(!order.insert(k("a")));
        assert!(order.insert(k("c")));
        assert_eq!(order.keys(), keys(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut order = list(&["a"]);
        assert!(!order.remove(&k("zzz")));
        assert!(order.remove(&k("a")));
        assert!(order.is_empty());
    }

    #[test]
    fn reorder_first_to_last() {
        let mut order = list(&["a", "b", "c"]);
        assert_eq!(order.reorder(&k("a"), 2).unwrap(), 2);
        assert_eq!(order.keys(), keys(&["b", "c", "a"]).as_slice());
    }

    #[test]
    fn reorder_last_to_first() {
        let mut order = list(&["a", "b", "c"]);
        order.reorder(&k("c"), 0).unwrap();
        assert_eq!(order.keys(), keys(&["c", "a", "b"]).as_slice());
    }

    #[test]
    fn reorder_clamps_target() {
        let mut order = list(&["a", "b", "c"]);
        assert_eq!(order.reorder(&k("b"), 99).unwrap(), 2);
        assert_eq!(order.keys(), keys(&["a", "c", "b"]).as_slice());
    }

    #[test]
    fn reorder_unknown_key_rejected() {
        let mut order = list(&["a", "b"]);
        let result = order.reorder(&k("gone"), 0);
        assert!(matches!(result, Err(DockError::ReorderRejected(_))));
        assert_eq!(order.keys(), keys(&["a", "b"]).as_slice());
    }

    #[test]
    fn reorder_to_slot_shifts_when_moving_right() {
        // Drop "a" into the gap between "b" and "c"
        let mut order = list(&["a", "b", "c"]);
        assert_eq!(order.reorder_to_slot(&k("a"), 2).unwrap(), 1);
        assert_eq!(order.keys(), keys(&["b", "a", "c"]).as_slice());
    }

    #[test]
    fn reorder_to_slot_end() {
        let mut order = list(&["a", "b", "c"]);
        order.reorder_to_slot(&k("a"), 3).unwrap();
        assert_eq!(order.keys(), keys(&["b", "c", "a"]).as_slice());
    }

    #[test]
    fn reorder_to_slot_moving_left() {
        let mut order = list(&["a", "b", "c"]);
        order.reorder_to_slot(&k("c"), 1).unwrap();
        assert_eq!(order.keys(), keys(&["a", "c", "b"]).as_slice());
    }

    #[test]
    fn reorder_to_own_slot_is_noop() {
        let mut order = list(&["a", "b", "c"]);
        order.reorder_to_slot(&k("b"), 1).unwrap();
        assert_eq!(order.keys(), keys(&["a", "b", "c"]).as_slice());
        order.reorder_to_slot(&k("b"), 2).unwrap();
        assert_eq!(order.keys(), keys(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn pages_of_two() {
        let order = list(&["a", "b", "c", "d", "e"]);
        assert_eq!(order.page_count(2), 3);
        assert_eq!(order.page(0, 2), keys(&["a", "b"]).as_slice());
        assert_eq!(order.page(1, 2), keys(&["c", "d"]).as_slice());
        assert_eq!(order.page(2, 2), keys(&["e"]).as_slice());
        // Past the end clamps to the last page
        assert_eq!(order.page(7, 2), keys(&["e"]).as_slice());
        assert!(order.paging_active(2));
    }

    #[test]
    fn single_page_when_it_fits() {
        let order = list(&["a", "b"]);
        assert_eq!(order.page_count(10), 1);
        assert!(!order.paging_active(10));
        assert!(!order.paging_active(2));
        assert_eq!(order.page(3, 10), keys(&["a", "b"]).as_slice());
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let order = OrderList::new();
        assert_eq!(order.page_count(10), 1);
        assert!(order.page(0, 10).is_empty());
    }

    #[test]
    fn zero_page_size_treated_as_one() {
        let order = list(&["a", "b"]);
        assert_eq!(order.page_count(0), 2);
        assert_eq!(order.page(1, 0), keys(&["b"]).as_slice());
    }

    #[test]
    fn overflow_split() {
        let order = list(&["a", "b", "c", "d"]);
        let overflow = order.overflow(3);
        assert_eq!(overflow.visible, keys(&["a", "b", "c"]).as_slice());
        assert_eq!(overflow.hidden, keys(&["d"]).as_slice());

        let overflow = order.overflow(10);
        assert_eq!(overflow.visible.len(), 4);
        assert!(overflow.hidden.is_empty());
    }
}
