//! Growable owning array used for the layer stack and per-layer decal queues.
//!
//! [`DynArray`] keeps its own logical capacity so the growth and shrink
//! policy is observable and deterministic:
//!
//! - Growth: capacity `0 -> 1`, otherwise doubled, only when `len + 1 > capacity`.
//! - Shrink: after a removal, capacity is halved when `0 < len < capacity / 4`.
//!
//! Every element is owned by the array. Removing returns ownership to the
//! caller; clearing or dropping the array drops every element.

/// Typed, owning, resizable sequence.
#[derive(Debug, Clone)]
pub struct DynArray<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynArray<T> {
    /// Creates an empty array with zero capacity.
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Logical capacity as driven by the growth/shrink policy.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn resize(&mut self, capacity: usize) {
        if capacity > self.items.capacity() {
            self.items.reserve_exact(capacity - self.items.len());
        } else {
            self.items.shrink_to(capacity);
        }
        self.capacity = capacity;
    }

    /// Appends `item` and returns its index.
    pub fn push(&mut self, item: T) -> usize {
        if self.items.len() + 1 > self.capacity {
            let grown = if self.capacity == 0 { 1 } else { self.capacity * 2 };
            self.resize(grown);
        }
        self.items.push(item);
        self.items.len() - 1
    }

    /// Appends `item` if present. `None` is a caller error and is ignored.
    pub fn push_opt(&mut self, item: Option<T>) -> Option<usize> {
        item.map(|item| self.push(item))
    }

    /// Overwrites the element at `index`. Out of range is a no-op.
    ///
    /// Returns `true` when the element was replaced.
    pub fn set(&mut self, index: usize, item: T) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Removes the element at `index`, shifting every later element down by one.
    ///
    /// This is O(n). Out of range returns `None` and leaves the array untouched.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);

        let len = self.items.len();
        if len > 0 && len < self.capacity / 4 {
            self.resize(self.capacity / 2);
        }
        Some(item)
    }

    /// Drops every element and releases the backing storage.
    pub fn clear(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn push_returns_index_and_grows_by_doubling() {
        let mut v = DynArray::new();
        assert_eq!(v.capacity(), 0);

        assert_eq!(v.push('a'), 0);
        assert_eq!(v.capacity(), 1);
        assert_eq!(v.push('b'), 1);
        assert_eq!(v.capacity(), 2);
        assert_eq!(v.push('c'), 2);
        assert_eq!(v.capacity(), 4);
        v.push('d');
        assert_eq!(v.capacity(), 4);
        v.push('e');
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn push_opt_ignores_none() {
        let mut v: DynArray<u32> = DynArray::new();
        assert_eq!(v.push_opt(None), None);
        assert!(v.is_empty());
        assert_eq!(v.push_opt(Some(7)), Some(0));
        assert_eq!(v.get(0), Some(&7));
    }

    #[test]
    fn get_out_of_range_is_absent() {
        let mut v = DynArray::new();
        v.push(1);
        v.push(2);
        assert_eq!(v.get(2), None);
        assert_eq!(v.get(usize::MAX), None);
        assert!(v.get_mut(5).is_none());
    }

    #[test]
    fn set_only_overwrites_in_range() {
        let mut v = DynArray::new();
        v.push(1);
        assert!(v.set(0, 10));
        assert!(!v.set(1, 20));
        assert_eq!(v.len(), 1);
        assert_eq!(v.capacity(), 1);
        assert_eq!(v.get(0), Some(&10));
    }

    #[test]
    fn remove_shifts_tail_down_preserving_order() {
        let mut v = DynArray::new();
        for i in 0..6 {
            v.push(i);
        }
        assert_eq!(v.remove(2), Some(2));
        assert_eq!(v.as_slice(), &[0, 1, 3, 4, 5]);
        assert_eq!(v.remove(10), None);
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn remove_shrinks_when_sparse() {
        let mut v = DynArray::new();
        for i in 0..9 {
            v.push(i);
        }
        assert_eq!(v.capacity(), 16);
        // 9 -> 4 elements: shrink only triggers once len < 16 / 4
        for _ in 0..5 {
            v.remove(0);
        }
        assert_eq!(v.len(), 4);
        assert_eq!(v.capacity(), 16);
        v.remove(0);
        assert_eq!(v.len(), 3);
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.as_slice(), &[6, 7, 8]);
    }

    #[test]
    fn removing_last_element_keeps_capacity() {
        let mut v = DynArray::new();
        v.push(1);
        v.push(2);
        v.remove(0);
        v.remove(0);
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 2);
    }

    #[test]
    fn len_tracks_pushes_minus_removals() {
        let mut v = DynArray::new();
        let mut expected = 0usize;
        for round in 0..20 {
            v.push(round);
            expected += 1;
            if round % 3 == 0 {
                v.remove(0);
                expected -= 1;
            }
            assert_eq!(v.len(), expected);
            assert!(v.len() <= v.capacity());
        }
    }

    #[test]
    fn clear_releases_elements_and_resets() {
        let shared = Rc::new(());
        let mut v = DynArray::new();
        v.push(Rc::clone(&shared));
        v.push(Rc::clone(&shared));
        assert_eq!(Rc::strong_count(&shared), 3);

        v.clear();
        assert_eq!(Rc::strong_count(&shared), 1);
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);

        // Behaves like a fresh array afterwards
        assert_eq!(v.push(Rc::clone(&shared)), 0);
        assert_eq!(v.capacity(), 1);
    }

    #[test]
    fn set_drops_replaced_element() {
        let shared = Rc::new(());
        let mut v = DynArray::new();
        v.push(Rc::clone(&shared));
        v.set(0, Rc::new(()));
        assert_eq!(Rc::strong_count(&shared), 1);
    }
}
